use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    error::{AppError, AppResult},
    models::{ApiResponse, ExternalKey, HealthStatus, SyncOutcome, SyncReport, Team},
    state::AppState,
};

pub async fn healthcheck() -> Json<HealthStatus> {
    Json(HealthStatus { status: "ok" })
}

pub async fn list_teams(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Vec<Team>>>> {
    let teams = state.repo.list().await?;
    Ok(Json(ApiResponse { data: teams }))
}

pub async fn get_team(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Team>>> {
    let team = state
        .repo
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("team {id} not found")))?;

    Ok(Json(ApiResponse { data: team }))
}

pub async fn delete_team(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    if state.repo.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(format!("team {id} not found")))
    }
}

pub async fn sync_teams(State(state): State<AppState>) -> AppResult<Json<ApiResponse<SyncReport>>> {
    let report = state.sync.run_sync().await?;
    Ok(Json(ApiResponse { data: report }))
}

pub async fn sync_team(
    State(state): State<AppState>,
    Path(external_key): Path<i64>,
) -> AppResult<Json<ApiResponse<SyncOutcome>>> {
    let outcome = state
        .sync
        .sync_single(ExternalKey::new(external_key))
        .await?;
    Ok(Json(ApiResponse { data: outcome }))
}
