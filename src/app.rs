use axum::{
    Router,
    http::Method,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{delete_team, get_team, healthcheck, list_teams, sync_team, sync_teams},
    state::AppState,
};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/api/v1/teams", get(list_teams))
        .route("/api/v1/teams/:id", get(get_team).delete(delete_team))
        .route("/api/v1/teams/sync", post(sync_teams))
        .route("/api/v1/teams/sync/:external_key", post(sync_team))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
