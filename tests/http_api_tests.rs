mod common;

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use common::{FaultyRepository, ScriptedSource, team};
use fantasy_sync::{
    SourceError, TeamRepository, TeamSyncService, build_router, state::AppState,
};
use serde_json::Value;
use tower::ServiceExt;

fn app_with(source: Arc<ScriptedSource>, repo: Arc<FaultyRepository>) -> Router {
    let sync = TeamSyncService::new(source, repo.clone());
    build_router(AppState::new(repo, sync))
}

async fn send(app: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("response expected");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body should be readable");

    if body.is_empty() {
        return (status, Value::Null);
    }

    let json = serde_json::from_slice::<Value>(&body).expect("body should be valid JSON");
    (status, json)
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app_with(
        Arc::new(ScriptedSource::default()),
        Arc::new(FaultyRepository::new()),
    );

    let (status, body) = send(&app, Method::GET, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn sync_endpoint_returns_report_and_teams_become_listable() {
    let source = Arc::new(ScriptedSource::new(vec![
        team(1, "Team X"),
        team(2, "Team Y"),
    ]));
    let repo = Arc::new(FaultyRepository::new());
    repo.fail_create_for(2);
    let app = app_with(source, repo);

    let (status, body) = send(&app, Method::POST, "/api/v1/teams/sync").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["created"], 1);
    assert_eq!(body["data"]["updated"], 0);
    assert_eq!(body["data"]["skipped"], 1);
    assert_eq!(body["data"]["skips"][0]["external_key"], 2);
    assert_eq!(body["data"]["skips"][0]["stage"], "create");

    let (status, body) = send(&app, Method::GET, "/api/v1/teams").await;
    assert_eq!(status, StatusCode::OK);
    let teams = body["data"].as_array().expect("array of teams");
    assert_eq!(teams.len(), 1);
    assert_eq!(teams[0]["name"], "Team X");
    assert_eq!(teams[0]["external_key"], 1);
}

#[tokio::test]
async fn sync_endpoint_maps_source_outage_to_bad_gateway() {
    let source = Arc::new(ScriptedSource::failing(|| {
        SourceError::unavailable(None, "connection refused")
    }));
    let repo = Arc::new(FaultyRepository::new());
    let app = app_with(source, repo.clone());

    let (status, body) = send(&app, Method::POST, "/api/v1/teams/sync").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "upstream_error");
    assert_eq!(repo.calls.total(), 0);
}

#[tokio::test]
async fn single_team_sync_creates_then_updates() {
    let source = Arc::new(ScriptedSource::new(vec![team(529, "Barcelona")]));
    let repo = Arc::new(FaultyRepository::new());
    let app = app_with(source.clone(), repo);

    let (status, body) = send(&app, Method::POST, "/api/v1/teams/sync/529").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["outcome"], "created");
    assert_eq!(body["data"]["team"]["name"], "Barcelona");
    let id = body["data"]["team"]["id"].as_i64().expect("numeric id");

    source.set_teams(vec![team(529, "FC Barcelona")]);
    let (status, body) = send(&app, Method::POST, "/api/v1/teams/sync/529").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["outcome"], "updated");
    assert_eq!(body["data"]["team"]["id"], id);
    assert_eq!(body["data"]["team"]["name"], "FC Barcelona");
}

#[tokio::test]
async fn single_team_sync_of_unknown_team_is_not_found() {
    let app = app_with(
        Arc::new(ScriptedSource::new(vec![team(1, "One")])),
        Arc::new(FaultyRepository::new()),
    );

    let (status, body) = send(&app, Method::POST, "/api/v1/teams/sync/77").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn single_team_sync_surfaces_store_conflict() {
    let repo = Arc::new(FaultyRepository::new());
    repo.fail_create_for(3);
    let app = app_with(Arc::new(ScriptedSource::new(vec![team(3, "Three")])), repo);

    let (status, body) = send(&app, Method::POST, "/api/v1/teams/sync/3").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "conflict");
}

#[tokio::test]
async fn get_and_delete_team_by_id() {
    let source = Arc::new(ScriptedSource::new(vec![team(10, "Ten")]));
    let repo = Arc::new(FaultyRepository::new());
    let app = app_with(source, repo.clone());

    send(&app, Method::POST, "/api/v1/teams/sync").await;
    let id = repo.list().await.expect("list")[0].id;

    let (status, body) = send(&app, Method::GET, &format!("/api/v1/teams/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Ten");

    let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/teams/{id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::GET, &format!("/api/v1/teams/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");

    let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/teams/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
