use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::deck as DeckApi;
use log::*;
use serde_json::json;

/// Liveness of the task-board router. Does not touch the database.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "API router is up and responding to requests", body = String),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "healthy")
}

/// `SELECT 1` against the pool. Failures are reported in the body.
#[utoipa::path(
    get,
    path = "/healthz",
    responses(
        (status = 200, description = "Database reachable: {\"ok\": true}"),
        (status = 500, description = "Database unreachable: {\"ok\": false, \"error\": ...}")
    )
)]
pub async fn database_health_check(State(app_state): State<AppState>) -> impl IntoResponse {
    match DeckApi::health_check(app_state.db_conn_ref()).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "ok": true }))),
        Err(e) => {
            warn!("Database health check failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "ok": false, "error": e.to_string() })),
            )
        }
    }
}
