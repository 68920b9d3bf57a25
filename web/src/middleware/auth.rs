use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use axum_login::AuthSession;
use serde_json::json;

/// Answers 401 `{"error":"unauthorized"}` for requests without a logged-in
/// session instead of redirecting to a login page.
pub async fn require_auth(
    auth_session: AuthSession<domain::Backend>,
    request: Request,
    next: Next,
) -> Response {
    match auth_session.user {
        Some(_principal) => next.run(request).await,
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "unauthorized" })),
        )
            .into_response(),
    }
}
