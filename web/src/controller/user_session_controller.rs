use crate::controller::status;
use crate::error::{Error as WebError, Result as WebResult};
use axum::{response::IntoResponse, Json};
use domain::{AuthSession, Credentials};
use log::*;

/// Binds the trimmed username to the session and returns the session cookie.
///
/// Pass the cookie back on every later call, e.g.:
/// curl -v --header "Cookie: id=07bbbe54-bd35-425f-8e63-618a8d8612df" http://localhost:4000/board
#[utoipa::path(
    post,
    path = "/login",
    request_body = domain::Credentials,
    responses(
        (status = 200, description = "Logged in; the session cookie is in Set-Cookie"),
        (status = 422, description = "Empty username"),
        (status = 503, description = "Service temporarily unavailable")
    )
)]
pub async fn login(
    mut auth_session: AuthSession,
    Json(creds): Json<Credentials>,
) -> WebResult<impl IntoResponse> {
    let principal = match auth_session.authenticate(creds).await {
        Ok(Some(principal)) => principal,
        Ok(None) => {
            warn!("Rejected login without a username");
            return Err(WebError::unprocessable());
        }
        Err(auth_error) => {
            error!("Authentication failed with error: {auth_error:?}");
            return Err(WebError::internal(auth_error, "authentication failed"));
        }
    };

    if let Err(login_error) = auth_session.login(&principal).await {
        warn!("Session login failed: {login_error:?}");
        return Err(WebError::internal(login_error, "session login failed"));
    }

    debug!("Logged in {}", principal.username);
    Ok(status("ok"))
}

/// Clears the session.
#[utoipa::path(
    get,
    path = "/logout",
    responses(
        (status = 200, description = "Successfully logged out"),
        (status = 503, description = "Service temporarily unavailable")
    )
)]
pub async fn logout(mut auth_session: AuthSession) -> WebResult<impl IntoResponse> {
    trace!("UserSessionController::logout()");
    if let Err(logout_error) = auth_session.logout().await {
        return Err(WebError::internal(logout_error, "session logout failed"));
    }
    Ok(status("logged out"))
}
