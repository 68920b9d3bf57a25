use crate::controller::status;
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::params::column::{CreateParams, RenameParams};
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use domain::{column as ColumnApi, Id};
use log::*;

#[utoipa::path(
    post,
    path = "/column",
    request_body = CreateParams,
    responses(
        (status = 200, description = "Column created"),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn create(
    AuthenticatedUser(principal): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(params): Json<CreateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create column {:?} for {}", params.name, principal.username);

    ColumnApi::add_column(
        app_state.db_conn_ref(),
        &app_state.event_publisher,
        &principal.username,
        &params.name,
    )
    .await?;

    Ok(status("ok"))
}

/// DELETE a column together with every task in it.
#[utoipa::path(
    delete,
    path = "/column/{id}",
    params(("id" = i32, Path, description = "Column to delete")),
    responses(
        (status = 200, description = "Column and its tasks deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Column not owned by the caller"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn delete(
    AuthenticatedUser(principal): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE Column {id} for {}", principal.username);

    ColumnApi::delete_column(
        app_state.db_conn_ref(),
        &app_state.event_publisher,
        &principal.username,
        id,
    )
    .await?;

    Ok(status("deleted"))
}

#[utoipa::path(
    put,
    path = "/column/{id}",
    params(("id" = i32, Path, description = "Column to rename")),
    request_body = RenameParams,
    responses(
        (status = 200, description = "Column renamed"),
        (status = 400, description = "Name is blank"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Column not owned by the caller"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn rename(
    AuthenticatedUser(principal): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(params): Json<RenameParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Rename column {id} for {}", principal.username);

    ColumnApi::rename_column(
        app_state.db_conn_ref(),
        &app_state.event_publisher,
        &principal.username,
        id,
        &params.name,
    )
    .await?;

    Ok(status("renamed"))
}

/// POST a copy of the column named `"<name> (copy)"` holding copies of its tasks.
#[utoipa::path(
    post,
    path = "/column/{id}/duplicate",
    params(("id" = i32, Path, description = "Column to duplicate")),
    responses(
        (status = 200, description = "Column duplicated"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Column not owned by the caller"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn duplicate(
    AuthenticatedUser(principal): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Duplicate column {id} for {}", principal.username);

    ColumnApi::duplicate_column(
        app_state.db_conn_ref(),
        &app_state.event_publisher,
        &principal.username,
        id,
    )
    .await?;

    Ok(status("duplicated"))
}
