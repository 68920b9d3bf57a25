use crate::controller::status;
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::params::todo::{MoveParams, TaskParams};
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use domain::{todo as TodoApi, AuthSession, Id};
use log::*;

/// POST a task onto the caller's first column, creating "To Do" when the
/// caller has no column yet.
#[utoipa::path(
    post,
    path = "/add",
    request_body = TaskParams,
    responses(
        (status = 200, description = "Task added"),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn add(
    AuthenticatedUser(principal): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(params): Json<TaskParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Add task for {}", principal.username);

    TodoApi::add_task(
        app_state.db_conn_ref(),
        &app_state.event_publisher,
        &principal.username,
        &params.task,
    )
    .await?;

    Ok(status("ok"))
}

/// GET the caller's tasks in creation order as `[id, task]` pairs.
/// Anonymous callers get `[]`.
#[utoipa::path(
    get,
    path = "/list",
    responses(
        (status = 200, description = "The caller's tasks", body = [domain::todo::TaskSummary]),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn list(
    auth_session: AuthSession,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    let Some(principal) = auth_session.user else {
        return Ok(Json(Vec::new()));
    };
    debug!("GET List tasks for {}", principal.username);

    let tasks = TodoApi::list_tasks(app_state.db_conn_ref(), &principal.username).await?;

    Ok(Json(tasks))
}

#[utoipa::path(
    put,
    path = "/edit/{id}",
    params(("id" = i32, Path, description = "Task to edit")),
    request_body = TaskParams,
    responses(
        (status = 200, description = "Task updated"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Task not found or not owned by the caller"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn edit(
    AuthenticatedUser(principal): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(params): Json<TaskParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Edit task {id} for {}", principal.username);

    TodoApi::edit_task(
        app_state.db_conn_ref(),
        &app_state.event_publisher,
        &principal.username,
        id,
        &params.task,
    )
    .await?;

    Ok(status("updated"))
}

#[utoipa::path(
    delete,
    path = "/delete/{id}",
    params(("id" = i32, Path, description = "Task to delete")),
    responses(
        (status = 200, description = "Task deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Task not found or not owned by the caller"),
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
    debug!("DELETE Task {id} for {}", principal.username);

    TodoApi::delete_task(
        app_state.db_conn_ref(),
        &app_state.event_publisher,
        &principal.username,
        id,
    )
    .await?;

    Ok(status("deleted"))
}

/// POST a task into another column at the given position. Neighbouring
/// positions are not renumbered.
#[utoipa::path(
    post,
    path = "/move",
    request_body = MoveParams,
    responses(
        (status = 200, description = "Task moved"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Task or target column not owned by the caller"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn move_task(
    AuthenticatedUser(principal): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(params): Json<MoveParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Move {:?} for {}", params, principal.username);

    TodoApi::move_task(
        app_state.db_conn_ref(),
        &app_state.event_publisher,
        &principal.username,
        params.task_id,
        params.to_column_id,
        params.new_position,
    )
    .await?;

    Ok(status("moved"))
}
