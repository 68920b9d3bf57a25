use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::{AppState, Error};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use domain::board as BoardApi;
use log::*;

/// GET the caller's columns by id, each with its tasks by position.
#[utoipa::path(
    get,
    path = "/board",
    responses(
        (status = 200, description = "The caller's board", body = [domain::board::BoardColumn]),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn read(
    AuthenticatedUser(principal): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Board for {}", principal.username);

    let board = BoardApi::get_board(app_state.db_conn_ref(), &principal.username).await?;

    Ok(Json(board))
}

#[cfg(test)]
#[cfg(feature = "mock")]
mod tests {
    use crate::router::task_board_routes;
    use crate::test_support::{app_state, body_json, get, login, with_sessions};
    use axum::http::StatusCode;
    use domain::{columns, todos};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serde_json::json;
    use tower::ServiceExt;

    #[tokio::test]
    async fn board_groups_tasks_under_their_columns() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![columns::Model {
                id: 1,
                name: "To Do".to_owned(),
                owner: "alice".to_owned(),
            }]])
            .append_query_results([vec![todos::Model {
                id: 1,
                task: "buy milk".to_owned(),
                owner: "alice".to_owned(),
                column_id: 1,
                position: 1,
            }]])
            .into_connection();
        let app = with_sessions(task_board_routes(app_state(db)));
        let cookie = login(&app, "alice").await;

        let response = app.oneshot(get("/board", Some(&cookie))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!([{
                "id": 1,
                "name": "To Do",
                "tasks": [{"id": 1, "task": "buy milk", "position": 1}]
            }])
        );
    }

    #[tokio::test]
    async fn board_requires_a_session() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let app = with_sessions(task_board_routes(app_state(db)));

        let response = app.oneshot(get("/board", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
