use crate::{
    controller::{
        board_controller, column_controller, deck_controller, health_check_controller,
        todo_controller, user_session_controller,
    },
    middleware::auth::require_auth,
    params, sse, ws, AppState,
};
use axum::{
    middleware::from_fn,
    routing::{delete, get, post, put},
    Json, Router,
};
use tower_http::services::ServeDir;

use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};

// To be a part of a rendered document, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Task Board API"
        ),
        paths(
            user_session_controller::login,
            user_session_controller::logout,
            todo_controller::add,
            todo_controller::list,
            todo_controller::edit,
            todo_controller::delete,
            todo_controller::move_task,
            column_controller::create,
            column_controller::delete,
            column_controller::rename,
            column_controller::duplicate,
            board_controller::read,
            health_check_controller::health_check,
        ),
        components(
            schemas(
                domain::Credentials,
                domain::todo::TaskSummary,
                domain::board::BoardColumn,
                domain::board::BoardTask,
                params::todo::TaskParams,
                params::todo::MoveParams,
                params::column::CreateParams,
                params::column::RenameParams,
            )
        ),
        modifiers(&SecurityAddon),
        tags(
            (name = "task_board", description = "Personal kanban board")
        )
    )]
struct TaskBoardApiDoc;

#[derive(OpenApi)]
#[openapi(
        info(
            title = "Slide Deck API"
        ),
        paths(
            deck_controller::new,
            deck_controller::home,
            deck_controller::read,
            deck_controller::update,
            deck_controller::index,
            health_check_controller::database_health_check,
        ),
        components(
            schemas(
                domain::deck::Deck,
                domain::deck::DeckSummary,
                params::deck::UpdateParams,
            )
        ),
        tags(
            (name = "slide_deck", description = "Collaborative slide decks")
        )
    )]
struct SlideDeckApiDoc;

struct SecurityAddon;

// Defines our cookie session based authentication requirement for gaining access to our
// API endpoints for OpenAPI.
impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "id",
                    "Session id value returned from successful login via Set-Cookie header",
                ))),
            )
        }
    }
}

pub fn task_board_routes(app_state: AppState) -> Router {
    let static_dir = app_state.config.static_dir().to_owned();

    Router::new()
        .merge(board_routes(app_state.clone()))
        .merge(user_session_routes())
        .merge(public_board_routes(app_state))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(TaskBoardApiDoc::openapi()) }),
        )
        .fallback_service(ServeDir::new(static_dir))
}

pub fn slide_deck_routes(app_state: AppState) -> Router {
    let static_dir = app_state.config.static_dir().to_owned();

    Router::new()
        .route("/", get(deck_controller::home))
        .route("/new", get(deck_controller::new))
        .route("/api/decks", get(deck_controller::index))
        .route(
            "/api/deck/{id}",
            get(deck_controller::read).post(deck_controller::update),
        )
        .route(
            "/healthz",
            get(health_check_controller::database_health_check),
        )
        .route("/ws", get(ws::handler::ws_handler))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(SlideDeckApiDoc::openapi()) }),
        )
        .with_state(app_state)
        .fallback_service(ServeDir::new(static_dir))
}

fn user_session_routes() -> Router {
    Router::new()
        .route("/login", post(user_session_controller::login))
        .route("/logout", get(user_session_controller::logout))
}

// Answer anonymous callers too.
fn public_board_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/list", get(todo_controller::list))
        .route("/events", get(sse::handler::sse_handler))
        .route("/health", get(health_check_controller::health_check))
        .with_state(app_state)
}

fn board_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/add", post(todo_controller::add))
        .route("/edit/{id}", put(todo_controller::edit))
        .route("/delete/{id}", delete(todo_controller::delete))
        .route("/move", post(todo_controller::move_task))
        .route("/column", post(column_controller::create))
        .route(
            "/column/{id}",
            delete(column_controller::delete).put(column_controller::rename),
        )
        .route(
            "/column/{id}/duplicate",
            post(column_controller::duplicate),
        )
        .route("/board", get(board_controller::read))
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}
