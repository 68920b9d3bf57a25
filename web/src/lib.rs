use axum::http::{
    header::{ACCEPT, CONTENT_TYPE, COOKIE},
    HeaderValue, Method,
};
use axum::Router;
use axum_login::AuthManagerLayerBuilder;
use domain::Backend;
use log::*;
use std::io;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_sessions::{cookie::SameSite, ExpiredDeletion, Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

pub use service::AppState;

mod controller;
mod error;
mod extractors;
mod middleware;
mod params;
pub mod router;
mod sse;
mod ws;

pub use error::{Error, Result};

/// Serves the task-board API: session login, board CRUD and `/events`.
/// Sessions live in PostgreSQL; expired rows are purged every minute.
pub async fn init_task_board_server(app_state: AppState) -> io::Result<()> {
    let session_store = PostgresStore::new(
        app_state
            .db_conn_ref()
            .get_postgres_connection_pool()
            .to_owned(),
    );
    session_store.migrate().await.map_err(io::Error::other)?;

    let deletion_task = tokio::task::spawn(
        session_store
            .clone()
            .continuously_delete_expired(tokio::time::Duration::from_secs(60)),
    );

    let session_expiry = time::Duration::seconds(
        i64::try_from(app_state.config.backend_session_expiry_seconds).unwrap_or(i64::MAX),
    );
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(app_state.config.is_production())
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(session_expiry));

    let auth_layer = AuthManagerLayerBuilder::new(Backend::new(), session_layer).build();

    let app = router::task_board_routes(app_state.clone())
        .layer(cors_layer(&app_state.config.allowed_origins))
        .layer(auth_layer);

    let served = serve(&app_state, app, "task board").await;
    deletion_task.abort();
    served
}

/// Serves the slide-deck editor: deck pages, `/api/deck*`, `/healthz` and `/ws`.
/// No route reads a session, so no session layer is installed.
pub async fn init_slide_deck_server(app_state: AppState) -> io::Result<()> {
    serve(&app_state, slide_deck_app(&app_state), "slide deck").await
}

fn slide_deck_app(app_state: &AppState) -> Router {
    router::slide_deck_routes(app_state.clone())
        .layer(cors_layer(&app_state.config.allowed_origins))
}

async fn serve(app_state: &AppState, app: Router, name: &str) -> io::Result<()> {
    let listen_addr = app_state.config.listen_addr();
    let listener = TcpListener::bind(&listen_addr).await?;
    info!("Serving {name} on http://{listen_addr}");

    axum::serve(listener, app).await
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS origin {origin:?}: {e}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([
            Method::DELETE,
            Method::GET,
            Method::OPTIONS,
            Method::POST,
            Method::PUT,
        ])
        .allow_credentials(true)
        .allow_headers([ACCEPT, CONTENT_TYPE, COOKIE])
        .allow_origin(origins)
}


#[cfg(test)]
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use crate::test_support::{app_state, get};
    use axum::http::StatusCode;
    use domain::decks;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use tower::ServiceExt;

    #[tokio::test]
    async fn slide_deck_app_runs_without_a_session_layer() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<decks::Model>::new()])
            .into_connection();
        let app = slide_deck_app(&app_state(db));

        let response = app.oneshot(get("/api/decks", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("set-cookie").is_none());
    }
}
