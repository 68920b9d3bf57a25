use crate::params::deck::{HomeParams, UpdateParams};
use crate::{AppState, Error};
use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse, Redirect};
use axum::Json;
use domain::deck as DeckApi;
use log::*;
use std::path::Path as FsPath;

const EDITOR_TEMPLATE: &str = "index.html";
const LISTING_TEMPLATE: &str = "decks.html";

/// GET a fresh deck and redirect (303) to its editor page.
#[utoipa::path(
    get,
    path = "/new",
    responses(
        (status = 303, description = "Redirect to /?deck=<id>"),
        (status = 503, description = "Service temporarily unavailable")
    )
)]
pub async fn new(State(app_state): State<AppState>) -> Result<impl IntoResponse, Error> {
    let deck = DeckApi::create_deck(app_state.db_conn_ref()).await?;
    debug!("GET New deck {}", deck.id);

    Ok(Redirect::to(&format!("/?deck={}", deck.id)))
}

/// GET the editor for `?deck=<id>` (creating the deck when unknown), or the
/// deck listing page without it.
#[utoipa::path(
    get,
    path = "/",
    params(HomeParams),
    responses(
        (status = 200, description = "Editor or listing HTML page"),
        (status = 503, description = "Service temporarily unavailable")
    )
)]
pub async fn home(
    State(app_state): State<AppState>,
    Query(params): Query<HomeParams>,
) -> Result<impl IntoResponse, Error> {
    let static_dir = app_state.config.static_dir();

    match params.deck.filter(|id| !id.is_empty()) {
        Some(deck_id) => {
            debug!("GET Editor for deck {deck_id}");
            DeckApi::get_or_create_deck(app_state.db_conn_ref(), &deck_id).await?;

            let template = read_template(static_dir, EDITOR_TEMPLATE).await?;
            Ok(Html(render_editor(&template, &deck_id)))
        }
        None => Ok(Html(read_template(static_dir, LISTING_TEMPLATE).await?)),
    }
}

#[utoipa::path(
    get,
    path = "/api/deck/{id}",
    params(("id" = String, Path, description = "Deck id")),
    responses(
        (status = 200, description = "The deck document", body = domain::deck::Deck),
        (status = 404, description = "Deck not found"),
        (status = 503, description = "Service temporarily unavailable")
    )
)]
pub async fn read(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Deck {id}");

    let deck = DeckApi::get_deck(app_state.db_conn_ref(), &id)
        .await?
        .ok_or_else(Error::not_found)?;

    Ok(Json(deck))
}

/// POST a whole-document replace. The version is always advanced by the
/// database; the room is not notified.
#[utoipa::path(
    post,
    path = "/api/deck/{id}",
    params(("id" = String, Path, description = "Deck id")),
    request_body = UpdateParams,
    responses(
        (status = 200, description = "The saved deck document", body = domain::deck::Deck),
        (status = 503, description = "Service temporarily unavailable")
    )
)]
pub async fn update(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(params): Json<UpdateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Update deck {id}");

    let saved = DeckApi::upsert_deck(
        app_state.db_conn_ref(),
        &id,
        &params.title,
        params.slides,
        None,
    )
    .await?;

    Ok(Json(saved))
}

#[utoipa::path(
    get,
    path = "/api/decks",
    responses(
        (status = 200, description = "Every deck, most recently edited first", body = [domain::deck::DeckSummary]),
        (status = 503, description = "Service temporarily unavailable")
    )
)]
pub async fn index(State(app_state): State<AppState>) -> Result<impl IntoResponse, Error> {
    debug!("GET All decks");

    let decks = DeckApi::list_decks(app_state.db_conn_ref()).await?;

    Ok(Json(decks))
}

async fn read_template(static_dir: &str, name: &str) -> Result<String, Error> {
    let path = FsPath::new(static_dir).join(name);
    tokio::fs::read_to_string(&path).await.map_err(|e| {
        error!("Failed to read template {}: {e}", path.display());
        Error::internal(e, "template unavailable")
    })
}

/// Substitutes the HTML-escaped deck id for `{{ deck_id }}`.
fn render_editor(template: &str, deck_id: &str) -> String {
    let escaped = escape_html(deck_id);
    template
        .replace("{{ deck_id }}", &escaped)
        .replace("{{deck_id}}", &escaped)
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editor_template_gets_an_escaped_deck_id() {
        let rendered = render_editor(
            r#"<script>const DECK_ID = "{{ deck_id }}";</script>"#,
            r#"a"<b>"#,
        );
        assert_eq!(
            rendered,
            r#"<script>const DECK_ID = "a&quot;&lt;b&gt;";</script>"#
        );
    }

    #[cfg(feature = "mock")]
    mod routes {
        use crate::router::slide_deck_routes;
        use crate::test_support::{app_state, body_json, get, json_request};
        use axum::body::to_bytes;
        use axum::http::StatusCode;
        use chrono::{TimeZone, Utc};
        use domain::decks;
        use sea_orm::{DatabaseBackend, MockDatabase};
        use serde_json::{json, Value};
        use tower::ServiceExt;

        fn row(id: &str, content: Value) -> decks::Model {
            let at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 30, 0).unwrap();
            decks::Model {
                id: id.to_owned(),
                title: content["title"].as_str().unwrap_or("Untitled deck").to_owned(),
                content,
                created_at: at.into(),
                updated_at: at.into(),
            }
        }

        fn templates() -> std::path::PathBuf {
            let dir = std::env::temp_dir().join(format!("deck-templates-{}", unique_suffix()));
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(dir.join("index.html"), "<main data-deck=\"{{ deck_id }}\"></main>")
                .unwrap();
            std::fs::write(dir.join("decks.html"), "<h1>Decks</h1>").unwrap();
            dir
        }

        fn unique_suffix() -> u128 {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        }

        #[tokio::test]
        async fn new_redirects_to_the_created_deck() {
            let db = MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![row(
                    "generated",
                    json!({"title": "Untitled deck", "slides": [], "version": 1}),
                )]])
                .into_connection();
            let app = slide_deck_routes(app_state(db));

            let response = app.oneshot(get("/new", None)).await.unwrap();

            assert_eq!(response.status(), StatusCode::SEE_OTHER);
            assert_eq!(response.headers()["location"], "/?deck=generated");
        }

        #[tokio::test]
        async fn home_with_a_deck_serves_the_editor() {
            let db = MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![row(
                    "abc",
                    json!({"title": "Talk", "slides": [], "version": 4}),
                )]])
                .into_connection();
            let mut state = app_state(db);
            let dir = templates();
            state.config = state
                .config
                .clone()
                .set_static_dir(dir.to_string_lossy().into_owned());
            let app = slide_deck_routes(state);

            let response = app.oneshot(get("/?deck=abc", None)).await.unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            assert_eq!(&body[..], br#"<main data-deck="abc"></main>"#);
        }

        #[tokio::test]
        async fn home_without_a_deck_serves_the_listing() {
            let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
            let mut state = app_state(db);
            let dir = templates();
            state.config = state
                .config
                .clone()
                .set_static_dir(dir.to_string_lossy().into_owned());
            let app = slide_deck_routes(state);

            let response = app.oneshot(get("/", None)).await.unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            assert_eq!(&body[..], b"<h1>Decks</h1>");
        }

        #[tokio::test]
        async fn read_of_an_unknown_deck_is_404() {
            let db = MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<decks::Model>::new()])
                .into_connection();
            let app = slide_deck_routes(app_state(db));

            let response = app.oneshot(get("/api/deck/missing", None)).await.unwrap();

            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }

        #[tokio::test]
        async fn read_upgrades_legacy_slides() {
            let db = MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![row(
                    "old",
                    json!({
                        "title": "Old",
                        "slides": [{"id": "s1", "title": "Intro", "blocks": [
                            {"type": "text", "html": "<b>Hello</b>"},
                            {"type": "image", "src": "x.png"}
                        ]}],
                        "version": 2
                    }),
                )]])
                .into_connection();
            let app = slide_deck_routes(app_state(db));

            let response = app.oneshot(get("/api/deck/old", None)).await.unwrap();

            let deck = body_json(response).await;
            let slide = &deck["slides"][0];
            assert!(slide.get("blocks").is_none());
            assert_eq!(slide["background"], "#ffffff");
            assert_eq!(slide["objects"].as_array().unwrap().len(), 1);
            assert_eq!(slide["objects"][0]["text"], "Hello");
            assert_eq!(deck["version"], 2);
        }

        #[tokio::test]
        async fn update_returns_the_saved_document_with_its_version() {
            let db = MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![row(
                    "abc",
                    json!({"title": "Untitled deck", "slides": [], "version": 5}),
                )]])
                .into_connection();
            let app = slide_deck_routes(app_state(db));

            let response = app
                .oneshot(json_request("POST", "/api/deck/abc", None, "{}"))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(
                body_json(response).await,
                json!({"id": "abc", "title": "Untitled deck", "slides": [], "version": 5})
            );
        }

        #[tokio::test]
        async fn index_lists_decks_with_utc_timestamps() {
            let db = MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![row(
                    "abc",
                    json!({"title": "Talk", "slides": [], "version": 1}),
                )]])
                .into_connection();
            let app = slide_deck_routes(app_state(db));

            let response = app.oneshot(get("/api/decks", None)).await.unwrap();

            assert_eq!(
                body_json(response).await,
                json!([{"id": "abc", "title": "Talk", "updated_at": "2025-06-01T12:30:00Z"}])
            );
        }
    }
}
