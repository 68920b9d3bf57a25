//! Slide-deck persistence and the real-time editing path.
//!
//! HTTP and WebSocket handlers share these functions. Only
//! [`apply_content_update`] fans the saved document out to the deck's room;
//! every write replaces the whole document and the last writer wins.

use crate::decks::Model;
use crate::error::Error;
use chrono::Utc;
use entity_api::deck;
use events::{ConnectionId, DomainEvent, EventPublisher};
use log::*;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::{json, Value};
use utoipa::ToSchema;

pub mod document;

pub use document::{new_deck, strip_html, upgrade_legacy_slides, Deck, DEFAULT_TITLE};

/// Entry of the deck listing.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DeckSummary {
    pub id: String,
    pub title: String,
    /// UTC, `YYYY-MM-DDTHH:MM:SSZ`
    pub updated_at: String,
}

impl From<Model> for Deck {
    /// Flattens a row into the client document. Keys stored in `content`
    /// win over the row's own `title`.
    fn from(model: Model) -> Self {
        let title = model
            .content
            .get("title")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or(model.title);
        let slides = match model.content.get("slides") {
            Some(Value::Array(slides)) => slides.clone(),
            _ => Vec::new(),
        };
        let version = model.content.get("version").and_then(Value::as_i64);

        let mut deck = Deck {
            id: model.id,
            title,
            slides,
            version,
        };
        upgrade_legacy_slides(&mut deck.slides);
        deck
    }
}

/// Reads a deck, upgrading legacy slides on the way out. The upgrade is not
/// written back until the next save.
pub async fn get_deck(db: &DatabaseConnection, id: &str) -> Result<Option<Deck>, Error> {
    Ok(deck::find_by_id(db, id).await?.map(Deck::from))
}

/// Returns the deck, creating and saving the default document for an unknown id.
pub async fn get_or_create_deck(db: &DatabaseConnection, id: &str) -> Result<Deck, Error> {
    if let Some(existing) = get_deck(db, id).await? {
        return Ok(existing);
    }

    info!("Creating deck {id}");
    let fresh = new_deck(Some(id));
    upsert_deck(db, id, &fresh.title, fresh.slides, None).await
}

/// Creates a deck under a generated id.
pub async fn create_deck(db: &DatabaseConnection) -> Result<Deck, Error> {
    let fresh = new_deck(None);
    info!("Creating deck {}", fresh.id);
    upsert_deck(db, &fresh.id, &fresh.title, fresh.slides, None).await
}

/// Saves `{title, slides, version}`. Without a `version` the stored one is
/// advanced by one (starting at 1) in the same statement as the write.
///
/// A given `version` is stored as-is. The HTTP and WebSocket paths never pass
/// one; it is the entry point for callers that carry their own version, such
/// as imports.
pub async fn upsert_deck(
    db: &DatabaseConnection,
    id: &str,
    title: &str,
    slides: Vec<Value>,
    version: Option<i64>,
) -> Result<Deck, Error> {
    let mut content = json!({ "title": title, "slides": slides });
    if let Some(version) = version {
        content["version"] = json!(version);
    }

    let saved = deck::upsert(db, id, title, content).await?;
    let saved = Deck::from(saved);
    debug!("Saved deck {} at version {:?}", saved.id, saved.version);
    Ok(saved)
}

/// Persists an edit from a room member and sends the saved document to the
/// other members of the deck's room.
pub async fn apply_content_update(
    db: &DatabaseConnection,
    event_publisher: &EventPublisher,
    origin: &ConnectionId,
    id: &str,
    title: Option<String>,
    slides: Option<Value>,
) -> Result<Deck, Error> {
    let slides = match slides {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(slides)) => slides,
        Some(_) => return Err(Error::invalid("slides must be an array")),
    };
    let title = title.unwrap_or_else(|| DEFAULT_TITLE.to_owned());

    let saved = upsert_deck(db, id, &title, slides, None).await?;

    event_publisher
        .publish(DomainEvent::DeckContentUpdated {
            deck_id: saved.id.clone(),
            deck: serde_json::to_value(&saved)?,
            origin: Some(origin.clone()),
        })
        .await;

    Ok(saved)
}

/// Every deck, most recently edited first.
pub async fn list_decks(db: &DatabaseConnection) -> Result<Vec<DeckSummary>, Error> {
    Ok(deck::find_all(db)
        .await?
        .into_iter()
        .map(|model| DeckSummary {
            id: model.id,
            title: model.title,
            updated_at: model
                .updated_at
                .with_timezone(&Utc)
                .format("%Y-%m-%dT%H:%M:%SZ")
                .to_string(),
        })
        .collect())
}

/// `SELECT 1` against the pool.
pub async fn health_check(db: &DatabaseConnection) -> Result<(), Error> {
    Ok(deck::ping(db).await?)
}

#[cfg(test)]
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{FixedOffset, TimeZone};
    use events::EventHandler;
    use sea_orm::{DatabaseBackend, MockDatabase, Transaction};
    use std::sync::{Arc, Mutex};

    fn row(id: &str, content: Value) -> Model {
        let now = Utc::now();
        Model {
            id: id.to_owned(),
            title: "Row title".to_owned(),
            content,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<(String, Value, Option<ConnectionId>)>>,
    }

    #[async_trait]
    impl EventHandler for Recorder {
        async fn handle(&self, event: &DomainEvent) {
            if let DomainEvent::DeckContentUpdated {
                deck_id,
                deck,
                origin,
            } = event
            {
                self.events
                    .lock()
                    .unwrap()
                    .push((deck_id.clone(), deck.clone(), origin.clone()));
            }
        }
    }

    #[tokio::test]
    async fn get_deck_upgrades_legacy_slides() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row(
                "legacy",
                json!({
                    "title": "Old talk",
                    "slides": [{"id": "s1", "blocks": [{"type": "text", "html": "<p>Hi</p>"}]}],
                    "version": 3
                }),
            )]])
            .into_connection();

        let deck = get_deck(&db, "legacy").await?.expect("deck exists");

        assert_eq!(deck.title, "Old talk");
        assert_eq!(deck.version, Some(3));
        assert!(deck.slides[0].get("blocks").is_none());
        assert_eq!(deck.slides[0]["objects"][0]["text"], "Hi");
        Ok(())
    }

    #[tokio::test]
    async fn get_deck_returns_none_for_unknown_ids() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<Model>::new()])
            .into_connection();

        assert!(get_deck(&db, "missing").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn get_or_create_deck_saves_the_default_document() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<Model>::new()])
            .append_query_results([vec![row(
                "fresh",
                json!({"title": DEFAULT_TITLE, "slides": [], "version": 1}),
            )]])
            .into_connection();

        let deck = get_or_create_deck(&db, "fresh").await?;

        assert_eq!(deck.id, "fresh");
        assert_eq!(deck.version, Some(1));
        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("Double-click (or select) to edit"));
        Ok(())
    }

    #[tokio::test]
    async fn content_updates_leave_the_version_to_the_atomic_upsert() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row("d", json!({"title": "T", "slides": [], "version": 1}))]])
            .append_query_results([vec![row("d", json!({"title": "T", "slides": [], "version": 2}))]])
            .into_connection();
        let recorder = Arc::new(Recorder::default());
        let publisher = EventPublisher::new().with_handler(recorder.clone());
        let origin = ConnectionId::new();

        apply_content_update(&db, &publisher, &origin, "d", Some("T".into()), None).await?;
        apply_content_update(&db, &publisher, &origin, "d", Some("T".into()), Some(json!([])))
            .await?;

        let next_version_upsert = || {
            Transaction::from_sql_and_values(
                DatabaseBackend::Postgres,
                deck::UPSERT_NEXT_VERSION_SQL,
                [
                    "d".into(),
                    "T".into(),
                    json!({"title": "T", "slides": []}).into(),
                ],
            )
        };
        assert_eq!(
            db.into_transaction_log(),
            [next_version_upsert(), next_version_upsert()]
        );

        let events = recorder.events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].0, "d");
        assert_eq!(events[1].1["version"], 2);
        assert_eq!(events[1].2.as_ref(), Some(&origin));
        Ok(())
    }

    #[tokio::test]
    async fn upsert_deck_with_a_version_skips_the_increment() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row("d", json!({"title": "T", "slides": [], "version": 7}))]])
            .into_connection();

        let saved = upsert_deck(&db, "d", "T", Vec::new(), Some(7)).await?;

        assert_eq!(saved.version, Some(7));
        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("ON CONFLICT"));
        assert!(!log.contains("jsonb_set"));
        Ok(())
    }

    #[tokio::test]
    async fn content_update_rejects_non_array_slides() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = apply_content_update(
            &db,
            &EventPublisher::default(),
            &ConnectionId::new(),
            "d",
            None,
            Some(json!({"not": "an array"})),
        )
        .await;

        assert!(result.is_err());
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn list_decks_formats_timestamps_in_utc() -> Result<(), Error> {
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let updated_at = plus_two.with_ymd_and_hms(2024, 5, 1, 14, 30, 0).unwrap();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![Model {
                updated_at,
                ..row("d", json!({}))
            }]])
            .into_connection();

        let decks = list_decks(&db).await?;

        assert_eq!(decks[0].updated_at, "2024-05-01T12:30:00Z");
        assert_eq!(decks[0].title, "Row title");
        Ok(())
    }
}
