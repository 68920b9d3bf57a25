//! Wire protocol for `/ws`.
//!
//! Every text frame is a JSON envelope `{"event": <name>, "data": <payload>}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Frames a client may send.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Join the room of a deck and receive its current state.
    JoinDeck(JoinDeck),
    /// Replace the deck's title and slides, then fan out to the room.
    ContentUpdate(ContentUpdate),
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct JoinDeck {
    #[serde(default)]
    pub deck_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ContentUpdate {
    #[serde(default)]
    pub deck_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    /// Raw slides; validated into the document model by the domain layer.
    #[serde(default)]
    pub slides: Option<Value>,
}

/// Frames the server sends.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The full deck document (`{id, title, slides, version}`).
    DeckState(Value),
    Error { message: String },
}

impl ClientMessage {
    pub fn parse(frame: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(frame)
    }
}

impl ServerMessage {
    pub fn to_frame(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_join_deck() {
        let message = ClientMessage::parse(r#"{"event":"join_deck","data":{"deck_id":"abc"}}"#)
            .unwrap();
        assert_eq!(
            message,
            ClientMessage::JoinDeck(JoinDeck {
                deck_id: Some("abc".to_string())
            })
        );
    }

    #[test]
    fn content_update_fields_are_optional() {
        let message =
            ClientMessage::parse(r#"{"event":"content_update","data":{"deck_id":"abc"}}"#)
                .unwrap();
        match message {
            ClientMessage::ContentUpdate(update) => {
                assert_eq!(update.deck_id.as_deref(), Some("abc"));
                assert!(update.title.is_none());
                assert!(update.slides.is_none());
            }
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[test]
    fn unknown_events_are_rejected() {
        assert!(ClientMessage::parse(r#"{"event":"ping","data":{}}"#).is_err());
        assert!(ClientMessage::parse("not json").is_err());
    }

    #[test]
    fn deck_state_frame_wraps_the_document() {
        let frame = ServerMessage::DeckState(json!({"id": "abc", "version": 2}))
            .to_frame()
            .unwrap();
        let value: Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(
            value,
            json!({"event": "deck_state", "data": {"id": "abc", "version": 2}})
        );
    }
}
