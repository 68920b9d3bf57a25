//! WebSocket room infrastructure for the slide-deck editor.
//!
//! Each upgraded socket registers with the [`Manager`] and gets an
//! [`events::ConnectionId`]. A `join_deck` frame puts the connection in the
//! room named after the deck id. When a `content_update` is persisted the
//! domain layer publishes `DomainEvent::DeckContentUpdated` with the sender's
//! connection id, and the [`domain_event_handler::RoomDomainEventHandler`]
//! sends the whole saved document to every other member of that room.
//!
//! There is no merge: the last write wins and every peer receives the full
//! replacement document.

pub mod connection;
pub mod domain_event_handler;
pub mod manager;
pub mod message;

pub use manager::Manager;
