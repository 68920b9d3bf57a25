//! This module re-exports the items of the lower layers that `web` needs, so
//! `web` only ever depends on `domain` for business operations.

// Re-exports from `entity` crate via `entity_api`
pub use entity_api::{columns, decks, todos, Id};

pub use entity_api::user::{AuthSession, Backend, Credentials, Principal};

pub use events;

pub mod board;
pub mod column;
pub mod deck;
pub mod error;
pub mod todo;
