pub use entity::{columns, decks, todos, Id};

pub mod column;
pub mod deck;
pub mod error;
pub mod todo;
pub mod user;

pub(crate) fn not_found() -> error::Error {
    error::Error {
        source: None,
        error_kind: error::EntityApiErrorKind::RecordNotFound,
    }
}
