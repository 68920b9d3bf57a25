//! Axum handler for `/ws`. Rooms and the frame protocol live in the `rooms` crate.

pub mod handler;
