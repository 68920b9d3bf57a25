//! Axum handler for `/events`. The subscriber registry lives in the `sse` crate.

pub mod handler;
