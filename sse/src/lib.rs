//! Server-Sent Events (SSE) infrastructure for the task board.
//!
//! Every client that opens `/events` is registered in a [`ConnectionRegistry`]
//! keyed by a server-generated [`events::ConnectionId`]. Whenever a board
//! mutation succeeds the domain layer publishes `DomainEvent::BoardUpdated`,
//! the [`domain_event_handler::SseDomainEventHandler`] turns it into a single
//! `data: update` frame, and the [`Manager`] hands that frame to every open
//! stream. Clients then re-fetch `/board`.
//!
//! Events are ephemeral: a client that is offline misses them and sees fresh
//! data on its next fetch.
//!
//! # Modules
//!
//! - `connection`: concurrency-safe registry of subscriber channels
//! - `manager`: registration bookkeeping and broadcast
//! - `message`: the events a stream can carry
//! - `domain_event_handler`: bridge from `events::DomainEvent`
//!
//! [`ConnectionRegistry`]: connection::ConnectionRegistry

pub mod connection;
pub mod domain_event_handler;
pub mod manager;
pub mod message;

pub use manager::Manager;
