//! Event system infrastructure shared by the task-board and slide-deck services.
//!
//! Domain operations publish a [`DomainEvent`] once their write has succeeded.
//! Infrastructure crates (`sse`, `rooms`) implement [`EventHandler`] to turn
//! those events into pushes on live connections.
//!
//! This crate has no dependencies on internal crates, so every layer can use
//! it without cycles. Entity data is carried as serialized JSON values.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Unique identifier for a live SSE or WebSocket connection (server-generated).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Business-level changes, emitted after the database write has succeeded.
#[derive(Debug, Clone)]
pub enum DomainEvent {
    /// Something on a user's board changed (task or column added, edited,
    /// moved, deleted, duplicated). Carries no detail on purpose: subscribers
    /// re-fetch the board.
    BoardUpdated {
        /// Username of the board owner, used for log context only.
        owner: String,
    },
    /// A deck document was saved through the real-time editing path.
    DeckContentUpdated {
        deck_id: String,
        /// The full saved document (`{id, title, slides, version}`).
        deck: Value,
        /// The connection that produced the edit; it is skipped on fan-out.
        origin: Option<ConnectionId>,
    },
}

/// Trait for handling domain events.
/// Implementations perform side effects like pushing notifications.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &DomainEvent);
}

/// Publishes domain events to registered handlers.
/// Handlers are called sequentially in registration order.
#[derive(Clone)]
pub struct EventPublisher {
    handlers: Arc<Vec<Arc<dyn EventHandler>>>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Vec::new()),
        }
    }

    /// Register a new event handler.
    /// Note: This creates a new publisher instance with the additional handler.
    /// Store the returned publisher in your application state.
    pub fn with_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        let mut handlers = (*self.handlers).clone();
        handlers.push(handler);
        self.handlers = Arc::new(handlers);
        self
    }

    pub async fn publish(&self, event: DomainEvent) {
        for handler in self.handlers.iter() {
            handler.handle(&event).await;
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}
