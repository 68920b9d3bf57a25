use crate::connection::{ConnectionRegistry, EventSender};
use crate::message::Event as SseEvent;
use events::ConnectionId;
use log::*;
use std::sync::Arc;

pub struct Manager {
    registry: Arc<ConnectionRegistry>,
}

impl Manager {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(ConnectionRegistry::new()),
        }
    }

    /// Register a new connection and return its unique ID
    pub fn register_connection(
        &self,
        principal: Option<String>,
        sender: EventSender,
    ) -> ConnectionId {
        let connection_id = self.registry.register(principal, sender);
        info!(
            "Registered new SSE connection {} ({} open)",
            connection_id,
            self.registry.len()
        );
        connection_id
    }

    /// Unregister a connection by ID
    pub fn unregister_connection(&self, connection_id: &ConnectionId) {
        if let Some(info) = self.registry.unregister(connection_id) {
            info!(
                "Unregistered SSE connection {} for {} ({} open)",
                connection_id,
                info.principal.as_deref().unwrap_or("anonymous"),
                self.registry.len()
            );
        }
    }

    /// Push an event to every subscriber, returning how many received it.
    pub fn broadcast(&self, event: SseEvent) -> usize {
        let delivered = self.registry.broadcast(event.to_sse_event());
        debug!("Broadcast SSE {:?} to {} connection(s)", event, delivered);
        delivered
    }

    pub fn connection_count(&self) -> usize {
        self.registry.len()
    }
}

impl Default for Manager {
    fn default() -> Self {
        Self::new()
    }
}
