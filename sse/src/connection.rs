use axum::response::sse::Event;
use dashmap::DashMap;
use events::ConnectionId;
use log::*;
use std::convert::Infallible;
use tokio::sync::mpsc::UnboundedSender;

pub type EventSender = UnboundedSender<Result<Event, Infallible>>;

/// Connection information
#[derive(Debug, Clone)]
pub struct ConnectionInfo {
    /// Username of the session that opened the stream, if any. `/events` is
    /// open to anonymous clients.
    pub principal: Option<String>,
    pub sender: EventSender,
}

/// Concurrency-safe registry of live SSE subscribers.
///
/// Add, remove and broadcast may run concurrently from any task.
pub struct ConnectionRegistry {
    connections: DashMap<ConnectionId, ConnectionInfo>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    /// Register a new connection - O(1)
    pub fn register(&self, principal: Option<String>, sender: EventSender) -> ConnectionId {
        let connection_id = ConnectionId::new();

        self.connections
            .insert(connection_id.clone(), ConnectionInfo { principal, sender });

        connection_id
    }

    /// Unregister a connection - O(1)
    pub fn unregister(&self, connection_id: &ConnectionId) -> Option<ConnectionInfo> {
        self.connections
            .remove(connection_id)
            .map(|(_, info)| info)
    }

    /// Broadcast an event to all connections - O(n).
    ///
    /// Returns how many subscribers the event was handed to. Subscribers whose
    /// receiving side is gone are dropped from the registry.
    pub fn broadcast(&self, event: Event) -> usize {
        let mut delivered = 0;
        let mut stale = Vec::new();

        for entry in self.connections.iter() {
            match entry.value().sender.send(Ok(event.clone())) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    warn!(
                        "Failed to send broadcast to connection {}: {}. Connection will be cleaned up.",
                        entry.key().as_str(),
                        e
                    );
                    stale.push(entry.key().clone());
                }
            }
        }

        // Removal happens after iteration; removing while holding a shard
        // read guard would deadlock.
        for connection_id in stale {
            self.connections.remove(&connection_id);
        }

        delivered
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn broadcast_reaches_every_registered_connection() {
        let registry = ConnectionRegistry::new();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        registry.register(Some("alice".to_string()), tx_a);
        registry.register(None, tx_b);

        let delivered = registry.broadcast(Event::default().data("update"));

        assert_eq!(delivered, 2);
        assert!(rx_a.recv().await.is_some());
        assert!(rx_b.recv().await.is_some());
    }

    #[test]
    fn unregister_removes_only_that_connection() {
        let registry = ConnectionRegistry::new();
        let (tx_a, _rx_a) = mpsc::unbounded_channel();
        let (tx_b, _rx_b) = mpsc::unbounded_channel();
        let a = registry.register(None, tx_a);
        let _b = registry.register(None, tx_b);

        assert!(registry.unregister(&a).is_some());
        assert!(registry.unregister(&a).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn broadcast_drops_connections_whose_receiver_is_gone() {
        let registry = ConnectionRegistry::new();
        let (tx_live, _rx_live) = mpsc::unbounded_channel();
        let (tx_dead, rx_dead) = mpsc::unbounded_channel();
        registry.register(None, tx_live);
        registry.register(None, tx_dead);
        drop(rx_dead);

        let delivered = registry.broadcast(Event::default().data("update"));

        assert_eq!(delivered, 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn concurrent_register_and_broadcast_do_not_lose_connections() {
        use std::sync::Arc;
        use std::thread;

        let registry = Arc::new(ConnectionRegistry::new());
        let mut receivers = Vec::new();
        let mut handles = Vec::new();

        for _ in 0..8 {
            let (tx, rx) = mpsc::unbounded_channel();
            receivers.push(rx);
            let registry = Arc::clone(&registry);
            handles.push(thread::spawn(move || {
                registry.register(None, tx);
                registry.broadcast(Event::default().data("update"));
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.len(), 8);
    }
}
