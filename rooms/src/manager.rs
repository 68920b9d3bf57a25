use crate::connection::{MessageSender, RoomRegistry};
use crate::message::ServerMessage;
use events::ConnectionId;
use log::*;
use std::sync::Arc;

pub struct Manager {
    registry: Arc<RoomRegistry>,
}

impl Manager {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(RoomRegistry::new()),
        }
    }

    pub fn register_connection(&self, sender: MessageSender) -> ConnectionId {
        let connection_id = self.registry.register(sender);
        info!(
            "Registered new WebSocket connection {} ({} open)",
            connection_id,
            self.registry.connection_count()
        );
        connection_id
    }

    /// Drops the connection and its membership in every room it joined.
    pub fn unregister_connection(&self, connection_id: &ConnectionId) {
        if let Some(info) = self.registry.unregister(connection_id) {
            info!(
                "Unregistered WebSocket connection {} (left {} room(s), {} open)",
                connection_id,
                info.rooms.len(),
                self.registry.connection_count()
            );
        }
    }

    pub fn join_room(&self, connection_id: &ConnectionId, deck_id: &str) {
        if self.registry.join(connection_id, deck_id) {
            debug!(
                "Connection {} joined deck {} ({} member(s))",
                connection_id,
                deck_id,
                self.registry.room_size(deck_id)
            );
        } else {
            warn!("Unknown connection {connection_id} tried to join deck {deck_id}");
        }
    }

    pub fn send_to_connection(&self, connection_id: &ConnectionId, message: ServerMessage) {
        if !self.registry.send_to(connection_id, message) {
            warn!("Failed to send to WebSocket connection {connection_id}");
        }
    }

    /// Fan a message out to a deck's room, skipping `except` (the sender).
    pub fn broadcast_to_room(
        &self,
        deck_id: &str,
        message: ServerMessage,
        except: Option<&ConnectionId>,
    ) -> usize {
        let delivered = self.registry.broadcast(deck_id, &message, except);
        debug!("Broadcast to deck {deck_id}: {delivered} connection(s)");
        delivered
    }

    pub fn room_size(&self, deck_id: &str) -> usize {
        self.registry.room_size(deck_id)
    }

    pub fn connection_count(&self) -> usize {
        self.registry.connection_count()
    }
}

impl Default for Manager {
    fn default() -> Self {
        Self::new()
    }
}
