use crate::message::ServerMessage;
use dashmap::DashMap;
use events::ConnectionId;
use log::*;
use std::collections::HashSet;
use tokio::sync::mpsc::UnboundedSender;

pub type MessageSender = UnboundedSender<ServerMessage>;

/// Room identifier: the deck id the connections are editing.
pub type RoomId = String;

#[derive(Debug, Clone)]
pub struct ConnectionInfo {
    pub sender: MessageSender,
    /// Rooms this connection joined, kept so disconnect cleanup is O(k).
    pub rooms: HashSet<RoomId>,
}

/// Registry of live WebSocket connections with dual indices: by connection
/// (for joins and cleanup) and by room (for fan-out).
///
/// Guards from one map are never held while writing the other.
pub struct RoomRegistry {
    connections: DashMap<ConnectionId, ConnectionInfo>,
    room_index: DashMap<RoomId, HashSet<ConnectionId>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            room_index: DashMap::new(),
        }
    }

    /// Register a freshly upgraded socket. It belongs to no room yet.
    pub fn register(&self, sender: MessageSender) -> ConnectionId {
        let connection_id = ConnectionId::new();
        self.connections.insert(
            connection_id.clone(),
            ConnectionInfo {
                sender,
                rooms: HashSet::new(),
            },
        );
        connection_id
    }

    /// Add a registered connection to a room. Joining twice is a no-op.
    /// Returns `false` when the connection is unknown.
    pub fn join(&self, connection_id: &ConnectionId, room: &str) -> bool {
        match self.connections.get_mut(connection_id) {
            Some(mut info) => {
                info.rooms.insert(room.to_string());
            }
            None => return false,
        }

        self.room_index
            .entry(room.to_string())
            .or_default()
            .insert(connection_id.clone());
        true
    }

    /// Drop a connection and its membership in every room.
    pub fn unregister(&self, connection_id: &ConnectionId) -> Option<ConnectionInfo> {
        let (_, info) = self.connections.remove(connection_id)?;
        for room in &info.rooms {
            self.remove_from_room_index(connection_id, room);
        }
        Some(info)
    }

    fn remove_from_room_index(&self, connection_id: &ConnectionId, room: &str) {
        if let Some(mut members) = self.room_index.get_mut(room) {
            members.remove(connection_id);

            if members.is_empty() {
                drop(members); // Release lock before removal
                self.room_index.remove_if(room, |_, members| members.is_empty());
            }
        }
    }

    /// Send to one connection. Returns `false` when it is unknown or closed.
    pub fn send_to(&self, connection_id: &ConnectionId, message: ServerMessage) -> bool {
        match self.connections.get(connection_id) {
            Some(info) => info.sender.send(message).is_ok(),
            None => false,
        }
    }

    /// Send to every member of `room` except `except`; returns the number of
    /// connections the message was handed to.
    pub fn broadcast(
        &self,
        room: &str,
        message: &ServerMessage,
        except: Option<&ConnectionId>,
    ) -> usize {
        let members: Vec<ConnectionId> = match self.room_index.get(room) {
            Some(members) => members.iter().cloned().collect(),
            None => return 0,
        };

        let mut delivered = 0;
        for conn_id in members.iter().filter(|id| Some(*id) != except) {
            if let Some(info) = self.connections.get(conn_id) {
                match info.sender.send(message.clone()) {
                    Ok(()) => delivered += 1,
                    Err(e) => warn!(
                        "Failed to send to connection {} in room {}: {}",
                        conn_id, room, e
                    ),
                }
            }
        }
        delivered
    }

    pub fn room_size(&self, room: &str) -> usize {
        self.room_index
            .get(room)
            .map(|members| members.len())
            .unwrap_or(0)
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}
