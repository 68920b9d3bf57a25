use crate::message::ServerMessage;
use crate::Manager;
use async_trait::async_trait;
use events::{DomainEvent, EventHandler};
use log::*;
use std::sync::Arc;

/// Re-broadcasts saved deck documents as `deck_state` to the other members
/// of the deck's room.
pub struct RoomDomainEventHandler {
    room_manager: Arc<Manager>,
}

impl RoomDomainEventHandler {
    pub fn new(room_manager: Arc<Manager>) -> Self {
        Self { room_manager }
    }
}

#[async_trait]
impl EventHandler for RoomDomainEventHandler {
    async fn handle(&self, event: &DomainEvent) {
        match event {
            DomainEvent::DeckContentUpdated {
                deck_id,
                deck,
                origin,
            } => {
                debug!("Handling DeckContentUpdated event for deck {deck_id}");
                self.room_manager.broadcast_to_room(
                    deck_id,
                    ServerMessage::DeckState(deck.clone()),
                    origin.as_ref(),
                );
            }
            DomainEvent::BoardUpdated { .. } => {}
        }
    }
}
