use crate::message::Event as SseEvent;
use crate::Manager;
use async_trait::async_trait;
use events::{DomainEvent, EventHandler};
use log::*;
use std::sync::Arc;

/// Turns board changes into a payload-free `update` frame for every open
/// `/events` stream. Deck events belong to the WebSocket rooms and are ignored.
pub struct SseDomainEventHandler {
    sse_manager: Arc<Manager>,
}

impl SseDomainEventHandler {
    pub fn new(sse_manager: Arc<Manager>) -> Self {
        Self { sse_manager }
    }
}

#[async_trait]
impl EventHandler for SseDomainEventHandler {
    async fn handle(&self, event: &DomainEvent) {
        match event {
            DomainEvent::BoardUpdated { owner } => {
                debug!("Handling BoardUpdated event for {owner}");
                self.sse_manager.broadcast(SseEvent::Update);
            }
            DomainEvent::DeckContentUpdated { .. } => {}
        }
    }
}
