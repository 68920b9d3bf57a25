use axum::response::sse::Event as AxumEvent;

/// Events pushed down the task-board SSE stream.
///
/// Frames carry no event name and no detail, only a `data:` line, so browsers
/// deliver them to `EventSource.onmessage` and re-fetch the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Rendered as the literal frame `data: update\n\n`.
    Update,
}

impl Event {
    pub fn payload(&self) -> &'static str {
        match self {
            Event::Update => "update",
        }
    }

    pub fn to_sse_event(self) -> AxumEvent {
        AxumEvent::default().data(self.payload())
    }
}
