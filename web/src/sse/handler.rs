use async_stream::stream;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use domain::AuthSession;
use futures::Stream;
use log::*;
use service::AppState;
use std::convert::Infallible;
use tokio::sync::mpsc;

/// Long-lived stream of `data: update` frames. Open to anonymous clients; the
/// session principal, when present, only labels the connection in logs.
pub(crate) async fn sse_handler(
    auth_session: AuthSession,
    State(app_state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let principal = auth_session.user.map(|principal| principal.username);
    debug!(
        "Establishing SSE connection for {}",
        principal.as_deref().unwrap_or("anonymous")
    );

    let (tx, mut rx) = mpsc::unbounded_channel();
    let connection_id = app_state.sse_manager.register_connection(principal, tx);
    let guard = Unregister {
        manager: app_state.sse_manager.clone(),
        connection_id,
    };

    let stream = stream! {
        let _guard = guard;
        while let Some(event) = rx.recv().await {
            yield event;
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Removes the subscriber when the stream is dropped, which is how a client
/// disconnect surfaces.
struct Unregister {
    manager: std::sync::Arc<::sse::Manager>,
    connection_id: events::ConnectionId,
}

impl Drop for Unregister {
    fn drop(&mut self) {
        self.manager.unregister_connection(&self.connection_id);
    }
}
