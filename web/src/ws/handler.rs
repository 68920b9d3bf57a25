use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use domain::deck as DeckApi;
use events::ConnectionId;
use futures_util::{SinkExt, StreamExt};
use log::*;
use rooms::message::{ClientMessage, ContentUpdate, JoinDeck, ServerMessage};
use service::AppState;
use tokio::sync::mpsc;

pub(crate) async fn ws_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, app_state))
}

/// Pumps room messages out and client frames in until either side stops,
/// then drops the connection from every room it joined.
async fn handle_socket(socket: WebSocket, app_state: AppState) {
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    let connection_id = app_state.room_manager.register_connection(tx);

    let mut send_task = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            let frame = match message.to_frame() {
                Ok(frame) => frame,
                Err(e) => {
                    warn!("Failed to encode frame: {e}");
                    continue;
                }
            };
            if sink.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    let reader_state = app_state.clone();
    let reader_id = connection_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(message)) = stream.next().await {
            match message {
                Message::Text(text) => {
                    handle_frame(&reader_state, &reader_id, text.as_str()).await
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    app_state.room_manager.unregister_connection(&connection_id);
}

/// Dispatches one text frame. Malformed frames, unknown events and frames
/// without a `deck_id` are logged and dropped.
pub(crate) async fn handle_frame(app_state: &AppState, connection_id: &ConnectionId, frame: &str) {
    let message = match ClientMessage::parse(frame) {
        Ok(message) => message,
        Err(e) => {
            debug!("Ignoring frame from {connection_id}: {e}");
            return;
        }
    };

    match message {
        ClientMessage::JoinDeck(JoinDeck { deck_id }) => match non_empty(deck_id) {
            Some(deck_id) => join_deck(app_state, connection_id, &deck_id).await,
            None => debug!("Ignoring join_deck without a deck_id from {connection_id}"),
        },
        ClientMessage::ContentUpdate(ContentUpdate {
            deck_id,
            title,
            slides,
        }) => match non_empty(deck_id) {
            Some(deck_id) => content_update(app_state, connection_id, &deck_id, title, slides).await,
            None => debug!("Ignoring content_update without a deck_id from {connection_id}"),
        },
    }
}

fn non_empty(deck_id: Option<String>) -> Option<String> {
    deck_id.filter(|id| !id.is_empty())
}

async fn join_deck(app_state: &AppState, connection_id: &ConnectionId, deck_id: &str) {
    app_state.room_manager.join_room(connection_id, deck_id);

    let reply = match DeckApi::get_or_create_deck(app_state.db_conn_ref(), deck_id).await {
        Ok(deck) => match serde_json::to_value(&deck) {
            Ok(document) => ServerMessage::DeckState(document),
            Err(e) => error_frame(deck_id, &e.into()),
        },
        Err(e) => error_frame(deck_id, &e),
    };
    app_state.room_manager.send_to_connection(connection_id, reply);
}

async fn content_update(
    app_state: &AppState,
    connection_id: &ConnectionId,
    deck_id: &str,
    title: Option<String>,
    slides: Option<serde_json::Value>,
) {
    let result = DeckApi::apply_content_update(
        app_state.db_conn_ref(),
        &app_state.event_publisher,
        connection_id,
        deck_id,
        title,
        slides,
    )
    .await;

    if let Err(e) = result {
        app_state
            .room_manager
            .send_to_connection(connection_id, error_frame(deck_id, &e));
    }
}

fn error_frame(deck_id: &str, e: &domain::error::Error) -> ServerMessage {
    warn!("Deck {deck_id} operation failed: {e}");
    let message = match &e.error_kind {
        domain::error::DomainErrorKind::Invalid(message) => message.clone(),
        _ => "failed to save deck".to_owned(),
    };
    ServerMessage::Error { message }
}
