use axum::{
    extract::{Extension, State, WebSocketUpgrade},
    extract::ws::{Message, WebSocket},
    response::Response,
};
use futures_util::{SinkExt, StreamExt};

use crate::{AppState, session::SessionUser};

use super::model::{ClientEvent, GENERAL_ROOM, MessageView, ServerEvent};

/// Upgrades an authenticated connection into the "general" room. The auth
/// middleware has already resolved the session cookie sent on the handshake.
#[axum::debug_handler]
pub async fn chat_ws(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state, user))
}

async fn handle_socket(socket: WebSocket, state: AppState, user: SessionUser) {
    tracing::debug!("User {} connected to chat", user.user_id);
    let (mut sender, mut receiver) = socket.split();

    // History replay goes to this socket only, before it sees any broadcast.
    match MessageView::recent(&state.pool, GENERAL_ROOM).await {
        Ok(messages) => {
            match serde_json::to_string(&ServerEvent::LoadMessages { messages }) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        return;
                    }
                }
                Err(e) => tracing::error!("Failed to encode chat history: {}", e),
            }
        }
        Err(e) => tracing::error!("Failed to load chat history: {}", e),
    }

    let mut rx = state.chat_tx.subscribe();
    let forward_task = tokio::spawn(async move {
        while let Ok(event) = rx.recv().await {
            if sender.send(Message::Text(event.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(frame)) = receiver.next().await {
        let Message::Text(text) = frame else { continue };
        let Ok(ClientEvent::SendMessage { content }) = serde_json::from_str(text.as_str())
        else {
            continue;
        };
        if content.trim().is_empty() {
            continue;
        }

        // The author is the session identity; the payload carries none.
        match MessageView::create(&state.pool, GENERAL_ROOM, &user.user_id, &content).await {
            Ok(message) => match serde_json::to_string(&ServerEvent::NewMessage { message }) {
                Ok(json) => {
                    // every subscriber gets the echo, the sender included
                    let _ = state.chat_tx.send(json);
                }
                Err(e) => tracing::error!("Failed to encode message: {}", e),
            },
            // at-most-once: the message is dropped, the sender is not told
            Err(e) => tracing::error!("Error saving message: {}", e),
        }
    }

    forward_task.abort();
    tracing::debug!("User {} disconnected from chat", user.user_id);
}
