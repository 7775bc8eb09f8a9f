//! WebSocket handler — snapshot on connect, normalize-commit-rebroadcast
//! on every update.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → register an outbound channel → send the current snapshot
//!    to the new client only
//! 2. Client sends `draw-update` (or the legacy `add-page` alias) →
//!    normalize → replace → broadcast the new snapshot to ALL clients,
//!    sender included
//! 3. Close → remove the sender handle; the document is unaffected
//!
//! Unparseable frames are logged and dropped; nothing a client sends can
//! take the connection or the process down. There are no acks: an update
//! lost to a dropped connection is simply lost, and the client converges
//! on the next snapshot it receives.

#[cfg(test)]
#[path = "ws_test.rs"]
mod ws_test;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use protocol::message::{ClientMessage, ServerMessage};

use crate::state::{AppState, CLIENT_CHANNEL_DEPTH};
use crate::sync;

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let client_id = Uuid::new_v4();
    let (client_tx, mut client_rx) = mpsc::channel::<ServerMessage>(CLIENT_CHANNEL_DEPTH);

    // Register, then read the snapshot under the same guard so the client
    // cannot miss an update committed between the two.
    let snapshot = {
        let mut board = state.board.write().await;
        board.clients.insert(client_id, client_tx);
        board.snapshot()
    };

    let welcome = ServerMessage::DrawUpdate { pages: snapshot.pages };
    if socket.send(Message::Text(welcome.to_text().into())).await.is_err() {
        detach(&state, client_id).await;
        return;
    }
    info!(%client_id, "ws: client connected");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(Ok(msg)) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        process_inbound_text(&state, client_id, text.as_str()).await;
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            Some(frame) = client_rx.recv() => {
                if socket.send(Message::Text(frame.to_text().into())).await.is_err() {
                    break;
                }
            }
        }
    }

    detach(&state, client_id).await;
}

/// Parse and process one inbound text frame.
///
/// Separated from the socket loop so dispatch can be exercised in tests
/// without a transport: commits go through [`sync::commit`] and the
/// resulting snapshot is broadcast to every registered client.
async fn process_inbound_text(state: &AppState, client_id: Uuid, text: &str) {
    let message = match ClientMessage::parse(text) {
        Ok(message) => message,
        Err(error) => {
            warn!(%client_id, %error, "ws: dropping unparseable frame");
            return;
        }
    };
    info!(%client_id, pages = message.pages().len(), "ws: recv update");

    let snapshot = sync::commit(state, message.pages()).await;
    sync::broadcast(state, &ServerMessage::DrawUpdate { pages: snapshot.pages }).await;
}

async fn detach(state: &AppState, client_id: Uuid) {
    let mut board = state.board.write().await;
    board.clients.remove(&client_id);
    info!(%client_id, peers = board.clients.len(), "ws: client disconnected");
}
