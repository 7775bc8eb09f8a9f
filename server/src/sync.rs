//! Broadcast coordinator — the single write path into the document store.
//!
//! DESIGN
//! ======
//! Every accepted update takes the same route: normalize the raw pages,
//! swap the document under the write lock, read the snapshot back out, and
//! fan it out to every connected client — the sender included. Including
//! the sender is deliberate: the server is the sole arbiter of canonical
//! state, so the sender's optimistic draft is corrected to exactly what
//! was stored, even when normalization altered fields.
//!
//! ERROR HANDLING
//! ==============
//! Normalization is total, so the write path cannot fail. Delivery is
//! best-effort: a client whose channel is full loses the frame and
//! converges on the next one.

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

use serde_json::Value;
use tracing::debug;

use protocol::doc::Document;
use protocol::message::ServerMessage;
use protocol::normalize::normalize_pages;

use crate::state::AppState;

/// Normalize and commit a raw `pages` payload, returning the snapshot that
/// must now be broadcast. The normalize-and-swap happens under one write
/// guard; no client can observe a half-applied update.
pub async fn commit(state: &AppState, pages: &[Value]) -> Document {
    let document = normalize_pages(pages, state.policy);
    let mut board = state.board.write().await;
    board.replace(document);
    board.snapshot()
}

/// Fan a frame out to every connected client, sender included.
pub async fn broadcast(state: &AppState, message: &ServerMessage) {
    let board = state.board.read().await;
    for (client_id, tx) in &board.clients {
        // Best-effort: a full channel means a slow client; skip it.
        if tx.try_send(message.clone()).is_err() {
            debug!(%client_id, "outbound channel full, frame dropped");
        }
    }
}
