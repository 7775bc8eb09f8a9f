//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the single shared board behind one `RwLock`: the authoritative
//! document plus the connected-client sender map. All mutation goes
//! through a write guard, which is the serialization point the whole
//! protocol leans on — there is exactly one writer role and every
//! committed state is a complete snapshot. No persistence: the document
//! lives and dies with the process.

use std::collections::HashMap;
use std::sync::Arc;

use protocol::doc::Document;
use protocol::message::ServerMessage;
use protocol::normalize::MalformedShapePolicy;
use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

/// Outbound channel depth per client. A client that falls this far behind
/// starts losing frames (best-effort delivery, no retry).
pub const CLIENT_CHANNEL_DEPTH: usize = 256;

// =============================================================================
// SHARED BOARD
// =============================================================================

/// The single authoritative board: current document + connected clients.
pub struct SharedBoard {
    /// The one true document. Replaced wholesale on every accepted update.
    pub document: Document,
    /// Connected clients: `client_id` -> sender for outbound frames.
    pub clients: HashMap<Uuid, mpsc::Sender<ServerMessage>>,
}

impl SharedBoard {
    #[must_use]
    pub fn new() -> Self {
        Self { document: Document::initial(), clients: HashMap::new() }
    }

    /// Last-writer-wins replacement of the authoritative document.
    pub fn replace(&mut self, document: Document) {
        self.document = document;
    }

    /// The current document, for a newly connected client or a rebroadcast.
    /// There is no history: a client joining mid-session gets only this.
    #[must_use]
    pub fn snapshot(&self) -> Document {
        self.document.clone()
    }
}

impl Default for SharedBoard {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via State
/// extractor. Clone is required by Axum — the board is Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub board: Arc<RwLock<SharedBoard>>,
    /// How the normalizer treats shapes with missing geometry.
    pub policy: MalformedShapePolicy,
}

impl AppState {
    #[must_use]
    pub fn new(policy: MalformedShapePolicy) -> Self {
        Self { board: Arc::new(RwLock::new(SharedBoard::new())), policy }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use super::*;

    /// Default app state for tests: fill-defaults policy, empty board.
    #[must_use]
    pub fn test_app_state() -> AppState {
        AppState::new(MalformedShapePolicy::FillDefaults)
    }

    /// Register a fake client and return its receiving end.
    pub async fn attach_client(state: &AppState) -> (Uuid, mpsc::Receiver<ServerMessage>) {
        let client_id = Uuid::new_v4();
        let (tx, rx) = mpsc::channel(CLIENT_CHANNEL_DEPTH);
        state.board.write().await.clients.insert(client_id, tx);
        (client_id, rx)
    }
}
