//! Wire message envelopes.
//!
//! Every frame on the socket is a JSON object tagged by `type`. Inbound
//! page payloads are kept as raw [`serde_json::Value`]s — the client is
//! untrusted and the normalizer, not serde, decides what survives.
//! Outbound snapshots carry fully typed pages.

#[cfg(test)]
#[path = "message_test.rs"]
mod message_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::doc::Page;

/// Error returned when an inbound frame cannot be parsed at all.
///
/// Field-level damage inside `pages` is not an error — that is the
/// normalizer's territory. This only fires when the envelope itself is
/// not valid JSON or has no recognized `type`.
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Client → server frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Whole-document update. The only canonical client message.
    #[serde(rename = "draw-update")]
    DrawUpdate { pages: Vec<Value> },
    /// Legacy alias for [`ClientMessage::DrawUpdate`]. Accepted for
    /// backward compatibility; identical semantics.
    #[serde(rename = "add-page")]
    AddPage { pages: Vec<Value> },
}

impl ClientMessage {
    /// Parse an inbound text frame.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::Malformed`] when the text is not a valid
    /// tagged frame.
    pub fn parse(text: &str) -> Result<Self, MessageError> {
        Ok(serde_json::from_str(text)?)
    }

    /// The raw page payload, regardless of which alias carried it.
    #[must_use]
    pub fn pages(&self) -> &[Value] {
        match self {
            Self::DrawUpdate { pages } | Self::AddPage { pages } => pages,
        }
    }
}

/// Server → client frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// The current authoritative snapshot. Sent to a client immediately on
    /// connect and to every client (sender included) after each accepted
    /// update.
    #[serde(rename = "draw-update")]
    DrawUpdate { pages: Vec<Page> },
}

impl ServerMessage {
    /// Serialize for the socket. Serialization of a typed snapshot cannot
    /// fail; an empty frame would only arise from a serde bug.
    #[must_use]
    pub fn to_text(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
