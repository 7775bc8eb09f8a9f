//! Shared document model and wire protocol for the collaborative board.
//!
//! This crate owns everything both sides of the wire must agree on: the
//! page/stroke/shape data model ([`doc`]), the JSON message envelopes
//! ([`message`]), and the shape normalizer ([`normalize`]) that turns
//! structurally untrusted client payloads into a valid [`doc::Document`].
//!
//! The server never trusts inbound page data; it always runs it through
//! [`normalize::normalize_pages`] before committing. Clients build typed
//! documents directly and serialize them as-is.

pub mod doc;
pub mod message;
pub mod normalize;
