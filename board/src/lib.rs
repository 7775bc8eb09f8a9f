//! Headless client engine for the collaborative board.
//!
//! This crate owns the client side of the synchronization core: the
//! optimistic local draft, the preview/commit gesture lifecycle, and the
//! emission throttle. It is host-agnostic — the rendering surface and the
//! WebSocket live in the host, which feeds pointer events in and executes
//! the [`engine::Action`]s that come back out (send a snapshot, repaint).
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | The [`engine::Engine`] tying everything together |
//! | [`draft`] | Local working copy of the shared document |
//! | [`input`] | Tools, pointer points, and the gesture state machine |
//! | [`throttle`] | When a mutated draft actually goes on the wire |
//! | [`images`] | Per-client decoded-image cache, rebuilt from `imageData` |

pub mod draft;
pub mod engine;
pub mod images;
pub mod input;
pub mod throttle;
