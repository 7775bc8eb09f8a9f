//! Per-client decoded-image cache.
//!
//! The only persisted representation of an image shape is its `imageData`
//! data URI. Decoded bitmap handles are derived state: keyed by shape id,
//! rebuilt from the document on every received snapshot, never transmitted,
//! and excluded from shape equality. Decoding itself is a host concern —
//! the engine only knows the [`ImageDecoder`] seam.

#[cfg(test)]
#[path = "images_test.rs"]
mod images_test;

use std::collections::HashMap;

use protocol::doc::{Document, ShapeKind};

/// A decoded image handle: natural pixel dimensions plus whatever the host
/// keys its real bitmap by (the shape id, via the cache).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHandle {
    pub width: u32,
    pub height: u32,
}

/// Host collaborator that decodes a data URI into an image handle.
///
/// Returning `None` means the data could not be decoded; the shape still
/// renders (or not) on the host's terms, and shared state is unaffected.
pub trait ImageDecoder {
    fn decode(&self, data_uri: &str) -> Option<ImageHandle>;
}

/// Decoder that never decodes. For headless hosts and tests.
pub struct NoopDecoder;

impl ImageDecoder for NoopDecoder {
    fn decode(&self, _data_uri: &str) -> Option<ImageHandle> {
        None
    }
}

/// Cache of decoded handles keyed by shape id.
#[derive(Debug, Default)]
pub struct ImageCache {
    entries: HashMap<String, ImageHandle>,
}

impl ImageCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, shape_id: &str) -> Option<ImageHandle> {
        self.entries.get(shape_id).copied()
    }

    pub fn insert(&mut self, shape_id: String, handle: ImageHandle) {
        self.entries.insert(shape_id, handle);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reconstruct the cache from a received document. Handles for shapes
    /// no longer present are dropped; every image shape is re-decoded from
    /// its `imageData`.
    pub fn rebuild(&mut self, doc: &Document, decoder: &dyn ImageDecoder) {
        let mut entries = HashMap::new();
        for page in &doc.pages {
            for shape in &page.shapes {
                if let ShapeKind::Image { image_data } = &shape.kind {
                    if let Some(handle) = decoder.decode(image_data) {
                        entries.insert(shape.id.clone(), handle);
                    }
                }
            }
        }
        self.entries = entries;
    }
}
