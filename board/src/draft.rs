//! Local draft model: the client's working copy of the shared document.
//!
//! Two write paths converge here. Pointer handlers mutate the draft
//! optimistically before any network round-trip, and remote snapshots
//! replace it wholesale. There is deliberately no merging between the two
//! — whichever write lands last wins, matching the server's
//! last-writer-wins semantics.

#[cfg(test)]
#[path = "draft_test.rs"]
mod draft_test;

use protocol::doc::{Document, Page};

/// The client's belief about the document, plus which page it is editing.
///
/// `current_page_id` is client-local and never serialized.
#[derive(Debug, Clone)]
pub struct Draft {
    pub doc: Document,
    pub current_page_id: u64,
}

impl Default for Draft {
    fn default() -> Self {
        Self::new()
    }
}

impl Draft {
    /// A draft holding the initial single-page document.
    #[must_use]
    pub fn new() -> Self {
        Self { doc: Document::initial(), current_page_id: 1 }
    }

    #[must_use]
    pub fn current_page(&self) -> Option<&Page> {
        self.doc.page(self.current_page_id)
    }

    pub fn current_page_mut(&mut self) -> Option<&mut Page> {
        self.doc.page_mut(self.current_page_id)
    }

    /// Wholesale-replace the document with a received snapshot.
    ///
    /// Never merged field-by-field. If the page being edited no longer
    /// exists in the new document, editing falls back to the first page.
    pub fn replace(&mut self, doc: Document) {
        self.doc = doc;
        if self.doc.page(self.current_page_id).is_none() {
            self.current_page_id = self.doc.pages.first().map_or(1, |p| p.id);
        }
    }

    /// Append a new empty page with id `max + 1` and switch to it.
    pub fn add_page(&mut self) -> u64 {
        let id = self.doc.next_page_id();
        self.doc.pages.push(Page::new(id));
        self.current_page_id = id;
        id
    }

    /// Switch the edited page. Returns false (and stays put) if no page
    /// with that id exists.
    pub fn set_current_page(&mut self, id: u64) -> bool {
        if self.doc.page(id).is_some() {
            self.current_page_id = id;
            true
        } else {
            false
        }
    }
}
