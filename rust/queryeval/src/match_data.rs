//! Per-term match metadata written by iterators on unpack.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::search_iterator::{BEGIN_DOC_ID, DocId};

/// Match data sink for a single term in a single field.
///
/// Leaf iterators hold an `Arc<TermFieldMatchData>` and record the document id of
/// the current hit when unpacked. Several leaves may share one sink. A doc id of
/// [`BEGIN_DOC_ID`] means nothing has been unpacked yet.
#[derive(Debug)]
pub struct TermFieldMatchData {
    field_id: u32,
    doc_id: AtomicU32,
}

impl TermFieldMatchData {
    pub fn new() -> TermFieldMatchData {
        Self::with_field_id(0)
    }

    pub fn with_field_id(field_id: u32) -> TermFieldMatchData {
        TermFieldMatchData {
            field_id,
            doc_id: AtomicU32::new(BEGIN_DOC_ID),
        }
    }

    pub fn field_id(&self) -> u32 {
        self.field_id
    }

    /// Document id of the last unpacked hit.
    pub fn doc_id(&self) -> DocId {
        self.doc_id.load(Ordering::Relaxed)
    }

    /// Records `doc_id` without touching any other match state.
    pub fn reset_only_doc_id(&self, doc_id: DocId) {
        self.doc_id.store(doc_id, Ordering::Relaxed);
    }
}

impl Default for TermFieldMatchData {
    fn default() -> Self {
        Self::new()
    }
}
