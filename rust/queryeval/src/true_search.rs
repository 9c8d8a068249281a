use std::sync::Arc;

use crate::{
    match_data::TermFieldMatchData,
    search_iterator::{DocId, IteratorKind, IteratorState, SearchIterator},
    trinary::Trinary,
};

/// Matches every document in its range.
pub struct TrueSearch {
    state: IteratorState,
    tfmd: Arc<TermFieldMatchData>,
}

impl TrueSearch {
    pub fn new(tfmd: Arc<TermFieldMatchData>) -> TrueSearch {
        TrueSearch {
            state: IteratorState::new(),
            tfmd,
        }
    }
}

impl SearchIterator for TrueSearch {
    fn state(&self) -> &IteratorState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut IteratorState {
        &mut self.state
    }

    fn kind(&self) -> IteratorKind {
        IteratorKind::True
    }

    fn class_name(&self) -> &'static str {
        "TrueSearch"
    }

    fn is_strict(&self) -> Trinary {
        Trinary::True
    }

    fn do_seek(&mut self, doc_id: DocId) {
        self.state.set_doc_id(doc_id);
    }

    fn do_unpack(&mut self, doc_id: DocId) {
        self.tfmd.reset_only_doc_id(doc_id);
    }
}
