use crate::{
    search_iterator::{DocId, IteratorKind, IteratorState, SearchIterator},
    trinary::Trinary,
};

/// Matches nothing. Positioned at end as soon as it is range-initialized.
#[derive(Debug, Default)]
pub struct EmptySearch {
    state: IteratorState,
}

impl EmptySearch {
    pub fn new() -> EmptySearch {
        EmptySearch::default()
    }
}

impl SearchIterator for EmptySearch {
    fn state(&self) -> &IteratorState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut IteratorState {
        &mut self.state
    }

    fn kind(&self) -> IteratorKind {
        IteratorKind::Empty
    }

    fn class_name(&self) -> &'static str {
        "EmptySearch"
    }

    fn is_strict(&self) -> Trinary {
        Trinary::True
    }

    fn init_range(&mut self, begin_id: DocId, end_id: DocId) {
        self.state.init_range(begin_id, end_id);
        self.state.set_at_end();
    }

    fn do_seek(&mut self, _doc_id: DocId) {
        self.state.set_at_end();
    }

    fn do_unpack(&mut self, _doc_id: DocId) {}
}
