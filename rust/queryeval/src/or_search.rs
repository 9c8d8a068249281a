use crate::{
    and_search::unpack_policy,
    empty_search::EmptySearch,
    multi_search::{Children, MultiSearch},
    search_iterator::{DocId, END_DOC_ID, IteratorKind, IteratorState, SearchIterator},
    trinary::Trinary,
    unpack_info::UnpackInfo,
};

/// Matches the documents matched by any child.
pub struct OrSearch {
    multi: MultiSearch,
}

impl OrSearch {
    /// Builds an OR over `children` that unpacks every matching child on a hit.
    pub fn create(children: Children, strict: bool) -> Box<dyn SearchIterator> {
        Self::create_with_unpack(children, strict, UnpackInfo::full())
    }

    pub fn create_with_unpack(
        mut children: Children,
        strict: bool,
        unpack_info: UnpackInfo,
    ) -> Box<dyn SearchIterator> {
        match children.len() {
            0 => Box::new(EmptySearch::new()),
            1 => children.remove(0),
            _ => Box::new(OrSearch::new(children, strict, unpack_info)),
        }
    }

    pub fn new(children: Children, strict: bool, unpack_info: UnpackInfo) -> OrSearch {
        OrSearch {
            multi: MultiSearch::new(children, unpack_info, strict),
        }
    }

    /// Advances to the smallest hit at or after `doc_id` over all children.
    ///
    /// A child that could not match the candidate bounds the next candidate by its
    /// own position when it moved past the candidate, otherwise by `candidate + 1`.
    fn seek_strict(&mut self, doc_id: DocId) {
        let end_id = self.multi.state.end_id();
        let mut candidate = doc_id;
        while candidate < end_id {
            let mut next = END_DOC_ID;
            for child in self.multi.children.iter_mut() {
                if child.seek(candidate) {
                    self.multi.state.set_doc_id(candidate);
                    return;
                }
                let position = child.doc_id();
                next = next.min(if position > candidate {
                    position
                } else {
                    candidate + 1
                });
            }
            candidate = next;
        }
        self.multi.state.set_at_end();
    }

    fn seek_loose(&mut self, doc_id: DocId) {
        if self.multi.children.iter_mut().any(|child| child.seek(doc_id)) {
            self.multi.state.set_doc_id(doc_id);
        }
    }
}

impl SearchIterator for OrSearch {
    fn state(&self) -> &IteratorState {
        &self.multi.state
    }

    fn state_mut(&mut self) -> &mut IteratorState {
        &mut self.multi.state
    }

    fn kind(&self) -> IteratorKind {
        IteratorKind::Or
    }

    fn class_name(&self) -> &'static str {
        const NAMES: [[&str; 3]; 2] = [
            [
                "OrSearchNoStrict<FullUnpack>",
                "OrSearchNoStrict<SelectiveUnpack>",
                "OrSearchNoStrict<NoUnpack>",
            ],
            [
                "OrSearchStrict<FullUnpack>",
                "OrSearchStrict<SelectiveUnpack>",
                "OrSearchStrict<NoUnpack>",
            ],
        ];
        NAMES[self.multi.strict as usize][unpack_policy(&self.multi.unpack_info)]
    }

    fn is_strict(&self) -> Trinary {
        self.multi.strict.into()
    }

    fn init_range(&mut self, begin_id: DocId, end_id: DocId) {
        self.multi.init_range(begin_id, end_id);
    }

    fn do_seek(&mut self, doc_id: DocId) {
        if self.multi.strict {
            self.seek_strict(doc_id);
        } else {
            self.seek_loose(doc_id);
        }
    }

    fn do_unpack(&mut self, doc_id: DocId) {
        self.multi.unpack_children(doc_id);
    }

    fn as_multi(&self) -> Option<&MultiSearch> {
        Some(&self.multi)
    }

    fn as_multi_mut(&mut self) -> Option<&mut MultiSearch> {
        Some(&mut self.multi)
    }
}
