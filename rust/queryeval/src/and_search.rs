use crate::{
    empty_search::EmptySearch,
    multi_search::{Children, MultiSearch},
    search_iterator::{DocId, IteratorKind, IteratorState, SearchIterator},
    trinary::Trinary,
    unpack_info::UnpackInfo,
};

/// Matches the documents matched by every child.
pub struct AndSearch {
    multi: MultiSearch,
    estimate: u32,
}

impl AndSearch {
    /// Builds an AND over `children` that unpacks every child on a hit.
    pub fn create(children: Children, strict: bool) -> Box<dyn SearchIterator> {
        Self::create_with_unpack(children, strict, UnpackInfo::full())
    }

    /// Builds an AND over `children`. No composite is built for zero children
    /// (matches nothing) or a single child (returned as is).
    pub fn create_with_unpack(
        mut children: Children,
        strict: bool,
        unpack_info: UnpackInfo,
    ) -> Box<dyn SearchIterator> {
        match children.len() {
            0 => Box::new(EmptySearch::new()),
            1 => children.remove(0),
            _ => Box::new(AndSearch::new(children, strict, unpack_info)),
        }
    }

    pub fn new(children: Children, strict: bool, unpack_info: UnpackInfo) -> AndSearch {
        AndSearch {
            multi: MultiSearch::new(children, unpack_info, strict),
            estimate: u32::MAX,
        }
    }

    fn seek_strict(&mut self, doc_id: DocId) {
        let end_id = self.multi.state.end_id();
        let mut candidate = doc_id;
        'candidates: while candidate < end_id {
            for child in self.multi.children.iter_mut() {
                if !child.seek(candidate) {
                    candidate = child.doc_id().max(candidate + 1);
                    continue 'candidates;
                }
            }
            self.multi.state.set_doc_id(candidate);
            return;
        }
        self.multi.state.set_at_end();
    }

    fn seek_loose(&mut self, doc_id: DocId) {
        if self.multi.children.iter_mut().all(|child| child.seek(doc_id)) {
            self.multi.state.set_doc_id(doc_id);
        }
    }
}

impl SearchIterator for AndSearch {
    fn state(&self) -> &IteratorState {
        &self.multi.state
    }

    fn state_mut(&mut self) -> &mut IteratorState {
        &mut self.multi.state
    }

    fn kind(&self) -> IteratorKind {
        IteratorKind::And
    }

    fn class_name(&self) -> &'static str {
        const NAMES: [[&str; 3]; 2] = [
            [
                "AndSearchNoStrict<FullUnpack>",
                "AndSearchNoStrict<SelectiveUnpack>",
                "AndSearchNoStrict<NoUnpack>",
            ],
            [
                "AndSearchStrict<FullUnpack>",
                "AndSearchStrict<SelectiveUnpack>",
                "AndSearchStrict<NoUnpack>",
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

    fn and_with(
        &mut self,
        filter: Box<dyn SearchIterator>,
        estimate: u32,
    ) -> Option<Box<dyn SearchIterator>> {
        let filter = self.multi.offer_filter_to_children(filter, estimate)?;
        if estimate < self.estimate {
            self.estimate = estimate;
            self.multi.insert(0, filter);
        } else {
            self.multi.insert(1, filter);
        }
        None
    }

    fn as_multi(&self) -> Option<&MultiSearch> {
        Some(&self.multi)
    }

    fn as_multi_mut(&mut self) -> Option<&mut MultiSearch> {
        Some(&mut self.multi)
    }
}

/// Index into the per-policy class name tables: full, selective, none.
pub(crate) fn unpack_policy(unpack_info: &UnpackInfo) -> usize {
    if unpack_info.unpack_all() {
        0
    } else if unpack_info.is_empty() {
        2
    } else {
        1
    }
}
