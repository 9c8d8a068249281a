use crate::{
    and_search::unpack_policy,
    empty_search::EmptySearch,
    multi_search::{Children, MultiSearch},
    search_iterator::{DocId, IteratorKind, IteratorState, SearchIterator},
    trinary::Trinary,
    unpack_info::UnpackInfo,
};

/// Matches the documents matched by the first (positive) child and by none of the
/// remaining (negative) children.
///
/// Only the positive child is ever unpacked.
pub struct AndNotSearch {
    multi: MultiSearch,
}

impl AndNotSearch {
    pub fn create(children: Children, strict: bool) -> Box<dyn SearchIterator> {
        Self::create_with_unpack(children, strict, UnpackInfo::full())
    }

    /// Builds an AND-NOT over `children`. Besides the zero and single child cases,
    /// a pair whose negative is [`EmptySearch`] folds into the positive child.
    pub fn create_with_unpack(
        mut children: Children,
        strict: bool,
        unpack_info: UnpackInfo,
    ) -> Box<dyn SearchIterator> {
        match children.len() {
            0 => Box::new(EmptySearch::new()),
            1 => children.remove(0),
            2 if children[1].kind() == IteratorKind::Empty => children.remove(0),
            _ => Box::new(AndNotSearch::new(children, strict, unpack_info)),
        }
    }

    pub fn new(children: Children, strict: bool, unpack_info: UnpackInfo) -> AndNotSearch {
        AndNotSearch {
            multi: MultiSearch::new(children, unpack_info, strict),
        }
    }

    fn is_excluded(&mut self, doc_id: DocId) -> bool {
        self.multi.children[1..]
            .iter_mut()
            .any(|negative| negative.seek(doc_id))
    }

    fn seek_strict(&mut self, doc_id: DocId) {
        let end_id = self.multi.state.end_id();
        let mut candidate = doc_id;
        while candidate < end_id {
            let positive = &mut self.multi.children[0];
            if !positive.seek(candidate) {
                candidate = positive.doc_id().max(candidate + 1);
                continue;
            }
            if self.is_excluded(candidate) {
                candidate += 1;
                continue;
            }
            self.multi.state.set_doc_id(candidate);
            return;
        }
        self.multi.state.set_at_end();
    }

    fn seek_loose(&mut self, doc_id: DocId) {
        if self.multi.children[0].seek(doc_id) && !self.is_excluded(doc_id) {
            self.multi.state.set_doc_id(doc_id);
        }
    }
}

impl SearchIterator for AndNotSearch {
    fn state(&self) -> &IteratorState {
        &self.multi.state
    }

    fn state_mut(&mut self) -> &mut IteratorState {
        &mut self.multi.state
    }

    fn kind(&self) -> IteratorKind {
        IteratorKind::AndNot
    }

    fn class_name(&self) -> &'static str {
        const NAMES: [[&str; 3]; 2] = [
            [
                "AndNotSearchNoStrict<FullUnpack>",
                "AndNotSearchNoStrict<SelectiveUnpack>",
                "AndNotSearchNoStrict<NoUnpack>",
            ],
            [
                "AndNotSearchStrict<FullUnpack>",
                "AndNotSearchStrict<SelectiveUnpack>",
                "AndNotSearchStrict<NoUnpack>",
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
        if self.multi.need_unpack(0) {
            let positive = &mut self.multi.children[0];
            if positive.seek(doc_id) {
                positive.unpack(doc_id);
            }
        }
    }

    /// Forwards the filter to the positive child.
    fn and_with(
        &mut self,
        filter: Box<dyn SearchIterator>,
        estimate: u32,
    ) -> Option<Box<dyn SearchIterator>> {
        self.multi.children[0].and_with(filter, estimate)
    }

    fn as_multi(&self) -> Option<&MultiSearch> {
        Some(&self.multi)
    }

    fn as_multi_mut(&mut self) -> Option<&mut MultiSearch> {
        Some(&mut self.multi)
    }
}
