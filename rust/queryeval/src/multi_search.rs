//! Shared state of the boolean composites: ordered children plus unpack selection.

use crate::{
    search_iterator::{DocId, IteratorState, SearchIterator},
    unpack_info::UnpackInfo,
};

/// Exclusively owned child iterators, in evaluation order.
pub type Children = Vec<Box<dyn SearchIterator>>;

/// The composite base embedded by [`AndSearch`](crate::AndSearch),
/// [`OrSearch`](crate::OrSearch), [`AndNotSearch`](crate::AndNotSearch) and the
/// fused [`MultiBitVectorIterator`](crate::MultiBitVectorIterator).
pub struct MultiSearch {
    pub(crate) state: IteratorState,
    pub(crate) children: Children,
    pub(crate) unpack_info: UnpackInfo,
    pub(crate) strict: bool,
}

impl MultiSearch {
    pub fn new(children: Children, unpack_info: UnpackInfo, strict: bool) -> MultiSearch {
        debug_assert!(
            unpack_info.unpack_all() || unpack_info.indices().all(|i| i < children.len()),
            "unpack index beyond child count {}: {unpack_info}",
            children.len()
        );
        MultiSearch {
            state: IteratorState::new(),
            children,
            unpack_info,
            strict,
        }
    }

    pub fn children(&self) -> &[Box<dyn SearchIterator>] {
        &self.children
    }

    pub fn unpack_info(&self) -> &UnpackInfo {
        &self.unpack_info
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn need_unpack(&self, index: usize) -> bool {
        self.unpack_info.need_unpack(index)
    }

    /// Takes the child at `index` out of the composite.
    pub fn remove(&mut self, index: usize) -> Box<dyn SearchIterator> {
        self.unpack_info.remove(index);
        self.children.remove(index)
    }

    /// Inserts `child` at `index` and marks it as needing unpack. The child is
    /// range-initialized to the composite's current range when the composite has
    /// already been initialized.
    pub fn insert(&mut self, index: usize, mut child: Box<dyn SearchIterator>) {
        let index = index.min(self.children.len());
        if self.state.is_initialized() {
            child.init_range(self.state.begin_id(), self.state.end_id());
        }
        self.unpack_info.insert(index, true);
        self.children.insert(index, child);
    }

    pub(crate) fn init_range(&mut self, begin_id: DocId, end_id: DocId) {
        self.state.init_range(begin_id, end_id);
        for child in self.children.iter_mut() {
            child.init_range(begin_id, end_id);
        }
    }

    /// Unpacks every selected child that matches `doc_id`.
    pub(crate) fn unpack_children(&mut self, doc_id: DocId) {
        let count = self.children.len();
        let children = &mut self.children;
        self.unpack_info.each(
            |index| {
                let child = &mut children[index];
                if child.seek(doc_id) {
                    child.unpack(doc_id);
                }
            },
            count,
        );
    }

    pub(crate) fn transform_children(
        &mut self,
        f: &mut dyn FnMut(Box<dyn SearchIterator>) -> Box<dyn SearchIterator>,
    ) {
        self.children = std::mem::take(&mut self.children)
            .into_iter()
            .map(|child| f(child))
            .collect();
    }

    pub(crate) fn offer_filter_to_children(
        &mut self,
        filter: Box<dyn SearchIterator>,
        estimate: u32,
    ) -> Option<Box<dyn SearchIterator>> {
        let mut filter = filter;
        for child in self.children.iter_mut() {
            filter = child.and_with(filter, estimate)?;
        }
        Some(filter)
    }
}
