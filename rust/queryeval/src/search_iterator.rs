//! The search iterator capability: a cursor over ascending matching document ids.

use itertools::Itertools;

use crate::{
    bit_vector_iterator::BitVectorIterator, multi_search::MultiSearch, trinary::Trinary,
};

/// Document identifier. Valid ids are in `[1, doc_id_limit)`.
pub type DocId = u32;

/// Sentinel for "not yet positioned".
pub const BEGIN_DOC_ID: DocId = 0;

/// Cursor position of an iterator that has passed the end of its range.
pub const END_DOC_ID: DocId = DocId::MAX;

/// Variant tag of a search iterator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IteratorKind {
    BitVector,
    And,
    Or,
    AndNot,
    Empty,
    True,
    MultiBitVector,
}

/// Cursor state shared by every iterator.
///
/// `doc_id` is the current position, `[begin_id, end_id)` the range set by the
/// last `init_range`, and `id` an opaque tag used only for diagnostics.
#[derive(Debug, Clone, Default)]
pub struct IteratorState {
    doc_id: DocId,
    begin_id: DocId,
    end_id: DocId,
    id: u32,
}

impl IteratorState {
    pub fn new() -> IteratorState {
        IteratorState::default()
    }

    #[inline]
    pub fn doc_id(&self) -> DocId {
        self.doc_id
    }

    #[inline]
    pub fn begin_id(&self) -> DocId {
        self.begin_id
    }

    #[inline]
    pub fn end_id(&self) -> DocId {
        self.end_id
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.doc_id >= self.end_id
    }

    /// Whether `init_range` has been called.
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.begin_id != BEGIN_DOC_ID
    }

    #[inline]
    pub fn set_doc_id(&mut self, doc_id: DocId) {
        self.doc_id = doc_id;
    }

    #[inline]
    pub fn set_at_end(&mut self) {
        self.doc_id = END_DOC_ID;
    }

    #[inline]
    pub fn set_end_id(&mut self, end_id: DocId) {
        self.end_id = end_id;
    }

    pub fn init_range(&mut self, begin_id: DocId, end_id: DocId) {
        debug_assert!(begin_id > BEGIN_DOC_ID, "range must start at doc id 1 or later");
        self.begin_id = begin_id;
        self.end_id = end_id;
        self.doc_id = begin_id - 1;
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn set_id(&mut self, id: u32) {
        self.id = id;
    }
}

/// A lazy cursor over an ascending, sparse sequence of matching document ids.
///
/// Implementors provide [`do_seek`](SearchIterator::do_seek) and
/// [`do_unpack`](SearchIterator::do_unpack); callers drive the iterator through the
/// provided [`seek`](SearchIterator::seek), [`seek_first`](SearchIterator::seek_first),
/// [`seek_next`](SearchIterator::seek_next) and [`unpack`](SearchIterator::unpack).
///
/// # Strictness
///
/// After a failed `seek(d)` a strict iterator is positioned on its next hit at or
/// after `d` (or at end), so the caller can read the new position from `doc_id()`.
/// A non-strict iterator only answers whether `d` matches and may leave the cursor
/// anywhere at or before `d`.
///
/// # Lifecycle
///
/// An iterator must be range-initialized once with `init_range` or
/// `init_full_range` before the first seek. Seeks move forward only.
pub trait SearchIterator: Send {
    fn state(&self) -> &IteratorState;

    fn state_mut(&mut self) -> &mut IteratorState;

    fn kind(&self) -> IteratorKind;

    /// Human readable implementation name, including the strictness and unpack
    /// strategy chosen at construction.
    fn class_name(&self) -> &'static str;

    /// The seek contract this iterator was built to honor.
    fn is_strict(&self) -> Trinary;

    /// Moves towards `doc_id`. Only called with `doc_id` greater than the current
    /// position and below the end of the range.
    fn do_seek(&mut self, doc_id: DocId);

    /// Publishes match data for the hit at `doc_id`.
    fn do_unpack(&mut self, doc_id: DocId);

    /// Sets the iteration bounds to `[begin_id, end_id)` and positions the cursor
    /// just before `begin_id`. Composites forward the range to their children.
    fn init_range(&mut self, begin_id: DocId, end_id: DocId) {
        self.state_mut().init_range(begin_id, end_id);
    }

    /// Tries to absorb `filter` as an additional AND term.
    ///
    /// Returns `None` when the filter was absorbed and `Some(filter)`, handing the
    /// filter back, when this iterator cannot take it.
    fn and_with(
        &mut self,
        filter: Box<dyn SearchIterator>,
        estimate: u32,
    ) -> Option<Box<dyn SearchIterator>> {
        let _ = estimate;
        Some(filter)
    }

    fn as_multi(&self) -> Option<&MultiSearch> {
        None
    }

    fn as_multi_mut(&mut self) -> Option<&mut MultiSearch> {
        None
    }

    fn as_bit_vector(&self) -> Option<&BitVectorIterator> {
        None
    }

    /// Appends the ids of the iterators this one has absorbed.
    fn collect_id_refs(&self, refs: &mut Vec<u32>) {
        let _ = refs;
    }

    fn children(&self) -> &[Box<dyn SearchIterator>] {
        match self.as_multi() {
            Some(multi) => multi.children(),
            None => &[],
        }
    }

    /// Replaces every child with `f(child)`, preserving order.
    fn transform_children(
        &mut self,
        f: &mut dyn FnMut(Box<dyn SearchIterator>) -> Box<dyn SearchIterator>,
    ) {
        if let Some(multi) = self.as_multi_mut() {
            multi.transform_children(f);
        }
    }

    #[inline]
    fn doc_id(&self) -> DocId {
        self.state().doc_id()
    }

    #[inline]
    fn end_id(&self) -> DocId {
        self.state().end_id()
    }

    #[inline]
    fn is_at_end(&self) -> bool {
        self.state().is_at_end()
    }

    fn init_full_range(&mut self) {
        self.init_range(1, END_DOC_ID);
    }

    /// Tries to position the iterator exactly at `doc_id` and returns whether it
    /// matches.
    #[inline]
    fn seek(&mut self, doc_id: DocId) -> bool {
        if doc_id > self.doc_id() {
            if doc_id >= self.end_id() {
                self.state_mut().set_at_end();
            } else {
                self.do_seek(doc_id);
            }
        }
        doc_id == self.doc_id() && doc_id < self.end_id()
    }

    /// Starts a full traversal, returning the first hit at or after `doc_id`.
    fn seek_first(&mut self, doc_id: DocId) -> DocId {
        self.seek_next(doc_id)
    }

    /// Returns the next hit at or after `doc_id` (and at or after the start of the
    /// range), or a position at or beyond `end_id()` when there is none.
    fn seek_next(&mut self, doc_id: DocId) -> DocId {
        let mut doc_id = doc_id.max(self.state().begin_id());
        while !self.seek(doc_id) && !self.is_at_end() {
            doc_id = self.doc_id().max(doc_id.saturating_add(1));
        }
        self.doc_id()
    }

    /// Publishes match data for the current hit. Only valid right after a
    /// successful `seek(doc_id)`.
    fn unpack(&mut self, doc_id: DocId) {
        self.do_unpack(doc_id);
    }

    fn id(&self) -> u32 {
        self.state().id()
    }

    fn set_id(&mut self, id: u32) {
        self.state_mut().set_id(id);
    }

    /// Renders `"[id]"`, followed by the ids of absorbed iterators for fused nodes
    /// (`"[7,3,5]"`). An unset own id is left out when absorbed ids are listed.
    fn make_id_ref_str(&self) -> String {
        let mut refs = Vec::new();
        self.collect_id_refs(&mut refs);
        let own = (self.id() != 0 || refs.is_empty()).then_some(self.id());
        format!("[{}]", own.into_iter().chain(refs).join(","))
    }
}
