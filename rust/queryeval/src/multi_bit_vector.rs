//! The fused iterator that evaluates an AND or OR over several bit vectors word by
//! word.

use std::sync::Arc;

use queryeval_bitvector::BitVector;
use queryeval_hwaccel::{CHUNK_WORDS, Chunk, ChunkSource, get_accelerator};

use crate::{
    bit_vector_iterator::BitVectorIterator,
    multi_search::{Children, MultiSearch},
    search_iterator::{DocId, IteratorKind, IteratorState, SearchIterator},
    trinary::Trinary,
    unpack_info::UnpackInfo,
};

/// How the member bit vectors of a [`MultiBitVectorIterator`] are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitOp {
    And,
    Or,
}

/// One bit vector operand of a fused iterator.
///
/// Yields the vector's bits (complemented when `inverted`) below `len` and zero
/// from `len` on.
#[derive(Debug, Clone)]
pub(crate) struct BitSource {
    bit_vector: Arc<BitVector>,
    len: usize,
    inverted: bool,
}

impl BitSource {
    /// Describes the hits of `iterator`, or their complement within the iterator's
    /// doc id limit when `negated`.
    pub(crate) fn of(iterator: &BitVectorIterator, negated: bool) -> BitSource {
        BitSource {
            bit_vector: iterator.bit_vector().clone(),
            len: iterator.doc_id_limit() as usize,
            inverted: iterator.is_inverted() != negated,
        }
    }

    fn chunk_source(&self) -> ChunkSource<'_> {
        ChunkSource::new(self.bit_vector.storage(), self.len, self.inverted)
    }
}

/// A single iterator standing in for several [`BitVectorIterator`]s of a
/// composite.
///
/// Matches are computed a chunk of [`CHUNK_WORDS`] words at a time through the
/// process-wide bit accelerator and cached, so a strict scan touches every member
/// vector once per chunk instead of once per document. The absorbed iterators are
/// kept as children: they receive the unpack calls and provide the ids reported
/// by [`make_id_ref_str`](SearchIterator::make_id_ref_str).
///
/// Built by the optimizer; see [`optimize`](MultiBitVectorIterator::optimize).
pub struct MultiBitVectorIterator {
    multi: MultiSearch,
    op: BitOp,
    sources: Vec<BitSource>,
    doc_id_limit: DocId,
    chunk: Chunk,
    chunk_word: Option<usize>,
}

impl MultiBitVectorIterator {
    /// Rewrites `root` so that the bit-vector children of every composite are
    /// fused. See [`optimize`](crate::optimize).
    pub fn optimize(root: Box<dyn SearchIterator>) -> Box<dyn SearchIterator> {
        crate::optimizer::optimize(root)
    }

    /// Fuses `children`, whose bits are described by the matching entries of
    /// `sources`. The result is strict if any child was strict.
    pub(crate) fn new(
        op: BitOp,
        children: Children,
        sources: Vec<BitSource>,
        unpack_info: UnpackInfo,
    ) -> MultiBitVectorIterator {
        debug_assert_eq!(children.len(), sources.len());
        let strict = children
            .iter()
            .any(|child| child.is_strict() == Trinary::True);
        let doc_id_limit = Self::combined_limit(op, &sources);
        MultiBitVectorIterator {
            multi: MultiSearch::new(children, unpack_info, strict),
            op,
            sources,
            doc_id_limit,
            chunk: [0u64; CHUNK_WORDS],
            chunk_word: None,
        }
    }

    /// No document at or beyond this id can match.
    pub fn doc_id_limit(&self) -> DocId {
        self.doc_id_limit
    }

    fn combined_limit(op: BitOp, sources: &[BitSource]) -> DocId {
        let lens = sources.iter().map(|source| source.len);
        let limit = match op {
            BitOp::And => lens.min(),
            BitOp::Or => lens.max(),
        };
        DocId::try_from(limit.unwrap_or(0)).unwrap_or(DocId::MAX)
    }

    fn fill_chunk(&mut self, first_word: usize) {
        let sources = self
            .sources
            .iter()
            .map(BitSource::chunk_source)
            .collect::<Vec<_>>();
        let accelerator = get_accelerator();
        match self.op {
            BitOp::And => accelerator.and128(first_word, &sources, &mut self.chunk),
            BitOp::Or => accelerator.or128(first_word, &sources, &mut self.chunk),
        }
        self.chunk_word = Some(first_word);
    }

    #[inline]
    fn word(&mut self, index: usize) -> u64 {
        let first_word = index - index % CHUNK_WORDS;
        if self.chunk_word != Some(first_word) {
            self.fill_chunk(first_word);
        }
        self.chunk[index - first_word]
    }

    fn seek_strict(&mut self, doc_id: DocId) {
        let end = self.multi.state.end_id() as usize;
        let start = doc_id as usize;
        let mut index = start / 64;
        let mut word = self.word(index) & (u64::MAX << (start % 64));
        loop {
            if word != 0 {
                let hit = index * 64 + word.trailing_zeros() as usize;
                if hit < end {
                    self.multi.state.set_doc_id(hit as DocId);
                } else {
                    self.multi.state.set_at_end();
                }
                return;
            }
            index += 1;
            if index * 64 >= end {
                self.multi.state.set_at_end();
                return;
            }
            word = self.word(index);
        }
    }

    fn seek_loose(&mut self, doc_id: DocId) {
        let bit = doc_id as usize;
        if self.word(bit / 64) & (1u64 << (bit % 64)) != 0 {
            self.multi.state.set_doc_id(doc_id);
        }
    }
}

impl SearchIterator for MultiBitVectorIterator {
    fn state(&self) -> &IteratorState {
        &self.multi.state
    }

    fn state_mut(&mut self) -> &mut IteratorState {
        &mut self.multi.state
    }

    fn kind(&self) -> IteratorKind {
        IteratorKind::MultiBitVector
    }

    fn class_name(&self) -> &'static str {
        match (self.op, self.multi.strict) {
            (BitOp::And, false) => "MultiBitVectorIteratorNoStrict<And>",
            (BitOp::And, true) => "MultiBitVectorIteratorStrict<And>",
            (BitOp::Or, false) => "MultiBitVectorIteratorNoStrict<Or>",
            (BitOp::Or, true) => "MultiBitVectorIteratorStrict<Or>",
        }
    }

    fn is_strict(&self) -> Trinary {
        self.multi.strict.into()
    }

    fn init_range(&mut self, begin_id: DocId, end_id: DocId) {
        self.multi.init_range(begin_id, end_id);
        self.multi.state.set_end_id(end_id.min(self.doc_id_limit));
        self.chunk_word = None;
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

    /// An AND-fused iterator absorbs bit-vector filters as further members.
    fn and_with(
        &mut self,
        filter: Box<dyn SearchIterator>,
        estimate: u32,
    ) -> Option<Box<dyn SearchIterator>> {
        let _ = estimate;
        if self.op != BitOp::And {
            return Some(filter);
        }
        let Some(source) = filter.as_bit_vector().map(|bv| BitSource::of(bv, false)) else {
            return Some(filter);
        };
        self.sources.push(source);
        self.doc_id_limit = Self::combined_limit(self.op, &self.sources);
        if self.multi.state.is_initialized() {
            let end_id = self.multi.state.end_id().min(self.doc_id_limit);
            self.multi.state.set_end_id(end_id);
        }
        let index = self.multi.children.len();
        self.multi.insert(index, filter);
        self.chunk_word = None;
        None
    }

    fn as_multi(&self) -> Option<&MultiSearch> {
        Some(&self.multi)
    }

    fn as_multi_mut(&mut self) -> Option<&mut MultiSearch> {
        Some(&mut self.multi)
    }

    fn collect_id_refs(&self, refs: &mut Vec<u32>) {
        refs.extend(self.multi.children.iter().map(|child| child.id()));
    }
}
