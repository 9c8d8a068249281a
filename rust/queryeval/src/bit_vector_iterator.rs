//! Leaf iterator over the set (or, when inverted, cleared) bits of a bit vector.

use std::sync::Arc;

use queryeval_bitvector::BitVector;

use crate::{
    match_data::TermFieldMatchData,
    search_iterator::{DocId, IteratorKind, IteratorState, SearchIterator},
    trinary::Trinary,
};

/// Iterates the documents whose bit is set in a shared [`BitVector`], or cleared
/// when `inverted`.
///
/// Document ids at or beyond the doc id limit never match; the limit defaults to
/// the vector length. A strict iterator scans words forward to the next hit, a
/// non-strict one tests only the requested bit.
pub struct BitVectorIterator {
    state: IteratorState,
    bit_vector: Arc<BitVector>,
    doc_id_limit: DocId,
    tfmd: Arc<TermFieldMatchData>,
    strict: bool,
    inverted: bool,
}

impl BitVectorIterator {
    pub fn create(
        bit_vector: Arc<BitVector>,
        tfmd: Arc<TermFieldMatchData>,
        strict: bool,
        inverted: bool,
    ) -> Box<dyn SearchIterator> {
        let doc_id_limit = limit_of(&bit_vector);
        Box::new(Self::new(bit_vector, doc_id_limit, tfmd, strict, inverted))
    }

    pub fn create_with_limit(
        bit_vector: Arc<BitVector>,
        doc_id_limit: DocId,
        tfmd: Arc<TermFieldMatchData>,
        strict: bool,
        inverted: bool,
    ) -> Box<dyn SearchIterator> {
        Box::new(Self::new(bit_vector, doc_id_limit, tfmd, strict, inverted))
    }

    /// Creates the iterator. A `doc_id_limit` beyond the vector length is clamped
    /// to it.
    pub fn new(
        bit_vector: Arc<BitVector>,
        doc_id_limit: DocId,
        tfmd: Arc<TermFieldMatchData>,
        strict: bool,
        inverted: bool,
    ) -> BitVectorIterator {
        let doc_id_limit = doc_id_limit.min(limit_of(&bit_vector));
        BitVectorIterator {
            state: IteratorState::new(),
            bit_vector,
            doc_id_limit,
            tfmd,
            strict,
            inverted,
        }
    }

    pub fn bit_vector(&self) -> &Arc<BitVector> {
        &self.bit_vector
    }

    pub fn doc_id_limit(&self) -> DocId {
        self.doc_id_limit
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    pub fn match_data(&self) -> &Arc<TermFieldMatchData> {
        &self.tfmd
    }

    #[inline]
    fn is_hit(&self, doc_id: DocId) -> bool {
        self.bit_vector.test_bit(doc_id as usize) != self.inverted
    }
}

impl SearchIterator for BitVectorIterator {
    fn state(&self) -> &IteratorState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut IteratorState {
        &mut self.state
    }

    fn kind(&self) -> IteratorKind {
        IteratorKind::BitVector
    }

    fn class_name(&self) -> &'static str {
        match (self.strict, self.inverted) {
            (false, false) => "BitVectorIteratorNoStrict",
            (false, true) => "BitVectorIteratorNoStrict<Inverted>",
            (true, false) => "BitVectorIteratorStrict",
            (true, true) => "BitVectorIteratorStrict<Inverted>",
        }
    }

    fn is_strict(&self) -> Trinary {
        self.strict.into()
    }

    fn init_range(&mut self, begin_id: DocId, end_id: DocId) {
        self.state
            .init_range(begin_id, end_id.min(self.doc_id_limit));
    }

    fn do_seek(&mut self, doc_id: DocId) {
        if !self.strict {
            if self.is_hit(doc_id) {
                self.state.set_doc_id(doc_id);
            }
            return;
        }
        let start = doc_id as usize;
        let next = if self.inverted {
            self.bit_vector.next_false_bit(start)
        } else {
            self.bit_vector.next_true_bit(start)
        };
        if next >= self.state.end_id() as usize {
            self.state.set_at_end();
        } else {
            self.state.set_doc_id(next as DocId);
        }
    }

    fn do_unpack(&mut self, doc_id: DocId) {
        self.tfmd.reset_only_doc_id(doc_id);
    }

    fn as_bit_vector(&self) -> Option<&BitVectorIterator> {
        Some(self)
    }
}

fn limit_of(bit_vector: &BitVector) -> DocId {
    DocId::try_from(bit_vector.len()).unwrap_or(DocId::MAX)
}
