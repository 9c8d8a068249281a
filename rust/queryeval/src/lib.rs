//! Boolean query evaluation over lazy posting-list iterators.
//!
//! A query is evaluated by a tree of [`SearchIterator`]s: leaves produce ascending
//! document ids (bit vectors, match-everything, match-nothing) and composites combine
//! them ([`AndSearch`], [`OrSearch`], [`AndNotSearch`]). Before evaluation the tree is
//! passed once through [`optimize`], which fuses bit-vector children of a composite
//! into a single [`MultiBitVectorIterator`] that evaluates the boolean word-wise.
//!
//! ```
//! use std::sync::Arc;
//! use queryeval::{AndSearch, BitVectorIterator, SearchIterator, TermFieldMatchData, optimize};
//! use queryeval_bitvector::BitVector;
//!
//! let a = Arc::new(BitVector::from_positions([1, 5, 9], 16));
//! let b = Arc::new(BitVector::from_positions([5, 9, 12], 16));
//! let tfmd = Arc::new(TermFieldMatchData::new());
//! let query = AndSearch::create(
//!     vec![
//!         BitVectorIterator::create(a, tfmd.clone(), true, false),
//!         BitVectorIterator::create(b, tfmd.clone(), true, false),
//!     ],
//!     true,
//! );
//! let mut query = optimize(query);
//! query.init_full_range();
//! let mut hits = Vec::new();
//! let mut doc_id = query.seek_first(1);
//! while !query.is_at_end() {
//!     hits.push(doc_id);
//!     doc_id = query.seek_next(doc_id + 1);
//! }
//! assert_eq!(hits, vec![5, 9]);
//! ```

pub mod and_not_search;
pub mod and_search;
pub mod bit_vector_iterator;
pub mod config;
pub mod empty_search;
pub mod explain;
pub mod match_data;
pub mod multi_bit_vector;
pub mod multi_search;
pub mod optimizer;
pub mod or_search;
pub mod search_iterator;
pub mod trinary;
pub mod true_search;
pub mod unpack_info;

#[cfg(test)]
mod tests;

pub use and_not_search::AndNotSearch;
pub use and_search::AndSearch;
pub use bit_vector_iterator::BitVectorIterator;
pub use config::OptimizerConfig;
pub use empty_search::EmptySearch;
pub use explain::describe_tree;
pub use match_data::TermFieldMatchData;
pub use multi_bit_vector::{BitOp, MultiBitVectorIterator};
pub use multi_search::{Children, MultiSearch};
pub use optimizer::{optimize, optimize_with};
pub use or_search::OrSearch;
pub use search_iterator::{
    BEGIN_DOC_ID, DocId, END_DOC_ID, IteratorKind, IteratorState, SearchIterator,
};
pub use trinary::Trinary;
pub use true_search::TrueSearch;
pub use unpack_info::UnpackInfo;
