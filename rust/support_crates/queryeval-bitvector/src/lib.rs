pub mod bit_vector;
#[cfg(test)]
mod tests;

pub use bit_vector::{BitVector, BitVectorIter};
