//! Bit-level primitive kernels used by bit vectors and fused bit-vector iterators.
//!
//! The kernels sit behind the [`BitAccelerator`] trait so that a platform specific
//! backend can be swapped in without touching callers. Every backend must produce
//! bit-exact results identical to the portable baseline returned by
//! [`create_platform_baseline_accelerator`].
//!
//! Callers normally go through [`get_accelerator`], which picks a backend once per
//! process and hands out a `'static` reference to it.

use std::sync::OnceLock;

mod baseline;
#[cfg(test)]
mod tests;

pub use baseline::BaselineAccelerator;

/// Number of `u64` words processed by [`BitAccelerator::and128`] and
/// [`BitAccelerator::or128`] (128 bytes).
pub const CHUNK_WORDS: usize = 16;

/// Destination buffer for the chunked multi-source kernels.
pub type Chunk = [u64; CHUNK_WORDS];

/// One operand of a chunked multi-source combination.
///
/// A source yields its bit (complemented when `inverted` is set) for every position
/// below `len`, and `0` for every position at or beyond `len`, regardless of
/// inversion. `words` must hold at least `len.div_ceil(64)` words.
#[derive(Debug, Clone, Copy)]
pub struct ChunkSource<'a> {
    pub words: &'a [u64],
    pub len: usize,
    pub inverted: bool,
}

impl<'a> ChunkSource<'a> {
    pub fn new(words: &'a [u64], len: usize, inverted: bool) -> ChunkSource<'a> {
        debug_assert!(words.len() * 64 >= len);
        ChunkSource {
            words,
            len,
            inverted,
        }
    }

    /// Returns word `index` of this source with inversion and the length bound applied.
    #[inline]
    pub fn word(&self, index: usize) -> u64 {
        let base = index * 64;
        if base >= self.len {
            return 0;
        }
        let raw = self.words[index];
        let value = if self.inverted { !raw } else { raw };
        let remaining = self.len - base;
        if remaining >= 64 {
            value
        } else {
            value & ((1u64 << remaining) - 1)
        }
    }
}

/// Primitive bit operations with possibly hardware-specific implementations.
pub trait BitAccelerator: Send + Sync {
    /// `a[i] |= b[i]` for every word.
    fn or_bit(&self, a: &mut [u64], b: &[u64]);

    /// `a[i] &= b[i]` for every word.
    fn and_bit(&self, a: &mut [u64], b: &[u64]);

    /// `a[i] &= !b[i]` for every word.
    fn and_not_bit(&self, a: &mut [u64], b: &[u64]);

    /// `a[i] = !a[i]` for every word.
    fn not_bit(&self, a: &mut [u64]);

    /// Number of set bits in `a`.
    fn population_count(&self, a: &[u64]) -> usize;

    /// ANDs the chunk starting at word `offset` of every source into `dest`.
    ///
    /// With no sources, `dest` is filled with ones.
    fn and128(&self, offset: usize, sources: &[ChunkSource<'_>], dest: &mut Chunk);

    /// ORs the chunk starting at word `offset` of every source into `dest`.
    fn or128(&self, offset: usize, sources: &[ChunkSource<'_>], dest: &mut Chunk);

    /// Short name of the backend, for diagnostics.
    fn target_name(&self) -> &'static str {
        "Unknown"
    }
}

/// Creates the portable scalar backend.
pub fn create_platform_baseline_accelerator() -> Box<dyn BitAccelerator> {
    Box::new(BaselineAccelerator)
}

/// Returns the process-wide accelerator, selecting it on first use.
pub fn get_accelerator() -> &'static dyn BitAccelerator {
    static ACCELERATOR: OnceLock<Box<dyn BitAccelerator>> = OnceLock::new();
    ACCELERATOR
        .get_or_init(|| {
            let accelerator = create_platform_baseline_accelerator();
            log::debug!("selected bit accelerator '{}'", accelerator.target_name());
            accelerator
        })
        .as_ref()
}
