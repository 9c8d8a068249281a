//! A fixed-capacity bit vector over document ids.

use std::ops::Range;

use queryeval_common::verify_arg;
use queryeval_hwaccel::{ChunkSource, get_accelerator};

/// A fixed-capacity array of bits with `[u64]` storage, indexed by document id.
///
/// Bit `i` is set if and only if document `i` matches. The vector never grows:
/// its capacity (`len`) is the number of representable document ids and is fixed
/// at construction.
///
/// Document `i` lives in bit `i % 64` (LSB first) of word `i / 64`, so a word
/// read from [`storage`](BitVector::storage) covers 64 consecutive documents.
/// Exactly `len.div_ceil(64)` words are allocated and the unused high bits of the
/// last word stay 0 through every operation.
///
/// Whole-vector operations (`invert`, `and_with`, `or_with`, `and_not_with`,
/// `count_true_bits`) are routed through the process-wide
/// [`BitAccelerator`](queryeval_hwaccel::BitAccelerator).
#[derive(Clone, PartialEq, Eq)]
pub struct BitVector {
    len: usize,
    bits: Box<[u64]>,
}

impl BitVector {
    /// Creates a new bit vector with all bits cleared.
    ///
    /// # Arguments
    ///
    /// * `len` - The number of bits (document ids) in the vector
    pub fn create(len: usize) -> BitVector {
        let count = len.div_ceil(64);
        BitVector {
            len,
            bits: vec![0u64; count].into_boxed_slice(),
        }
    }

    /// Creates a new bit vector with all bits set.
    pub fn full(len: usize) -> BitVector {
        let mut bv = BitVector {
            len,
            bits: vec![u64::MAX; len.div_ceil(64)].into_boxed_slice(),
        };
        Self::mask_tail(&mut bv.bits, len);
        bv
    }

    /// Creates a new bit vector with bits set at the specified positions.
    ///
    /// # Panics
    ///
    /// Panics (in debug builds) if any position is >= `len`.
    pub fn from_positions(positions: impl IntoIterator<Item = usize>, len: usize) -> BitVector {
        let mut bv = BitVector::create(len);
        for position in positions {
            bv.set_bit(position);
        }
        bv
    }

    /// Creates a new bit vector from `u64` words in LSB order.
    ///
    /// Only the first `len.div_ceil(64)` words are used, and any bits beyond `len`
    /// are masked to 0.
    ///
    /// # Panics
    ///
    /// Panics if `len > words.len() * 64`.
    pub fn from_lsb_words(words: &[u64], len: usize) -> BitVector {
        assert!(len <= words.len() * 64);
        let count = len.div_ceil(64);
        let mut bits = words[..count].to_vec().into_boxed_slice();
        Self::mask_tail(&mut bits, len);
        BitVector { len, bits }
    }

    /// Fallible variant of [`BitVector::from_lsb_words`] for untrusted input.
    pub fn try_from_lsb_words(words: &[u64], len: usize) -> queryeval_common::Result<BitVector> {
        verify_arg!(len, len <= words.len() * 64);
        Ok(Self::from_lsb_words(words, len))
    }

    /// Returns the number of bits in the vector.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the vector has zero capacity.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Sets the bit at the given index to 1.
    #[inline]
    pub fn set_bit(&mut self, index: usize) {
        let (word_index, mask) = self.locate(index);
        self.bits[word_index] |= mask;
    }

    /// Clears the bit at the given index.
    #[inline]
    pub fn clear_bit(&mut self, index: usize) {
        let (word_index, mask) = self.locate(index);
        self.bits[word_index] &= !mask;
    }

    /// Checks if the bit at the given index is set.
    #[inline]
    pub fn test_bit(&self, index: usize) -> bool {
        let (word_index, mask) = self.locate(index);
        self.bits[word_index] & mask != 0
    }

    /// Sets all bits in `[range.start, range.end)`.
    ///
    /// # Panics
    ///
    /// Panics if `range.end > self.len()`.
    pub fn set_interval(&mut self, range: Range<usize>) {
        self.apply_to_interval(range, |word, mask| *word |= mask);
    }

    /// Clears all bits in `[range.start, range.end)`.
    ///
    /// # Panics
    ///
    /// Panics if `range.end > self.len()`.
    pub fn clear_interval(&mut self, range: Range<usize>) {
        self.apply_to_interval(range, |word, mask| *word &= !mask);
    }

    /// Calls `apply(word, mask)` for every storage word overlapping `range`, with
    /// `mask` selecting the bits of the word inside the range.
    fn apply_to_interval(&mut self, range: Range<usize>, apply: impl Fn(&mut u64, u64)) {
        if range.is_empty() {
            return;
        }
        assert!(
            range.end <= self.len,
            "interval {range:?} exceeds bit vector of {} bits",
            self.len
        );
        let first = range.start / 64;
        let last = (range.end - 1) / 64;
        for (word_index, word) in self.bits[first..=last].iter_mut().enumerate() {
            let word_index = first + word_index;
            let lo = range.start.max(word_index * 64) - word_index * 64;
            let hi = range.end.min(word_index * 64 + 64) - word_index * 64;
            apply(word, low_bits(hi) & !low_bits(lo));
        }
    }

    /// Flips all bits in place.
    pub fn invert(&mut self) {
        get_accelerator().not_bit(&mut self.bits);
        Self::mask_tail(&mut self.bits, self.len);
    }

    /// In-place intersection with a vector of the same length.
    pub fn and_with(&mut self, other: &BitVector) {
        self.assert_same_len(other);
        get_accelerator().and_bit(&mut self.bits, &other.bits);
    }

    /// In-place union with a vector of the same length.
    pub fn or_with(&mut self, other: &BitVector) {
        self.assert_same_len(other);
        get_accelerator().or_bit(&mut self.bits, &other.bits);
    }

    /// In-place difference (`self & !other`) with a vector of the same length.
    pub fn and_not_with(&mut self, other: &BitVector) {
        self.assert_same_len(other);
        get_accelerator().and_not_bit(&mut self.bits, &other.bits);
    }

    /// Counts the number of set bits.
    pub fn count_true_bits(&self) -> usize {
        get_accelerator().population_count(&self.bits)
    }

    /// Returns the position of the first set bit at or after `start`, or `len()`
    /// if there is none.
    pub fn next_true_bit(&self, start: usize) -> usize {
        self.scan_from(start, |w| w)
    }

    /// Returns the position of the first cleared bit at or after `start`, or `len()`
    /// if there is none.
    pub fn next_false_bit(&self, start: usize) -> usize {
        self.scan_from(start, |w| !w)
    }

    #[inline]
    fn scan_from(&self, start: usize, transform: impl Fn(u64) -> u64) -> usize {
        if start >= self.len {
            return self.len;
        }
        let mut word_index = start / 64;
        let mut word = transform(self.bits[word_index]) & !low_bits(start % 64);
        loop {
            if word != 0 {
                let found = word_index * 64 + word.trailing_zeros() as usize;
                // Inverted tail bits beyond len may show up as set.
                return found.min(self.len);
            }
            word_index += 1;
            if word_index >= self.bits.len() {
                return self.len;
            }
            word = transform(self.bits[word_index]);
        }
    }

    /// Returns word `index` of the underlying storage.
    #[inline]
    pub fn word(&self, index: usize) -> u64 {
        self.bits[index]
    }

    /// Returns the underlying `u64` storage.
    ///
    /// The number of words is `len.div_ceil(64)`; bits beyond `len` in the last
    /// word are 0.
    #[inline]
    pub fn storage(&self) -> &[u64] {
        &self.bits
    }

    /// Returns this vector as an operand for the chunked accelerator kernels.
    pub fn chunk_source(&self, inverted: bool) -> ChunkSource<'_> {
        ChunkSource::new(&self.bits, self.len, inverted)
    }

    /// Returns an iterator over the positions of set bits, in ascending order.
    pub fn iter(&self) -> BitVectorIter<'_> {
        BitVectorIter {
            bit_vector: self,
            position: 0,
        }
    }

    /// Word index and single-bit mask of document `index`.
    #[inline]
    fn locate(&self, index: usize) -> (usize, u64) {
        debug_assert!(
            index < self.len,
            "doc id {index} outside bit vector of {} bits",
            self.len
        );
        (index / 64, 1u64 << (index % 64))
    }

    fn assert_same_len(&self, other: &BitVector) {
        assert_eq!(
            self.len, other.len,
            "BitVectors must have the same length: {} != {}",
            self.len, other.len
        );
    }

    /// Clears the unused high bits of the last storage word.
    fn mask_tail(bits: &mut [u64], len: usize) {
        if let (Some(last), tail @ 1..) = (bits.last_mut(), len % 64) {
            *last &= low_bits(tail);
        }
    }
}

/// A mask of the lowest `count` bits, `count` in `0..=64`.
#[inline]
fn low_bits(count: usize) -> u64 {
    match count {
        64.. => u64::MAX,
        _ => (1u64 << count) - 1,
    }
}

impl std::fmt::Debug for BitVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitVector")
            .field("len", &self.len)
            .field("true_bits", &self.count_true_bits())
            .finish()
    }
}

/// Ascending positions of the set bits of a [`BitVector`].
#[derive(Clone)]
pub struct BitVectorIter<'a> {
    bit_vector: &'a BitVector,
    position: usize,
}

impl Iterator for BitVectorIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let hit = self.bit_vector.next_true_bit(self.position);
        if hit >= self.bit_vector.len() {
            self.position = hit;
            return None;
        }
        self.position = hit + 1;
        Some(hit)
    }
}
