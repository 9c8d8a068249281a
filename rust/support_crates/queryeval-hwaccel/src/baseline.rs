use crate::{BitAccelerator, CHUNK_WORDS, Chunk, ChunkSource};

const UNROLL: usize = 8;

/// Portable scalar implementation of [`BitAccelerator`].
#[derive(Debug, Default, Clone, Copy)]
pub struct BaselineAccelerator;

#[inline]
fn bit_operation(a: &mut [u64], b: &[u64], op: impl Fn(u64, u64) -> u64) {
    assert_eq!(a.len(), b.len(), "operand length mismatch");
    let mut a_chunks = a.chunks_exact_mut(UNROLL);
    let mut b_chunks = b.chunks_exact(UNROLL);
    for (a8, b8) in (&mut a_chunks).zip(&mut b_chunks) {
        for j in 0..UNROLL {
            a8[j] = op(a8[j], b8[j]);
        }
    }
    for (x, y) in a_chunks
        .into_remainder()
        .iter_mut()
        .zip(b_chunks.remainder())
    {
        *x = op(*x, *y);
    }
}

impl BitAccelerator for BaselineAccelerator {
    fn or_bit(&self, a: &mut [u64], b: &[u64]) {
        bit_operation(a, b, |x, y| x | y);
    }

    fn and_bit(&self, a: &mut [u64], b: &[u64]) {
        bit_operation(a, b, |x, y| x & y);
    }

    fn and_not_bit(&self, a: &mut [u64], b: &[u64]) {
        bit_operation(a, b, |x, y| x & !y);
    }

    fn not_bit(&self, a: &mut [u64]) {
        for word in a.iter_mut() {
            *word = !*word;
        }
    }

    fn population_count(&self, a: &[u64]) -> usize {
        let mut chunks = a.chunks_exact(UNROLL);
        let mut partial = [0usize; UNROLL];
        for c in &mut chunks {
            for j in 0..UNROLL {
                partial[j] += c[j].count_ones() as usize;
            }
        }
        let tail: usize = chunks
            .remainder()
            .iter()
            .map(|w| w.count_ones() as usize)
            .sum();
        partial.iter().sum::<usize>() + tail
    }

    fn and128(&self, offset: usize, sources: &[ChunkSource<'_>], dest: &mut Chunk) {
        dest.fill(u64::MAX);
        for source in sources {
            for (i, d) in dest.iter_mut().enumerate() {
                *d &= source.word(offset + i);
            }
        }
    }

    fn or128(&self, offset: usize, sources: &[ChunkSource<'_>], dest: &mut Chunk) {
        *dest = [0u64; CHUNK_WORDS];
        for source in sources {
            for (i, d) in dest.iter_mut().enumerate() {
                *d |= source.word(offset + i);
            }
        }
    }

    fn target_name(&self) -> &'static str {
        "Baseline"
    }
}
