//! Deterministic bit vector fixtures.

use queryeval_bitvector::BitVector;

/// The Park-Miller "minimal standard" linear congruential generator with
/// multiplier 48271 and modulus `2^31 - 1`.
///
/// Matches the usual `minstd_rand` sequence for the same seed, which keeps
/// fixture-derived hit counts stable.
#[derive(Debug, Clone)]
pub struct MinStdRand {
    state: u32,
}

impl MinStdRand {
    const MULTIPLIER: u64 = 48271;
    const MODULUS: u64 = 2_147_483_647;

    pub fn new(seed: u32) -> MinStdRand {
        let state = (seed as u64 % Self::MODULUS) as u32;
        MinStdRand {
            state: if state == 0 { 1 } else { state },
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = (self.state as u64 * Self::MULTIPLIER % Self::MODULUS) as u32;
        self.state
    }
}

/// Builds `count` vectors of `len` bits. Bit `j` of a vector is set when the
/// next generator output is odd; the generator runs on across vectors.
pub fn random_bit_vectors(seed: u32, count: usize, len: usize) -> Vec<BitVector> {
    let mut rnd = MinStdRand::new(seed);
    (0..count)
        .map(|_| {
            let mut bv = BitVector::create(len);
            for j in 0..len {
                if rnd.next_u32() & 1 != 0 {
                    bv.set_bit(j);
                }
            }
            bv
        })
        .collect()
}

/// Returns the complement of every vector.
pub fn inverted_copies(vectors: &[BitVector]) -> Vec<BitVector> {
    vectors
        .iter()
        .map(|bv| {
            let mut inverted = bv.clone();
            inverted.invert();
            inverted
        })
        .collect()
}
