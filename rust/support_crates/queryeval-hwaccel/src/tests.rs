use crate::{
    BitAccelerator, CHUNK_WORDS, Chunk, ChunkSource, create_platform_baseline_accelerator,
    get_accelerator,
};

fn random_words(count: usize) -> Vec<u64> {
    (0..count).map(|_| fastrand::u64(..)).collect()
}

#[test]
fn test_binary_ops_match_scalar() {
    fastrand::seed(4242);
    let accel = create_platform_baseline_accelerator();
    // Odd length exercises the unroll remainder.
    for len in [0usize, 1, 7, 8, 9, 33] {
        let a = random_words(len);
        let b = random_words(len);

        let mut or = a.clone();
        accel.or_bit(&mut or, &b);
        let mut and = a.clone();
        accel.and_bit(&mut and, &b);
        let mut and_not = a.clone();
        accel.and_not_bit(&mut and_not, &b);
        let mut not = a.clone();
        accel.not_bit(&mut not);

        for i in 0..len {
            assert_eq!(or[i], a[i] | b[i]);
            assert_eq!(and[i], a[i] & b[i]);
            assert_eq!(and_not[i], a[i] & !b[i]);
            assert_eq!(not[i], !a[i]);
        }
    }
}

#[test]
fn test_population_count() {
    let accel = create_platform_baseline_accelerator();
    assert_eq!(accel.population_count(&[]), 0);
    assert_eq!(accel.population_count(&[u64::MAX; 11]), 11 * 64);
    let words = [0b1011u64, 0, 1 << 63, 0x0f0f];
    assert_eq!(accel.population_count(&words), 3 + 1 + 8);
}

#[test]
fn test_chunk_source_bounds() {
    let words = [u64::MAX, 0];
    let plain = ChunkSource::new(&words, 70, false);
    assert_eq!(plain.word(0), u64::MAX);
    assert_eq!(plain.word(1), 0);
    assert_eq!(plain.word(5), 0);

    let inverted = ChunkSource::new(&words, 70, true);
    assert_eq!(inverted.word(0), 0);
    // Only the 6 bits below len survive the inversion.
    assert_eq!(inverted.word(1), 0b11_1111);
    assert_eq!(inverted.word(2), 0);
}

#[test]
fn test_and128_or128() {
    fastrand::seed(17);
    let accel = get_accelerator();
    let len = CHUNK_WORDS * 64 * 2 + 100;
    let words_a = random_words(len.div_ceil(64));
    let words_b = random_words(len.div_ceil(64));
    let sources = [
        ChunkSource::new(&words_a, len, false),
        ChunkSource::new(&words_b, len, true),
    ];

    for offset in [0, CHUNK_WORDS, 2 * CHUNK_WORDS] {
        let mut and: Chunk = [0; CHUNK_WORDS];
        let mut or: Chunk = [0; CHUNK_WORDS];
        accel.and128(offset, &sources, &mut and);
        accel.or128(offset, &sources, &mut or);
        for i in 0..CHUNK_WORDS {
            let a = sources[0].word(offset + i);
            let b = sources[1].word(offset + i);
            assert_eq!(and[i], a & b, "and word {}", offset + i);
            assert_eq!(or[i], a | b, "or word {}", offset + i);
        }
    }
}

#[test]
fn test_and128_without_sources_is_all_ones() {
    let accel = get_accelerator();
    let mut dest: Chunk = [0; CHUNK_WORDS];
    accel.and128(0, &[], &mut dest);
    assert!(dest.iter().all(|&w| w == u64::MAX));
    assert_eq!(accel.target_name(), "Baseline");
}
