use itertools::Itertools;

use crate::BitVector;

#[test]
fn test_set_clear_test() {
    let mut bv = BitVector::create(130);
    assert_eq!(bv.len(), 130);
    assert_eq!(bv.count_true_bits(), 0);

    bv.set_bit(0);
    bv.set_bit(63);
    bv.set_bit(64);
    bv.set_bit(129);
    assert!(bv.test_bit(0));
    assert!(bv.test_bit(63));
    assert!(bv.test_bit(64));
    assert!(bv.test_bit(129));
    assert!(!bv.test_bit(1));
    assert_eq!(bv.count_true_bits(), 4);

    bv.clear_bit(63);
    assert!(!bv.test_bit(63));
    assert_eq!(bv.iter().collect_vec(), vec![0, 64, 129]);
}

#[test]
fn test_full_and_invert_keep_tail_masked() {
    let full = BitVector::full(70);
    assert_eq!(full.count_true_bits(), 70);
    assert_eq!(full.storage()[1], (1u64 << 6) - 1);

    let mut bv = BitVector::from_positions([3, 65], 70);
    bv.invert();
    assert_eq!(bv.count_true_bits(), 68);
    assert!(!bv.test_bit(3));
    assert!(!bv.test_bit(65));
    assert!(bv.test_bit(69));
    assert_eq!(bv.storage()[1] >> 6, 0);

    bv.invert();
    assert_eq!(bv.iter().collect_vec(), vec![3, 65]);
}

#[test]
fn test_intervals() {
    let mut bv = BitVector::create(300);
    bv.set_interval(10..200);
    assert_eq!(bv.count_true_bits(), 190);
    bv.clear_interval(60..130);
    assert_eq!(bv.count_true_bits(), 120);
    assert!(bv.test_bit(59));
    assert!(!bv.test_bit(60));
    assert!(!bv.test_bit(129));
    assert!(bv.test_bit(130));

    // Empty range is a no-op
    bv.set_interval(5..5);
    assert_eq!(bv.count_true_bits(), 120);
}

#[test]
fn test_next_true_and_false_bit() {
    let bv = BitVector::from_positions([5, 64, 200], 250);
    assert_eq!(bv.next_true_bit(0), 5);
    assert_eq!(bv.next_true_bit(5), 5);
    assert_eq!(bv.next_true_bit(6), 64);
    assert_eq!(bv.next_true_bit(65), 200);
    assert_eq!(bv.next_true_bit(201), 250);
    assert_eq!(bv.next_true_bit(1000), 250);

    assert_eq!(bv.next_false_bit(5), 6);
    assert_eq!(bv.next_false_bit(64), 65);

    let full = BitVector::full(100);
    assert_eq!(full.next_false_bit(0), 100);
    assert_eq!(full.next_false_bit(99), 100);
}

#[test]
fn test_logical_ops() {
    let mut a = BitVector::from_positions([1, 2, 3, 100], 128);
    let b = BitVector::from_positions([2, 3, 4, 127], 128);

    let mut and = a.clone();
    and.and_with(&b);
    assert_eq!(and.iter().collect_vec(), vec![2, 3]);

    let mut or = a.clone();
    or.or_with(&b);
    assert_eq!(or.iter().collect_vec(), vec![1, 2, 3, 4, 100, 127]);

    a.and_not_with(&b);
    assert_eq!(a.iter().collect_vec(), vec![1, 100]);
}

#[test]
#[should_panic]
fn test_logical_ops_length_mismatch() {
    let mut a = BitVector::create(10);
    let b = BitVector::create(11);
    a.or_with(&b);
}

#[test]
fn test_from_lsb_words() {
    let bv = BitVector::from_lsb_words(&[u64::MAX, u64::MAX], 66);
    assert_eq!(bv.count_true_bits(), 66);
    assert!(BitVector::try_from_lsb_words(&[0], 65).is_err());
    assert_eq!(
        BitVector::try_from_lsb_words(&[0b101], 3).unwrap().iter().collect_vec(),
        vec![0, 2]
    );
}

#[test]
fn test_iter_matches_test_bit() {
    fastrand::seed(9001);
    let len = 5000;
    let mut bv = BitVector::create(len);
    for i in 0..len {
        if fastrand::u8(..) < 40 {
            bv.set_bit(i);
        }
    }
    let expected = (0..len).filter(|&i| bv.test_bit(i)).collect_vec();
    assert_eq!(bv.iter().collect_vec(), expected);
    assert_eq!(bv.count_true_bits(), expected.len());

    let mut next = Vec::new();
    let mut pos = bv.next_true_bit(0);
    while pos < len {
        next.push(pos);
        pos = bv.next_true_bit(pos + 1);
    }
    assert_eq!(next, expected);
}
