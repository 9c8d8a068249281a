use std::sync::Arc;

use queryeval_bitvector::BitVector;

use super::{collect_hits, probe_hits};
use crate::{
    AndNotSearch, AndSearch, BitVectorIterator, Children, DocId, EmptySearch, IteratorKind,
    OrSearch, SearchIterator, TermFieldMatchData, Trinary, TrueSearch, UnpackInfo,
};

const LIMIT: DocId = 40;

fn leaf_with(
    step: usize,
    tfmd: &Arc<TermFieldMatchData>,
    strict: bool,
) -> Box<dyn SearchIterator> {
    let bv = BitVector::from_positions((0..LIMIT as usize).step_by(step), LIMIT as usize);
    BitVectorIterator::create(Arc::new(bv), tfmd.clone(), strict, false)
}

fn leaf(step: usize, strict: bool) -> Box<dyn SearchIterator> {
    leaf_with(step, &Arc::new(TermFieldMatchData::new()), strict)
}

fn expected(filter: impl Fn(DocId) -> bool) -> Vec<DocId> {
    (1..LIMIT).filter(|&d| filter(d)).collect()
}

fn check_all_modes(
    create: impl Fn(Children, bool) -> Box<dyn SearchIterator>,
    filter: impl Fn(DocId) -> bool,
) {
    let want = expected(filter);
    for strict in [false, true] {
        for children_strict in [false, true] {
            let mut search = create(
                vec![leaf(2, children_strict), leaf(3, children_strict)],
                strict,
            );
            assert_eq!(search.is_strict(), Trinary::from(strict));
            search.init_full_range();
            assert_eq!(
                collect_hits(search.as_mut()),
                want,
                "{} over children strict={children_strict}",
                search.class_name()
            );
            search.init_full_range();
            assert_eq!(probe_hits(search.as_mut(), LIMIT), want);
        }
    }
}

#[test]
fn test_and_search() {
    check_all_modes(AndSearch::create, |d| d % 2 == 0 && d % 3 == 0);
}

#[test]
fn test_or_search() {
    check_all_modes(OrSearch::create, |d| d % 2 == 0 || d % 3 == 0);
}

#[test]
fn test_and_not_search() {
    check_all_modes(AndNotSearch::create, |d| d % 2 == 0 && d % 3 != 0);
}

#[test]
fn test_and_not_with_several_negatives() {
    for strict in [false, true] {
        let mut search = AndNotSearch::create(
            vec![leaf(1, strict), leaf(2, strict), leaf(3, false)],
            strict,
        );
        search.init_full_range();
        assert_eq!(
            collect_hits(search.as_mut()),
            expected(|d| d % 2 != 0 && d % 3 != 0)
        );
    }
}

#[test]
fn test_strict_composite_over_sub_range() {
    let mut search = AndSearch::create(vec![leaf(2, true), leaf(5, false)], true);
    search.init_range(11, 31);
    assert_eq!(collect_hits(search.as_mut()), vec![20, 30]);
    assert!(search.is_at_end());
}

#[test]
fn test_nested_composites() {
    let or = OrSearch::create(vec![leaf(5, true), leaf(7, false)], true);
    let mut search = AndSearch::create(vec![leaf(2, false), or], true);
    search.init_full_range();
    assert_eq!(
        collect_hits(search.as_mut()),
        expected(|d| d % 2 == 0 && (d % 5 == 0 || d % 7 == 0))
    );
}

#[test]
fn test_create_collapses_trivial_composites() {
    assert_eq!(AndSearch::create(vec![], true).kind(), IteratorKind::Empty);
    assert_eq!(OrSearch::create(vec![], false).kind(), IteratorKind::Empty);
    assert_eq!(AndNotSearch::create(vec![], false).kind(), IteratorKind::Empty);

    assert_eq!(
        AndSearch::create(vec![leaf(2, false)], false).kind(),
        IteratorKind::BitVector
    );
    assert_eq!(
        OrSearch::create(vec![leaf(2, false)], false).kind(),
        IteratorKind::BitVector
    );
    assert_eq!(
        AndNotSearch::create(vec![leaf(2, false)], false).kind(),
        IteratorKind::BitVector
    );

    let folded = AndNotSearch::create(vec![leaf(2, false), Box::new(EmptySearch::new())], false);
    assert_eq!(folded.kind(), IteratorKind::BitVector);

    let kept = AndNotSearch::create(vec![Box::new(EmptySearch::new()), leaf(2, false)], false);
    assert_eq!(kept.kind(), IteratorKind::AndNot);
    assert_eq!(kept.children().len(), 2);
}

#[test]
fn test_class_names() {
    let children = || vec![leaf(2, false), leaf(3, false)];
    assert_eq!(
        AndSearch::create(children(), false).class_name(),
        "AndSearchNoStrict<FullUnpack>"
    );
    assert_eq!(
        OrSearch::create(children(), true).class_name(),
        "OrSearchStrict<FullUnpack>"
    );
    let mut selective = UnpackInfo::new();
    selective.add(1);
    assert_eq!(
        AndSearch::create_with_unpack(children(), true, selective.clone()).class_name(),
        "AndSearchStrict<SelectiveUnpack>"
    );
    assert_eq!(
        OrSearch::create_with_unpack(children(), false, selective).class_name(),
        "OrSearchNoStrict<SelectiveUnpack>"
    );
    assert_eq!(
        AndNotSearch::create_with_unpack(children(), false, UnpackInfo::new()).class_name(),
        "AndNotSearchNoStrict<NoUnpack>"
    );
}

#[test]
fn test_and_with_inserts_by_estimate() {
    let tfmd = Arc::new(TermFieldMatchData::new());
    let mut search = AndSearch::create(vec![leaf(2, false), leaf(3, false)], false);

    let rejected = search.and_with(Box::new(TrueSearch::new(tfmd.clone())), 5);
    assert!(rejected.is_none());
    assert_eq!(search.children().len(), 3);
    assert_eq!(search.children()[0].kind(), IteratorKind::True);

    let rejected = search.and_with(Box::new(EmptySearch::new()), 10);
    assert!(rejected.is_none());
    assert_eq!(search.children().len(), 4);
    assert_eq!(search.children()[0].kind(), IteratorKind::True);
    assert_eq!(search.children()[1].kind(), IteratorKind::Empty);
}

#[test]
fn test_and_with_narrows_running_search() {
    let mut search = AndSearch::create(vec![leaf(2, true), leaf(3, true)], true);
    search.init_full_range();
    assert_eq!(search.seek_first(1), 6);
    assert!(search.and_with(leaf(4, true), 100).is_none());
    assert_eq!(search.seek_next(7), 12);
    assert_eq!(search.seek_next(13), 24);
    assert_eq!(search.seek_next(25), 36);
    search.seek_next(37);
    assert!(search.is_at_end());
}

#[test]
fn test_and_with_rejected_by_or() {
    let mut search = OrSearch::create(vec![leaf(2, false), leaf(3, false)], false);
    let rejected = search.and_with(leaf(5, false), 1);
    assert!(rejected.is_some_and(|filter| filter.kind() == IteratorKind::BitVector));
    assert_eq!(search.children().len(), 2);
}

#[test]
fn test_and_with_on_and_not_goes_to_positive() {
    let mut search = AndNotSearch::create(vec![leaf(2, false), leaf(3, false)], false);
    assert!(search.and_with(leaf(5, false), 1).is_some());

    let positive = AndSearch::create(vec![leaf(2, false), leaf(5, false)], false);
    let mut search = AndNotSearch::create(vec![positive, leaf(3, false)], true);
    assert!(search.and_with(leaf(4, false), 1).is_none());
    assert_eq!(search.children()[0].children().len(), 3);
    search.init_full_range();
    assert_eq!(
        collect_hits(search.as_mut()),
        expected(|d| d % 20 == 0 && d % 3 != 0)
    );
}

#[test]
fn test_selective_unpack() {
    let tfmd = [
        Arc::new(TermFieldMatchData::new()),
        Arc::new(TermFieldMatchData::new()),
        Arc::new(TermFieldMatchData::new()),
    ];
    let mut unpack = UnpackInfo::new();
    unpack.add(1);
    let mut search = AndSearch::create_with_unpack(
        vec![
            leaf_with(2, &tfmd[0], false),
            leaf_with(3, &tfmd[1], false),
            leaf_with(1, &tfmd[2], false),
        ],
        false,
        unpack,
    );
    search.init_full_range();
    assert!(search.seek(12));
    search.unpack(12);
    assert_eq!(tfmd[0].doc_id(), 0);
    assert_eq!(tfmd[1].doc_id(), 12);
    assert_eq!(tfmd[2].doc_id(), 0);
}

#[test]
fn test_or_unpacks_only_matching_children() {
    let tfmd = [
        Arc::new(TermFieldMatchData::new()),
        Arc::new(TermFieldMatchData::new()),
    ];
    let mut search = OrSearch::create(
        vec![leaf_with(2, &tfmd[0], true), leaf_with(3, &tfmd[1], true)],
        true,
    );
    search.init_full_range();
    assert_eq!(search.seek_first(1), 2);
    search.unpack(2);
    assert_eq!(tfmd[0].doc_id(), 2);
    assert_eq!(tfmd[1].doc_id(), 0);
    assert_eq!(search.seek_next(3), 3);
    search.unpack(3);
    assert_eq!(tfmd[0].doc_id(), 2);
    assert_eq!(tfmd[1].doc_id(), 3);
}

#[test]
fn test_and_not_unpacks_only_positive() {
    let tfmd = [
        Arc::new(TermFieldMatchData::new()),
        Arc::new(TermFieldMatchData::new()),
    ];
    let mut search = AndNotSearch::create(
        vec![leaf_with(1, &tfmd[0], false), leaf_with(3, &tfmd[1], false)],
        false,
    );
    search.init_full_range();
    assert!(search.seek(4));
    search.unpack(4);
    assert_eq!(tfmd[0].doc_id(), 4);
    assert_eq!(tfmd[1].doc_id(), 0);
}

#[test]
fn test_transform_children_preserves_order() {
    let mut search = OrSearch::create(
        vec![leaf(2, false), Box::new(EmptySearch::new()), leaf(3, false)],
        false,
    );
    let mut kinds = Vec::new();
    search.transform_children(&mut |child| {
        kinds.push(child.kind());
        child
    });
    assert_eq!(
        kinds,
        vec![IteratorKind::BitVector, IteratorKind::Empty, IteratorKind::BitVector]
    );
    assert_eq!(search.children().len(), 3);
}
