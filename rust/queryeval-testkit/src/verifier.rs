//! Conformance checks for search iterator implementations.

use anyhow::{bail, ensure};
use itertools::Itertools;
use queryeval::{DocId, SearchIterator};

/// Builds fresh iterators over the verifier's expected hits.
pub trait IteratorFactory {
    fn create(&self, strict: bool) -> Box<dyn SearchIterator>;
}

impl<F> IteratorFactory for F
where
    F: Fn(bool) -> Box<dyn SearchIterator>,
{
    fn create(&self, strict: bool) -> Box<dyn SearchIterator> {
        self(strict)
    }
}

/// Checks that iterators produced by an [`IteratorFactory`] match exactly the
/// verifier's expected doc ids below its doc id limit, under every seek pattern
/// a caller may use.
///
/// Each check runs on a freshly created iterator, for strict and non-strict
/// mode:
/// - full traversal with `seek_first`/`seek_next`
/// - a plain `seek` of every doc id in the range
/// - traversal of several sub-ranges, including ranges reaching past the limit
/// - seeks of only the expected hits, and of only their neighbours
/// - end handling after the last hit
/// - for strict iterators, the position reached after every failed seek
#[derive(Debug, Clone)]
pub struct SearchIteratorVerifier {
    doc_id_limit: DocId,
    expected: Vec<DocId>,
}

impl SearchIteratorVerifier {
    pub const DOC_ID_LIMIT: DocId = 207;

    pub fn new() -> SearchIteratorVerifier {
        Self::with_expected(
            Self::DOC_ID_LIMIT,
            vec![
                1, 2, 5, 10, 11, 13, 14, 15, 16, 17, 18, 19, 20, 63, 64, 65, 100, 101, 102, 127,
                128, 199, 200, 201, 202, 205, 206,
            ],
        )
    }

    /// A verifier for custom hits. `expected` must be ascending, unique and within
    /// `[1, doc_id_limit)`.
    pub fn with_expected(doc_id_limit: DocId, expected: Vec<DocId>) -> SearchIteratorVerifier {
        assert!(expected.iter().tuple_windows().all(|(a, b)| a < b));
        assert!(expected.iter().all(|&d| d >= 1 && d < doc_id_limit));
        SearchIteratorVerifier {
            doc_id_limit,
            expected,
        }
    }

    pub fn doc_id_limit(&self) -> DocId {
        self.doc_id_limit
    }

    pub fn expected_doc_ids(&self) -> &[DocId] {
        &self.expected
    }

    /// Runs every check and panics with a description of the first failure.
    pub fn verify(&self, factory: &dyn IteratorFactory) {
        if let Err(e) = self.try_verify(factory) {
            panic!("search iterator verification failed: {e:#}");
        }
    }

    pub fn try_verify(&self, factory: &dyn IteratorFactory) -> anyhow::Result<()> {
        for strict in [false, true] {
            self.verify_full_scan(factory, strict)?;
            self.verify_probe_all(factory, strict)?;
            self.verify_sub_ranges(factory, strict)?;
            self.verify_sparse_seeks(factory, strict)?;
            self.verify_end(factory, strict)?;
        }
        self.verify_strict_positions(factory)
    }

    fn expected_in(&self, begin_id: DocId, end_id: DocId) -> Vec<DocId> {
        self.expected
            .iter()
            .copied()
            .filter(|&d| d >= begin_id && d < end_id)
            .collect()
    }

    fn traverse(search: &mut dyn SearchIterator) -> Vec<DocId> {
        let mut hits = Vec::new();
        let mut doc_id = search.seek_first(1);
        while doc_id < search.end_id() && !search.is_at_end() {
            hits.push(doc_id);
            search.unpack(doc_id);
            doc_id = search.seek_next(doc_id + 1);
        }
        hits
    }

    fn verify_full_scan(&self, factory: &dyn IteratorFactory, strict: bool) -> anyhow::Result<()> {
        let mut search = factory.create(strict);
        search.init_range(1, self.doc_id_limit);
        let hits = Self::traverse(search.as_mut());
        ensure!(
            hits == self.expected,
            "{} (strict={strict}) full scan: got {hits:?}, want {:?}",
            search.class_name(),
            self.expected
        );
        Ok(())
    }

    fn verify_probe_all(&self, factory: &dyn IteratorFactory, strict: bool) -> anyhow::Result<()> {
        let mut search = factory.create(strict);
        search.init_range(1, self.doc_id_limit);
        let hits = (1..self.doc_id_limit)
            .filter(|&d| search.seek(d))
            .collect_vec();
        ensure!(
            hits == self.expected,
            "{} (strict={strict}) probing every doc: got {hits:?}, want {:?}",
            search.class_name(),
            self.expected
        );
        Ok(())
    }

    fn verify_sub_ranges(&self, factory: &dyn IteratorFactory, strict: bool) -> anyhow::Result<()> {
        let limit = self.doc_id_limit;
        let ranges = [
            (1, limit),
            (1, 50),
            (12, 101),
            (64, 65),
            (100, limit - 3),
            (limit / 2, limit + 50),
            (limit - 2, limit),
        ];
        for (begin_id, end_id) in ranges {
            let mut search = factory.create(strict);
            search.init_range(begin_id, end_id);
            let hits = Self::traverse(search.as_mut());
            let want = self.expected_in(begin_id, end_id);
            ensure!(
                hits == want,
                "{} (strict={strict}) range [{begin_id}, {end_id}): got {hits:?}, want {want:?}",
                search.class_name()
            );
        }
        Ok(())
    }

    fn verify_sparse_seeks(
        &self,
        factory: &dyn IteratorFactory,
        strict: bool,
    ) -> anyhow::Result<()> {
        let mut search = factory.create(strict);
        search.init_range(1, self.doc_id_limit);
        for &d in &self.expected {
            ensure!(
                search.seek(d),
                "{} (strict={strict}) seek to expected hit {d} failed",
                search.class_name()
            );
        }

        let mut search = factory.create(strict);
        search.init_range(1, self.doc_id_limit);
        let misses = (1..self.doc_id_limit).filter(|d| self.expected.binary_search(d).is_err());
        for d in misses.step_by(3) {
            if search.seek(d) {
                bail!(
                    "{} (strict={strict}) seek to {d} reported a hit",
                    search.class_name()
                );
            }
        }
        Ok(())
    }

    fn verify_end(&self, factory: &dyn IteratorFactory, strict: bool) -> anyhow::Result<()> {
        let mut search = factory.create(strict);
        search.init_range(1, self.doc_id_limit);
        Self::traverse(search.as_mut());
        ensure!(
            search.is_at_end(),
            "{} (strict={strict}) is not at end after a full traversal",
            search.class_name()
        );
        ensure!(
            !search.seek(self.doc_id_limit) && search.is_at_end(),
            "{} (strict={strict}) matched at the doc id limit",
            search.class_name()
        );
        ensure!(
            !search.seek(self.doc_id_limit + 1000),
            "{} (strict={strict}) matched beyond the doc id limit",
            search.class_name()
        );
        Ok(())
    }

    fn verify_strict_positions(&self, factory: &dyn IteratorFactory) -> anyhow::Result<()> {
        let mut search = factory.create(true);
        search.init_range(1, self.doc_id_limit);
        for d in 1..self.doc_id_limit {
            let hit = search.seek(d);
            let next = self.expected.iter().copied().find(|&e| e >= d);
            match next {
                Some(next) if next == d => ensure!(hit, "strict seek to hit {d} failed"),
                Some(next) => ensure!(
                    !hit && search.doc_id() == next,
                    "{}: strict seek to {d} left the iterator at {}, want {next}",
                    search.class_name(),
                    search.doc_id()
                ),
                None => ensure!(
                    !hit && search.is_at_end(),
                    "{}: strict seek to {d} past the last hit is not at end",
                    search.class_name()
                ),
            }
        }
        Ok(())
    }
}

impl Default for SearchIteratorVerifier {
    fn default() -> Self {
        Self::new()
    }
}
