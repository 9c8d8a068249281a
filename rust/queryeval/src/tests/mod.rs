mod composite_tests;
mod config_tests;

use crate::{DocId, SearchIterator};

/// Collects every hit of an already range-initialized iterator.
pub(crate) fn collect_hits(search: &mut dyn SearchIterator) -> Vec<DocId> {
    let mut hits = Vec::new();
    let mut doc_id = search.seek_first(1);
    while !search.is_at_end() {
        hits.push(doc_id);
        doc_id = search.seek_next(doc_id + 1);
    }
    hits
}

/// Probes every doc id below `limit` with plain seeks.
pub(crate) fn probe_hits(search: &mut dyn SearchIterator, limit: DocId) -> Vec<DocId> {
    (1..limit).filter(|&doc_id| search.seek(doc_id)).collect()
}
