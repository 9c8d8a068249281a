//! Eval command implementation

use std::time::{Duration, Instant};

use anyhow::Result;
use queryeval::{SearchIterator, optimize_with};

use crate::commands::QueryArgs;

pub fn run(query: &QueryArgs, no_optimize: bool, iterations: u32) -> Result<()> {
    let config = query.optimizer_config()?;
    let vectors = query.vectors()?;
    log::info!(
        "Evaluating {:?} over {} vectors of {} documents",
        query.op,
        vectors.len(),
        query.docs
    );

    let mut total = Duration::ZERO;
    let mut hits = 0;
    for _ in 0..iterations.max(1) {
        let mut search = query.build(&vectors);
        if !no_optimize {
            search = optimize_with(search, &config);
        }
        log::debug!("Root iterator: {}", search.class_name());

        let start_time = Instant::now();
        hits = count_hits(search.as_mut(), query.docs);
        total += start_time.elapsed();
    }

    let rounds = iterations.max(1);
    println!("Evaluation completed:");
    println!("  Hits: {hits}");
    println!("  Rounds: {rounds}");
    println!("  Total time: {:.3} seconds", total.as_secs_f64());
    let per_round = total / rounds;
    if per_round.as_nanos() > 0 {
        let docs_per_sec = f64::from(query.docs) / per_round.as_secs_f64();
        println!("  Throughput: {docs_per_sec:.0} docs/s");
    }
    Ok(())
}

/// Counts the hits in `[1, docs)` with a `seek_first`/`seek_next` traversal.
fn count_hits(search: &mut dyn SearchIterator, docs: u32) -> usize {
    search.init_range(1, docs);
    let mut count = 0;
    let mut doc_id = search.seek_first(1);
    while !search.is_at_end() {
        search.unpack(doc_id);
        count += 1;
        doc_id = search.seek_next(doc_id + 1);
    }
    count
}
