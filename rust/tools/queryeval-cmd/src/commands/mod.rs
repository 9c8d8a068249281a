//! Command implementations for queryeval-cmd

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use queryeval::{
    AndNotSearch, AndSearch, BitVectorIterator, OptimizerConfig, OrSearch, SearchIterator,
    TermFieldMatchData,
};
use queryeval_bitvector::BitVector;
use queryeval_testkit::random_bit_vectors;

pub mod eval;
pub mod explain;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum QueryOp {
    And,
    Or,
    AndNot,
}

/// Shape of the generated query: one composite over random bit vectors.
#[derive(Debug, Clone, Args)]
pub struct QueryArgs {
    /// Boolean operator of the root
    #[arg(long, value_enum, default_value_t = QueryOp::And)]
    pub op: QueryOp,

    /// Number of bit-vector children
    #[arg(long, default_value_t = 3)]
    pub vectors: usize,

    /// Number of documents covered by every vector
    #[arg(long, default_value_t = 1_000_000)]
    pub docs: u32,

    /// Seed of the bit-vector generator
    #[arg(long, default_value_t = 341)]
    pub seed: u32,

    /// Build strict iterators
    #[arg(long)]
    pub strict: bool,

    /// Iterate the complement of each vector
    #[arg(long)]
    pub invert: bool,

    /// Optimizer configuration (JSON)
    #[arg(long)]
    pub config: Option<String>,
}

impl QueryArgs {
    pub fn optimizer_config(&self) -> Result<OptimizerConfig> {
        match &self.config {
            Some(path) => OptimizerConfig::load(path)
                .with_context(|| format!("Failed to load optimizer config: {path}")),
            None => Ok(OptimizerConfig::default()),
        }
    }

    pub fn vectors(&self) -> Result<Vec<Arc<BitVector>>> {
        if self.vectors == 0 {
            anyhow::bail!("At least one vector is required");
        }
        if self.docs < 2 {
            anyhow::bail!("At least two documents are required");
        }
        let vectors = random_bit_vectors(self.seed, self.vectors, self.docs as usize);
        Ok(vectors.into_iter().map(Arc::new).collect())
    }

    /// Builds a fresh, unoptimized query tree over `vectors`.
    pub fn build(&self, vectors: &[Arc<BitVector>]) -> Box<dyn SearchIterator> {
        let tfmd = Arc::new(TermFieldMatchData::new());
        let children = vectors
            .iter()
            .enumerate()
            .map(|(i, bv)| {
                let mut child =
                    BitVectorIterator::create(bv.clone(), tfmd.clone(), self.strict, self.invert);
                child.set_id(i as u32 + 1);
                child
            })
            .collect();
        match self.op {
            QueryOp::And => AndSearch::create(children, self.strict),
            QueryOp::Or => OrSearch::create(children, self.strict),
            QueryOp::AndNot => AndNotSearch::create(children, self.strict),
        }
    }
}
