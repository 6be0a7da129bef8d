//! Bounded rejection sampling against the reference corpus

mod batch;
mod engine;
mod state;

pub use batch::{BatchReport, BatchSampler};
pub use engine::{Attempt, RejectReason, UniquenessSampler};
pub use state::GenerationState;

use crate::corpus::ReferenceCorpus;
use crate::error::Result;
use crate::generator::NameGenerator;
use crate::types::{SamplerConfig, SearchOutcome};

/// One-shot search with a fresh sampler
pub fn find_unique<G: NameGenerator>(
    generator: G,
    corpus: &ReferenceCorpus,
    config: SamplerConfig,
) -> Result<SearchOutcome> {
    let mut sampler = UniquenessSampler::new(generator, config)?;
    Ok(sampler.find_unique(corpus))
}
