//! Name Forge - invent names that look and sound unlike a reference list
//!
//! Candidates come from a syllable or lexical generator and are scored
//! against every registered name with phonetic and orthographic metrics.
//! The first candidate whose reduced score stays below the threshold wins.

pub mod corpus;
pub mod error;
pub mod generator;
pub mod sampler;
pub mod similarity;
pub mod types;

// Re-export commonly used types
pub use error::{NameForgeError, Result};
pub use types::{
    ForgeConfig, GenerationStrategy, LexicalConfig, Name, Reduction, SamplerConfig,
    SamplerMetrics, ScoredCandidate, SearchOutcome, UniqueName,
};

// Re-export main functionality
pub use corpus::{ReferenceCorpus, SharedCorpus};
pub use generator::{CandidateGenerator, NameGenerator};
pub use sampler::{find_unique, BatchSampler, UniquenessSampler};
pub use similarity::{CompositeScorer, EditJustification, EditJustifier, EditOp};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library
pub fn init() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();
    Ok(())
}
