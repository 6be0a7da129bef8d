//! Candidate name generation
//!
//! Two strategies share one contract: every call to
//! [`NameGenerator::generate`] yields a fresh candidate and consumes only
//! randomness.

mod lexical;
mod syllable;
mod words;

pub use lexical::{mutate, shuffle_vowels, LexicalGenerator, SUFFIXES};
pub use syllable::{SyllableGenerator, CODAS, MEDIALS, ONSETS};
pub use words::{WordList, MAX_WORD_LEN, MIN_WORD_LEN};

use crate::error::Result;
use crate::types::{GenerationStrategy, LexicalConfig, Name};

/// Source of candidate names for the uniqueness sampler
pub trait NameGenerator: Send {
    /// Produce the next candidate
    fn generate(&mut self) -> Name;

    /// Strategy actually in use
    fn strategy(&self) -> GenerationStrategy;
}

/// Unified generator wrapper
pub enum CandidateGenerator {
    Syllable(SyllableGenerator),
    Lexical(LexicalGenerator),
}

impl CandidateGenerator {
    /// Build the generator for `strategy`.
    ///
    /// The lexical strategy needs a word list; when none is configured or it
    /// cannot be loaded, the syllable strategy is used instead. An invalid
    /// lexical prefix is a configuration error, not a reason to fall back.
    pub fn from_strategy(strategy: GenerationStrategy, lexical: &LexicalConfig) -> Result<Self> {
        match strategy {
            GenerationStrategy::Syllable => Ok(Self::Syllable(SyllableGenerator::new())),
            GenerationStrategy::Lexical => {
                lexical.validate()?;
                let Some(path) = lexical.words_path.as_deref() else {
                    tracing::warn!("No word list configured; falling back to syllable generation");
                    return Ok(Self::Syllable(SyllableGenerator::new()));
                };
                match WordList::load(path) {
                    Ok(words) => Self::lexical(words, lexical),
                    Err(e) => {
                        tracing::warn!(error = %e, "Word list unavailable; falling back to syllable generation");
                        Ok(Self::Syllable(SyllableGenerator::new()))
                    }
                }
            }
        }
    }

    /// Lexical generator over an in-memory word list
    pub fn lexical(words: WordList, lexical: &LexicalConfig) -> Result<Self> {
        Ok(Self::Lexical(LexicalGenerator::new(words, lexical)?))
    }

    /// Same configuration with independent randomness, for parallel workers
    pub fn fork(&self) -> Self {
        match self {
            CandidateGenerator::Syllable(_) => Self::Syllable(SyllableGenerator::new()),
            CandidateGenerator::Lexical(g) => Self::Lexical(g.fork()),
        }
    }

    /// Flip one character after the protected prefix
    pub fn mutate(&mut self, name: &Name, min_protected_prefix_len: usize) -> Name {
        match self {
            CandidateGenerator::Syllable(_) => {
                mutate(name, min_protected_prefix_len, &mut rand::thread_rng())
            }
            CandidateGenerator::Lexical(g) => g.mutate(name, min_protected_prefix_len),
        }
    }
}

impl NameGenerator for CandidateGenerator {
    fn generate(&mut self) -> Name {
        match self {
            CandidateGenerator::Syllable(g) => g.generate(),
            CandidateGenerator::Lexical(g) => g.generate(),
        }
    }

    fn strategy(&self) -> GenerationStrategy {
        match self {
            CandidateGenerator::Syllable(g) => g.strategy(),
            CandidateGenerator::Lexical(g) => g.strategy(),
        }
    }
}

impl<G: NameGenerator + ?Sized> NameGenerator for Box<G> {
    fn generate(&mut self) -> Name {
        (**self).generate()
    }

    fn strategy(&self) -> GenerationStrategy {
        (**self).strategy()
    }
}
