//! Syllable-assembly generator: onset + medial + coda

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::NameGenerator;
use crate::types::{GenerationStrategy, Name};

/// Opening syllables common in drug names
pub const ONSETS: &[&str] = &[
    "Apo", "Cef", "Dex", "Flu", "Glu", "Hydro", "Ibu", "Keto", "Lora", "Meto",
    "Napro", "Oxy", "Penta", "Queti", "Rami", "Sero", "Tami", "Uro", "Vita", "Xylo",
];

/// Linking syllables
pub const MEDIALS: &[&str] = &[
    "bi", "ce", "di", "fi", "gi", "li", "mi", "ni", "pi", "ri", "si", "ti", "vi", "xi", "zi",
];

/// Closing syllables
pub const CODAS: &[&str] = &[
    "cin", "dine", "fen", "line", "mine", "nate", "pine", "quine", "rine", "sone", "tine",
    "vir", "zole",
];

/// Picks one syllable from each pool uniformly at random
pub struct SyllableGenerator {
    rng: StdRng,
}

impl SyllableGenerator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator for reproducible runs
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Number of distinct names this generator can produce
    pub fn total(&self) -> usize {
        ONSETS.len() * MEDIALS.len() * CODAS.len()
    }
}

impl Default for SyllableGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl NameGenerator for SyllableGenerator {
    fn generate(&mut self) -> Name {
        let onset = ONSETS[self.rng.gen_range(0..ONSETS.len())];
        let medial = MEDIALS[self.rng.gen_range(0..MEDIALS.len())];
        let coda = CODAS[self.rng.gen_range(0..CODAS.len())];
        Name::from_parts(&[onset, medial, coda])
    }

    fn strategy(&self) -> GenerationStrategy {
        GenerationStrategy::Syllable
    }
}
