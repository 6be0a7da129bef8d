//! Lexical-suffix generator: prefix + dictionary word + pharmaceutical suffix
//!
//! The assembled name still contains a real word, so one character after the
//! literal prefix is always flipped between vowel and consonant to pull it
//! away from its source.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::words::WordList;
use super::NameGenerator;
use crate::error::Result;
use crate::types::{GenerationStrategy, LexicalConfig, Name};

/// Endings typical of registered drug names
pub const SUFFIXES: &[&str] = &[
    "cillin", "mycin", "olol", "pril", "statin", "sartan", "vir", "zole", "dine", "ine",
    "mab", "cept", "nib", "ase", "xime", "bactam", "fen", "sol", "cap", "dex", "ril",
    "thromycin", "floxacin", "sulfanil", "prazole", "cort", "dronate", "gliptin", "mide",
    "tropin", "ciclovir", "parin", "bicin", "dazole", "cetam", "fentanil", "pyridine",
    "pyridone", "pyrrolidine", "zine", "tinib",
];

const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u'];
const CONSONANTS: &[char] = &[
    'b', 'c', 'd', 'f', 'g', 'h', 'j', 'k', 'l', 'm', 'n', 'p', 'q', 'r', 's', 't', 'v',
    'w', 'x', 'y', 'z',
];

/// Probability that a vowel is redrawn by [`shuffle_vowels`]
const VOWEL_SHUFFLE_RATE: f64 = 0.5;

/// Builds names from a word list and the suffix pool
pub struct LexicalGenerator {
    words: WordList,
    prefix: String,
    shuffle_vowels: bool,
    rng: StdRng,
}

impl LexicalGenerator {
    /// Fails with a configuration error when the prefix is not plain letters
    pub fn new(words: WordList, config: &LexicalConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            words,
            prefix: config.prefix.clone(),
            shuffle_vowels: config.shuffle_vowels,
            rng: StdRng::from_entropy(),
        })
    }

    /// Deterministic generator for reproducible runs
    pub fn with_seed(words: WordList, config: &LexicalConfig, seed: u64) -> Result<Self> {
        Ok(Self {
            rng: StdRng::seed_from_u64(seed),
            ..Self::new(words, config)?
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn words(&self) -> &WordList {
        &self.words
    }

    /// Same word list and settings, fresh randomness
    pub fn fork(&self) -> Self {
        Self {
            words: self.words.clone(),
            prefix: self.prefix.clone(),
            shuffle_vowels: self.shuffle_vowels,
            rng: StdRng::from_entropy(),
        }
    }

    /// Flip one character at or after `min_protected_prefix_len`
    pub fn mutate(&mut self, name: &Name, min_protected_prefix_len: usize) -> Name {
        mutate(name, min_protected_prefix_len, &mut self.rng)
    }

    fn assemble(&mut self) -> String {
        let word = self
            .words
            .get(self.rng.gen_range(0..self.words.len()))
            .unwrap_or_default();
        let suffix = SUFFIXES[self.rng.gen_range(0..SUFFIXES.len())];
        format!("{}{}{}", self.prefix, capitalize(word), suffix)
    }
}

impl NameGenerator for LexicalGenerator {
    fn generate(&mut self) -> Name {
        let protected = self.prefix.chars().count();
        let mut raw = self.assemble();
        if self.shuffle_vowels {
            raw = shuffle_vowels(&raw, protected, &mut self.rng);
        }
        let name = Name::from_generated(raw);
        mutate(&name, protected, &mut self.rng)
    }

    fn strategy(&self) -> GenerationStrategy {
        GenerationStrategy::Lexical
    }
}

/// Replace exactly one character at a position `>= min_protected_prefix_len`.
///
/// Vowels become consonants and everything else becomes a vowel, so the
/// result always differs from the input. Case is preserved. Names no longer
/// than the protected prefix are returned unchanged.
pub fn mutate<R: Rng + ?Sized>(name: &Name, min_protected_prefix_len: usize, rng: &mut R) -> Name {
    let mut chars: Vec<char> = name.as_str().chars().collect();
    if chars.len() <= min_protected_prefix_len {
        return name.clone();
    }

    let index = rng.gen_range(min_protected_prefix_len..chars.len());
    let current = chars[index];
    let replacement = if is_vowel(current) {
        CONSONANTS[rng.gen_range(0..CONSONANTS.len())]
    } else {
        VOWELS[rng.gen_range(0..VOWELS.len())]
    };
    chars[index] = if current.is_uppercase() {
        replacement.to_ascii_uppercase()
    } else {
        replacement
    };

    Name::from_generated(chars.into_iter().collect())
}

/// Redraw lowercase vowels after the protected prefix with probability 1/2
pub fn shuffle_vowels<R: Rng + ?Sized>(name: &str, min_protected_prefix_len: usize, rng: &mut R) -> String {
    name.chars()
        .enumerate()
        .map(|(i, c)| {
            if i >= min_protected_prefix_len && VOWELS.contains(&c) && rng.gen_bool(VOWEL_SHUFFLE_RATE) {
                VOWELS[rng.gen_range(0..VOWELS.len())]
            } else {
                c
            }
        })
        .collect()
}

fn is_vowel(c: char) -> bool {
    VOWELS.contains(&c.to_ascii_lowercase())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
