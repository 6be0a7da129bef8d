//! Core types and structures for name-forge

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{NameForgeError, Result};
use crate::similarity::EditJustification;

/// A registered or candidate name.
///
/// Never empty. The original casing is kept for display and justification;
/// every metric works on [`Name::normalized`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Name(String);

impl Name {
    /// Create a name, trimming surrounding whitespace
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(NameForgeError::validation("Name cannot be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Wrap generator output, which is assembled from non-empty literals
    pub(crate) fn from_generated(value: String) -> Self {
        debug_assert!(!value.trim().is_empty());
        Self(value)
    }

    pub(crate) fn from_parts(parts: &[&str]) -> Self {
        Self::from_generated(parts.concat())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercased form used by all similarity metrics
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }

    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Name {
    type Error = NameForgeError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Name {
    type Error = NameForgeError;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Name> for String {
    fn from(name: Name) -> Self {
        name.0
    }
}

/// Statistic that collapses a candidate's scores against the whole corpus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reduction {
    /// Average overall similarity across the corpus
    #[default]
    Mean,
    /// Worst case: the single most similar corpus entry
    Max,
}

impl std::fmt::Display for Reduction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reduction::Mean => write!(f, "mean"),
            Reduction::Max => write!(f, "max"),
        }
    }
}

impl FromStr for Reduction {
    type Err = NameForgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mean" | "avg" | "average" => Ok(Reduction::Mean),
            "max" | "worst" => Ok(Reduction::Max),
            other => Err(NameForgeError::config(format!(
                "Unknown reduction '{}'. Expected 'mean' or 'max'",
                other
            ))),
        }
    }
}

/// Candidate generation strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStrategy {
    /// Onset + medial + coda syllables
    #[default]
    Syllable,
    /// Prefix + dictionary word + pharmaceutical suffix, then mutated
    Lexical,
}

impl std::fmt::Display for GenerationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationStrategy::Syllable => write!(f, "syllable"),
            GenerationStrategy::Lexical => write!(f, "lexical"),
        }
    }
}

impl FromStr for GenerationStrategy {
    type Err = NameForgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "syllable" | "syllables" => Ok(GenerationStrategy::Syllable),
            "lexical" | "word" | "words" => Ok(GenerationStrategy::Lexical),
            other => Err(NameForgeError::config(format!(
                "Unknown strategy '{}'. Expected 'syllable' or 'lexical'",
                other
            ))),
        }
    }
}

/// Configuration for one uniqueness search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Acceptance threshold on the [0, 100] scale; the reduced score must be strictly below it
    pub threshold: f64,
    pub reduction: Reduction,
    /// Reject candidates already produced during this run
    pub dedup: bool,
    /// Attempt budget before the search is declared exhausted
    pub max_attempts: usize,
    /// Optional wall-clock budget
    pub max_duration: Option<Duration>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            threshold: 50.0,
            reduction: Reduction::Mean,
            dedup: true,
            max_attempts: 100_000,
            max_duration: None,
        }
    }
}

impl SamplerConfig {
    /// Reject thresholds off the percentage scale and empty budgets
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || !(0.0..=100.0).contains(&self.threshold) {
            return Err(NameForgeError::config(format!(
                "Threshold must be between 0 and 100, got {}",
                self.threshold
            )));
        }
        if self.max_attempts == 0 {
            return Err(NameForgeError::config("max_attempts must be at least 1"));
        }
        if self.max_duration.is_some_and(|d| d.is_zero()) {
            return Err(NameForgeError::config("max_duration must be greater than zero"));
        }
        Ok(())
    }
}

/// Settings for the lexical-suffix generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexicalConfig {
    /// Newline-separated word list; without it the lexical strategy falls back to syllables
    pub words_path: Option<PathBuf>,
    /// Literal prefix protected from mutation
    pub prefix: String,
    /// Re-randomize vowels after assembly
    pub shuffle_vowels: bool,
}

impl LexicalConfig {
    /// The prefix ends up verbatim in every candidate, so it must be ASCII letters only
    pub fn validate(&self) -> Result<()> {
        if let Some(bad) = self.prefix.chars().find(|c| !c.is_ascii_alphabetic()) {
            return Err(NameForgeError::config(format!(
                "Prefix '{}' contains '{}'; only ASCII letters are allowed",
                self.prefix, bad
            )));
        }
        Ok(())
    }
}

impl Default for LexicalConfig {
    fn default() -> Self {
        Self {
            words_path: None,
            prefix: "Aba".to_string(),
            shuffle_vowels: true,
        }
    }
}

/// Top-level configuration assembled from the environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgeConfig {
    pub corpus_path: Option<PathBuf>,
    /// Column holding the registered names
    pub column: String,
    pub strategy: GenerationStrategy,
    pub sampler: SamplerConfig,
    pub lexical: LexicalConfig,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            corpus_path: None,
            column: "Nombre".to_string(),
            strategy: GenerationStrategy::Syllable,
            sampler: SamplerConfig::default(),
            lexical: LexicalConfig::default(),
        }
    }
}

impl ForgeConfig {
    /// Build from `NAME_FORGE_*` environment variables over the defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("NAME_FORGE_CORPUS") {
            config.corpus_path = Some(PathBuf::from(path));
        }
        if let Some(column) = lookup("NAME_FORGE_COLUMN") {
            config.column = column;
        }
        if let Some(strategy) = lookup("NAME_FORGE_STRATEGY") {
            config.strategy = strategy.parse()?;
        }
        if let Some(threshold) = lookup("NAME_FORGE_THRESHOLD") {
            config.sampler.threshold = parse_env("NAME_FORGE_THRESHOLD", &threshold)?;
        }
        if let Some(reduction) = lookup("NAME_FORGE_REDUCTION") {
            config.sampler.reduction = reduction.parse()?;
        }
        if let Some(attempts) = lookup("NAME_FORGE_MAX_ATTEMPTS") {
            config.sampler.max_attempts = parse_env("NAME_FORGE_MAX_ATTEMPTS", &attempts)?;
        }
        if let Some(secs) = lookup("NAME_FORGE_TIMEOUT_SECS") {
            let secs: u64 = parse_env("NAME_FORGE_TIMEOUT_SECS", &secs)?;
            config.sampler.max_duration = Some(Duration::from_secs(secs));
        }
        if let Some(words) = lookup("NAME_FORGE_WORDS") {
            config.lexical.words_path = Some(PathBuf::from(words));
        }
        if let Some(prefix) = lookup("NAME_FORGE_PREFIX") {
            config.lexical.prefix = prefix;
        }

        config.sampler.validate()?;
        config.lexical.validate()?;
        Ok(config)
    }
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| {
        NameForgeError::config(format!("Invalid value '{}' for {}: {}", value, key, e))
    })
}

/// A candidate that passed the uniqueness search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniqueName {
    pub name: Name,
    /// Reduced similarity against the corpus; `None` when the corpus was empty
    pub score: Option<f64>,
    pub reduction: Reduction,
    /// Most similar corpus entry, kept for explanation
    pub closest: Option<Name>,
    /// Overall similarity to `closest`
    pub closest_score: Option<f64>,
    /// Edits turning the candidate into `closest`
    pub justification: Option<EditJustification>,
    /// Attempts spent, including the accepted one
    pub attempts: usize,
    pub found_at: DateTime<Utc>,
}

/// Result of a bounded search
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum SearchOutcome {
    Accepted(UniqueName),
    /// Budget ran out before any candidate fell below the threshold
    Exhausted {
        attempts: usize,
        elapsed: Duration,
        /// Lowest reduced score seen, for tuning the threshold
        best: Option<ScoredCandidate>,
    },
}

impl SearchOutcome {
    pub fn accepted(&self) -> Option<&UniqueName> {
        match self {
            SearchOutcome::Accepted(found) => Some(found),
            SearchOutcome::Exhausted { .. } => None,
        }
    }

    pub fn into_accepted(self) -> Option<UniqueName> {
        match self {
            SearchOutcome::Accepted(found) => Some(found),
            SearchOutcome::Exhausted { .. } => None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, SearchOutcome::Exhausted { .. })
    }
}

/// A rejected candidate and its reduced score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub name: Name,
    pub score: f64,
}

/// Counters for one sampler run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplerMetrics {
    pub attempts: usize,
    pub rejected_similar: usize,
    pub rejected_duplicate: usize,
    pub rejected_malformed: usize,
}

impl SamplerMetrics {
    pub fn rejected(&self) -> usize {
        self.rejected_similar + self.rejected_duplicate + self.rejected_malformed
    }

    /// Share of attempts that ended in acceptance
    pub fn acceptance_rate(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            (self.attempts - self.rejected()) as f64 / self.attempts as f64
        }
    }
}
