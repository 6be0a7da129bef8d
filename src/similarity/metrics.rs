//! Pairwise similarity metrics on the [0, 100] scale
//!
//! Every metric lowercases its inputs, is symmetric, and scores identical
//! inputs at 100 (except n-gram overlap on inputs shorter than `n`).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::phonetic::PhoneticEncoder;

/// Default n-gram size
pub const DEFAULT_NGRAM_SIZE: usize = 2;

/// Which half of the composite a metric feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricFamily {
    Orthographic,
    Phonetic,
}

/// The fixed set of metrics used by the composite scorer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Normalized Levenshtein distance on the raw names
    EditRatio,
    /// Length-discounted bigram Dice overlap
    NGram,
    /// Edit ratio on Soundex codes
    Soundex,
    /// Edit ratio on Metaphone codes
    Metaphone,
    /// Edit ratio on NYSIIS codes
    Nysiis,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::EditRatio,
        Metric::NGram,
        Metric::Soundex,
        Metric::Metaphone,
        Metric::Nysiis,
    ];

    pub fn family(&self) -> MetricFamily {
        match self {
            Metric::EditRatio | Metric::NGram => MetricFamily::Orthographic,
            Metric::Soundex | Metric::Metaphone | Metric::Nysiis => MetricFamily::Phonetic,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Metric::EditRatio => "edit_ratio",
            Metric::NGram => "ngram",
            Metric::Soundex => "soundex",
            Metric::Metaphone => "metaphone",
            Metric::Nysiis => "nysiis",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Normalized edit similarity: `100 * (1 - levenshtein / max_len)`.
///
/// Two empty strings are identical and score 100.
pub fn edit_ratio(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    strsim::normalized_levenshtein(&a, &b) * 100.0
}

/// Dice overlap of character n-grams, discounted by the length gap.
///
/// Whitespace is stripped first. Returns 0 when either side is shorter than
/// `n`, so two empty strings never look alike.
pub fn ngram_similarity(a: &str, b: &str, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }

    let a: Vec<char> = strip_whitespace(a);
    let b: Vec<char> = strip_whitespace(b);
    if a.len() < n || b.len() < n {
        return 0.0;
    }

    let grams_a: HashSet<&[char]> = a.windows(n).collect();
    let grams_b: HashSet<&[char]> = b.windows(n).collect();
    let common = grams_a.intersection(&grams_b).count();
    let raw = 2.0 * common as f64 / (grams_a.len() + grams_b.len()) as f64;

    let longest = a.len().max(b.len());
    let len_gap = a.len().abs_diff(b.len()) as f64 / longest as f64;

    raw * (1.0 - len_gap) * 100.0
}

pub fn soundex_similarity(a: &str, b: &str) -> f64 {
    let encoder = PhoneticEncoder::new();
    edit_ratio(&encoder.soundex(a), &encoder.soundex(b))
}

pub fn metaphone_similarity(a: &str, b: &str) -> f64 {
    let encoder = PhoneticEncoder::new();
    edit_ratio(&encoder.metaphone(a), &encoder.metaphone(b))
}

pub fn nysiis_similarity(a: &str, b: &str) -> f64 {
    let encoder = PhoneticEncoder::new();
    edit_ratio(&encoder.nysiis(a), &encoder.nysiis(b))
}

fn strip_whitespace(s: &str) -> Vec<char> {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_edit_ratio_identity_and_case() {
        assert!(approx(edit_ratio("Aspirina", "aspirina"), 100.0));
        assert!(approx(edit_ratio("", ""), 100.0));
    }

    #[test]
    fn test_edit_ratio_disjoint() {
        assert!(approx(edit_ratio("abcd", "wxyz"), 0.0));
    }

    #[test]
    fn test_edit_ratio_decreases_with_distance() {
        let base = "keto";
        let one = edit_ratio(base, "kato");
        let two = edit_ratio(base, "kata");
        let three = edit_ratio(base, "xata");
        assert!(100.0 > one && one > two && two > three);
    }

    #[test]
    fn test_ngram_identity() {
        assert!(approx(ngram_similarity("Dexbine", "dexbine", 2), 100.0));
    }

    #[test]
    fn test_ngram_short_inputs() {
        assert_eq!(ngram_similarity("", "", 2), 0.0);
        assert_eq!(ngram_similarity("a", "a", 2), 0.0);
        assert_eq!(ngram_similarity("a", "abc", 2), 0.0);
        assert_eq!(ngram_similarity("abc", "abc", 0), 0.0);
    }

    #[test]
    fn test_ngram_strips_whitespace() {
        assert!(approx(ngram_similarity("Ibu Pro", "ibupro", 2), 100.0));
    }

    #[test]
    fn test_ngram_length_discount() {
        // "ab" shares its only bigram with "abcd": raw dice = 2/(1+3) = 0.5,
        // length gap 2/4 halves it again.
        assert!(approx(ngram_similarity("ab", "abcd", 2), 25.0));
    }

    #[test]
    fn test_metaphone_separates_long_names_with_shared_start() {
        assert!(metaphone_similarity("Ketomifen", "Ketomivuxal") < 100.0);
        assert!(approx(metaphone_similarity("Ketomifen", "KETOMIFEN"), 100.0));
    }

    #[test]
    fn test_phonetic_metrics_catch_homophones() {
        assert!(approx(soundex_similarity("Robert", "Rupert"), 100.0));
        assert!(metaphone_similarity("Fenix", "Phenix") > metaphone_similarity("Fenix", "Tolar"));
    }

    #[test]
    fn test_families() {
        let phonetic = Metric::ALL
            .iter()
            .filter(|m| m.family() == MetricFamily::Phonetic)
            .count();
        assert_eq!(phonetic, 3);
    }
}
