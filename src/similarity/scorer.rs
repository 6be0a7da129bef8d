//! Composite similarity scoring
//!
//! The overall score is a two-level mean: phonetic and orthographic
//! families are averaged internally, then weighted equally against each
//! other. The n-gram metric is length sensitive, so it only ever contributes
//! a quarter of the overall score.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::justify::{EditJustification, EditJustifier};
use super::metrics::{edit_ratio, ngram_similarity, Metric, MetricFamily, DEFAULT_NGRAM_SIZE};
use super::phonetic::{PhoneticCode, PhoneticEncoder};
use crate::types::{Name, Reduction};

/// Corpus size above which comparisons are spread over the rayon pool
const PARALLEL_CUTOFF: usize = 512;

/// A name with its normalized form and phonetic codes precomputed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameProfile {
    pub name: Name,
    pub normalized: String,
    pub codes: PhoneticCode,
}

impl NameProfile {
    pub fn new(name: Name, encoder: &PhoneticEncoder) -> Self {
        let normalized = name.normalized();
        let codes = encoder.encode(&normalized);
        Self {
            name,
            normalized,
            codes,
        }
    }
}

/// Per-metric scores for one pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricBreakdown {
    pub edit_ratio: f64,
    pub ngram: f64,
    pub soundex: f64,
    pub metaphone: f64,
    pub nysiis: f64,
}

impl MetricBreakdown {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::EditRatio => self.edit_ratio,
            Metric::NGram => self.ngram,
            Metric::Soundex => self.soundex,
            Metric::Metaphone => self.metaphone,
            Metric::Nysiis => self.nysiis,
        }
    }

    fn slot(&mut self, metric: Metric) -> &mut f64 {
        match metric {
            Metric::EditRatio => &mut self.edit_ratio,
            Metric::NGram => &mut self.ngram,
            Metric::Soundex => &mut self.soundex,
            Metric::Metaphone => &mut self.metaphone,
            Metric::Nysiis => &mut self.nysiis,
        }
    }

    /// Unweighted mean of the metrics that belong to `family`
    pub fn family_mean(&self, family: MetricFamily) -> f64 {
        let scores: Vec<f64> = Metric::ALL
            .iter()
            .filter(|metric| metric.family() == family)
            .map(|metric| self.get(*metric))
            .collect();
        mean(&scores)
    }

    pub fn phonetic(&self) -> f64 {
        self.family_mean(MetricFamily::Phonetic)
    }

    pub fn orthographic(&self) -> f64 {
        self.family_mean(MetricFamily::Orthographic)
    }

    pub fn overall(&self) -> f64 {
        mean(&[self.phonetic(), self.orthographic()])
    }
}

/// Result of comparing one candidate with one reference name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeResult {
    pub candidate: Name,
    pub reference: Name,
    pub breakdown: MetricBreakdown,
    pub phonetic: f64,
    pub orthographic: f64,
    pub overall: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justification: Option<EditJustification>,
}

/// A corpus-wide score collapsed with a [`Reduction`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReducedScore {
    pub reduction: Reduction,
    pub score: f64,
    /// Corpus entry with the highest overall similarity
    pub closest: Name,
    pub closest_score: f64,
}

/// Fuses the individual metrics into phonetic, orthographic and overall scores
#[derive(Debug)]
pub struct CompositeScorer {
    encoder: PhoneticEncoder,
    ngram_size: usize,
}

impl Default for CompositeScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl CompositeScorer {
    pub fn new() -> Self {
        Self {
            encoder: PhoneticEncoder::new(),
            ngram_size: DEFAULT_NGRAM_SIZE,
        }
    }

    /// Use a different n-gram size for the orthographic family
    pub fn with_ngram_size(mut self, n: usize) -> Self {
        self.ngram_size = n;
        self
    }

    pub fn encoder(&self) -> &PhoneticEncoder {
        &self.encoder
    }

    pub fn profile(&self, name: &Name) -> NameProfile {
        NameProfile::new(name.clone(), &self.encoder)
    }

    /// Compare two names
    pub fn compare(&self, a: &Name, b: &Name) -> CompositeResult {
        self.compare_profiles(&self.profile(a), &self.profile(b))
    }

    /// Compare two names and attach the edit justification
    pub fn detailed(&self, a: &Name, b: &Name) -> CompositeResult {
        let mut result = self.compare(a, b);
        result.justification = Some(EditJustifier::new().justify(a.as_str(), b.as_str()));
        result
    }

    /// Compare precomputed profiles
    pub fn compare_profiles(&self, a: &NameProfile, b: &NameProfile) -> CompositeResult {
        let breakdown = self.breakdown(a, b);
        CompositeResult {
            candidate: a.name.clone(),
            reference: b.name.clone(),
            breakdown,
            phonetic: breakdown.phonetic(),
            orthographic: breakdown.orthographic(),
            overall: breakdown.overall(),
            justification: None,
        }
    }

    /// Score one metric on precomputed profiles
    pub fn metric_score(&self, metric: Metric, a: &NameProfile, b: &NameProfile) -> f64 {
        match metric {
            Metric::EditRatio => edit_ratio(&a.normalized, &b.normalized),
            Metric::NGram => ngram_similarity(&a.normalized, &b.normalized, self.ngram_size),
            Metric::Soundex => edit_ratio(&a.codes.soundex, &b.codes.soundex),
            Metric::Metaphone => edit_ratio(&a.codes.metaphone, &b.codes.metaphone),
            Metric::Nysiis => edit_ratio(&a.codes.nysiis, &b.codes.nysiis),
        }
    }

    fn breakdown(&self, a: &NameProfile, b: &NameProfile) -> MetricBreakdown {
        let mut breakdown = MetricBreakdown::default();
        for metric in Metric::ALL {
            *breakdown.slot(metric) = self.metric_score(metric, a, b);
        }
        breakdown
    }

    /// Compare a candidate with every corpus profile, in corpus order
    pub fn compare_against_corpus(
        &self,
        candidate: &NameProfile,
        corpus: &[NameProfile],
    ) -> Vec<CompositeResult> {
        if corpus.len() >= PARALLEL_CUTOFF {
            corpus
                .par_iter()
                .map(|reference| self.compare_profiles(candidate, reference))
                .collect()
        } else {
            corpus
                .iter()
                .map(|reference| self.compare_profiles(candidate, reference))
                .collect()
        }
    }

    /// Names in `corpus` whose overall similarity to `query` is below `threshold`
    pub fn dissimilar_names<'a>(
        &self,
        query: &Name,
        corpus: &'a [NameProfile],
        threshold: f64,
    ) -> Vec<&'a Name> {
        let query = self.profile(query);
        corpus
            .iter()
            .filter(|reference| self.compare_profiles(&query, reference).overall < threshold)
            .map(|reference| &reference.name)
            .collect()
    }
}

/// Mean overall similarity; `None` for an empty slice
pub fn mean_overall(results: &[CompositeResult]) -> Option<f64> {
    if results.is_empty() {
        return None;
    }
    Some(results.iter().map(|r| r.overall).sum::<f64>() / results.len() as f64)
}

/// Highest overall similarity and its position; first wins on ties
pub fn max_overall(results: &[CompositeResult]) -> Option<(usize, f64)> {
    results
        .iter()
        .enumerate()
        .fold(None, |best, (i, r)| match best {
            Some((_, score)) if score >= r.overall => best,
            _ => Some((i, r.overall)),
        })
}

/// Collapse corpus results with `reduction`; `None` when there is nothing to reduce
pub fn reduce(results: &[CompositeResult], reduction: Reduction) -> Option<ReducedScore> {
    let (closest_idx, closest_score) = max_overall(results)?;
    let score = match reduction {
        Reduction::Mean => mean_overall(results)?,
        Reduction::Max => closest_score,
    };
    Some(ReducedScore {
        reduction,
        score,
        closest: results[closest_idx].reference.clone(),
        closest_score,
    })
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
