//! Generate-and-reject search for names unlike anything in the corpus

use std::time::Instant;

use chrono::Utc;
use regex::Regex;

use super::state::GenerationState;
use crate::corpus::{ReferenceCorpus, SharedCorpus};
use crate::error::{NameForgeError, Result};
use crate::generator::NameGenerator;
use crate::similarity::scorer::reduce;
use crate::similarity::{CompositeScorer, EditJustifier, ReducedScore};
use crate::types::{Name, SamplerConfig, SamplerMetrics, ScoredCandidate, SearchOutcome, UniqueName};

/// Candidates must be a single run of ASCII letters
const WELL_FORMED: &str = r"^[A-Za-z]+$";

/// Why a candidate was discarded
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    /// Already produced in this run
    Duplicate,
    /// Whitespace, digits or punctuation in the candidate
    Malformed,
    /// Reduced score reached the threshold
    TooSimilar(ReducedScore),
    /// Passed against its snapshot but not against names published since by other workers
    Superseded,
}

/// Outcome of a single iteration
#[derive(Debug, Clone)]
pub enum Attempt {
    Accepted(UniqueName),
    Rejected { candidate: Name, reason: RejectReason },
}

/// Rejection sampler over a [`NameGenerator`]
pub struct UniquenessSampler<G> {
    generator: G,
    scorer: CompositeScorer,
    justifier: EditJustifier,
    config: SamplerConfig,
    state: GenerationState,
    metrics: SamplerMetrics,
    structure: Regex,
}

impl<G: NameGenerator> UniquenessSampler<G> {
    pub fn new(generator: G, config: SamplerConfig) -> Result<Self> {
        config.validate()?;
        let structure = Regex::new(WELL_FORMED).map_err(|e| NameForgeError::internal(e.to_string()))?;

        Ok(Self {
            generator,
            scorer: CompositeScorer::new(),
            justifier: EditJustifier::new(),
            config,
            state: GenerationState::new(),
            metrics: SamplerMetrics::default(),
            structure,
        })
    }

    pub fn with_scorer(mut self, scorer: CompositeScorer) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    pub fn metrics(&self) -> SamplerMetrics {
        self.metrics
    }

    pub fn state(&self) -> &GenerationState {
        &self.state
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn into_generator(self) -> G {
        self.generator
    }

    /// Forget produced candidates and counters; the next search is a new run
    pub fn reset(&mut self) {
        self.state = GenerationState::new();
        self.metrics = SamplerMetrics::default();
    }

    /// Draw and judge one candidate.
    ///
    /// With an empty corpus nothing can be compared, so the first
    /// well-formed candidate is accepted with no score.
    pub fn attempt(&mut self, corpus: &ReferenceCorpus) -> Attempt {
        self.metrics.attempts += 1;
        let candidate = self.generator.generate();

        if let Some(reason) = self.screen(&candidate) {
            match reason {
                RejectReason::Duplicate => self.metrics.rejected_duplicate += 1,
                _ => self.metrics.rejected_malformed += 1,
            }
            tracing::debug!(candidate = %candidate, reason = ?reason, "Candidate discarded");
            return Attempt::Rejected { candidate, reason };
        }

        if corpus.is_empty() {
            return Attempt::Accepted(self.accepted(candidate, None));
        }

        let profile = self.scorer.profile(&candidate);
        let results = self.scorer.compare_against_corpus(&profile, corpus.profiles());
        let Some(reduced) = reduce(&results, self.config.reduction) else {
            return Attempt::Accepted(self.accepted(candidate, None));
        };

        if reduced.score < self.config.threshold {
            Attempt::Accepted(self.accepted(candidate, Some(reduced)))
        } else {
            self.metrics.rejected_similar += 1;
            tracing::debug!(
                candidate = %candidate,
                score = reduced.score,
                closest = %reduced.closest,
                "Candidate too similar"
            );
            Attempt::Rejected {
                candidate,
                reason: RejectReason::TooSimilar(reduced),
            }
        }
    }

    /// Search until a candidate is accepted or the budget runs out
    pub fn find_unique(&mut self, corpus: &ReferenceCorpus) -> SearchOutcome {
        self.search(|sampler| sampler.attempt(corpus))
    }

    /// Search against a corpus that other workers may grow concurrently.
    ///
    /// Each attempt scores against a fresh snapshot. An accepted name is
    /// re-checked under the publish lock and then added to the corpus.
    pub fn find_unique_shared(&mut self, shared: &SharedCorpus) -> SearchOutcome {
        self.search(|sampler| {
            let snapshot = shared.snapshot();
            let found = match sampler.attempt(&snapshot) {
                Attempt::Accepted(found) => found,
                rejected => return rejected,
            };

            let published = shared.publish_if(found.name.clone(), |current| {
                current.len() == snapshot.len() || sampler.passes(&found.name, current)
            });
            if published {
                Attempt::Accepted(found)
            } else {
                sampler.metrics.rejected_similar += 1;
                Attempt::Rejected {
                    candidate: found.name,
                    reason: RejectReason::Superseded,
                }
            }
        })
    }

    /// Whether `name` would be accepted against `corpus`
    pub fn passes(&self, name: &Name, corpus: &ReferenceCorpus) -> bool {
        let profile = self.scorer.profile(name);
        let results = self.scorer.compare_against_corpus(&profile, corpus.profiles());
        reduce(&results, self.config.reduction).map_or(true, |r| r.score < self.config.threshold)
    }

    fn search<F>(&mut self, mut step: F) -> SearchOutcome
    where
        F: FnMut(&mut Self) -> Attempt,
    {
        let started = Instant::now();
        let deadline = self.config.max_duration.map(|d| started + d);
        let mut attempts = 0usize;
        let mut best: Option<ScoredCandidate> = None;

        while attempts < self.config.max_attempts {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                break;
            }
            attempts += 1;

            match step(self) {
                Attempt::Accepted(mut found) => {
                    found.attempts = attempts;
                    tracing::info!(
                        name = %found.name,
                        score = ?found.score,
                        attempts,
                        duration_ms = %started.elapsed().as_millis(),
                        "Unique name accepted"
                    );
                    return SearchOutcome::Accepted(found);
                }
                Attempt::Rejected {
                    candidate,
                    reason: RejectReason::TooSimilar(reduced),
                } => {
                    if best.as_ref().map_or(true, |b| reduced.score < b.score) {
                        best = Some(ScoredCandidate {
                            name: candidate,
                            score: reduced.score,
                        });
                    }
                }
                Attempt::Rejected { .. } => {}
            }
        }

        let elapsed = started.elapsed();
        tracing::warn!(
            attempts,
            duration_ms = %elapsed.as_millis(),
            threshold = self.config.threshold,
            best_score = ?best.as_ref().map(|b| b.score),
            "No candidate fell below the threshold"
        );
        SearchOutcome::Exhausted {
            attempts,
            elapsed,
            best,
        }
    }

    fn screen(&mut self, candidate: &Name) -> Option<RejectReason> {
        if !self.structure.is_match(candidate.as_str()) {
            return Some(RejectReason::Malformed);
        }
        if self.config.dedup && !self.state.record(candidate) {
            return Some(RejectReason::Duplicate);
        }
        None
    }

    fn accepted(&self, name: Name, reduced: Option<ReducedScore>) -> UniqueName {
        let (score, closest, closest_score, justification) = match reduced {
            Some(r) => {
                let justification = self.justifier.justify(name.as_str(), r.closest.as_str());
                (Some(r.score), Some(r.closest), Some(r.closest_score), Some(justification))
            }
            None => (None, None, None, None),
        };

        UniqueName {
            name,
            score,
            reduction: self.config.reduction,
            closest,
            closest_score,
            justification,
            attempts: 1,
            found_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GenerationStrategy, Reduction};
    use std::collections::VecDeque;
    use std::time::Duration;

    /// Replays a fixed list, then repeats the last entry
    struct Scripted {
        queue: VecDeque<&'static str>,
        last: &'static str,
    }

    impl Scripted {
        fn new(names: &[&'static str]) -> Self {
            Self {
                queue: names.iter().copied().collect(),
                last: names[names.len() - 1],
            }
        }
    }

    impl NameGenerator for Scripted {
        fn generate(&mut self) -> Name {
            let next = self.queue.pop_front().unwrap_or(self.last);
            Name::new(next).unwrap()
        }

        fn strategy(&self) -> GenerationStrategy {
            GenerationStrategy::Syllable
        }
    }

    fn corpus(names: &[&str]) -> ReferenceCorpus {
        names.iter().map(|s| Name::new(*s).unwrap()).collect()
    }

    fn config(reduction: Reduction) -> SamplerConfig {
        SamplerConfig {
            threshold: 50.0,
            reduction,
            max_attempts: 20,
            ..Default::default()
        }
    }

    #[test]
    fn test_accepts_dissimilar_first() {
        let mut sampler = UniquenessSampler::new(Scripted::new(&["Zyxqklm", "Aspirinax"]), config(Reduction::Mean)).unwrap();
        let found = sampler
            .find_unique(&corpus(&["Aspirina", "Ibuprofeno"]))
            .into_accepted()
            .unwrap();
        assert_eq!(found.name.as_str(), "Zyxqklm");
        assert_eq!(found.attempts, 1);
        assert!(found.score.unwrap() < 50.0);
    }

    #[test]
    fn test_rejects_near_copy_then_moves_on() {
        let mut sampler = UniquenessSampler::new(Scripted::new(&["Aspirinax", "Zyxqklm"]), config(Reduction::Max)).unwrap();
        let reference = corpus(&["Aspirina", "Ibuprofeno"]);

        match sampler.attempt(&reference) {
            Attempt::Rejected {
                reason: RejectReason::TooSimilar(reduced),
                ..
            } => assert_eq!(reduced.closest.as_str(), "Aspirina"),
            other => panic!("expected rejection, got {:?}", other),
        }

        let found = sampler.find_unique(&reference).into_accepted().unwrap();
        assert_eq!(found.name.as_str(), "Zyxqklm");
        assert!(found.closest.is_some());
        assert!(found.justification.is_some());
    }

    #[test]
    fn test_empty_corpus_short_circuits() {
        let mut sampler = UniquenessSampler::new(Scripted::new(&["Aspirina"]), config(Reduction::Mean)).unwrap();
        let found = sampler.find_unique(&ReferenceCorpus::empty()).into_accepted().unwrap();
        assert_eq!(found.name.as_str(), "Aspirina");
        assert_eq!(found.score, None);
        assert_eq!(found.closest, None);
    }

    #[test]
    fn test_exhaustion_is_typed() {
        let mut sampler = UniquenessSampler::new(
            Scripted::new(&["Aspirina"]),
            SamplerConfig {
                dedup: false,
                ..config(Reduction::Max)
            },
        )
        .unwrap();
        match sampler.find_unique(&corpus(&["Aspirina"])) {
            SearchOutcome::Exhausted { attempts, best, .. } => {
                assert_eq!(attempts, 20);
                assert_eq!(best.map(|b| b.name.into_inner()), Some("Aspirina".to_string()));
            }
            other => panic!("expected exhaustion, got {:?}", other),
        }
        assert_eq!(sampler.metrics().rejected_similar, 20);
    }

    #[test]
    fn test_duplicates_are_discarded() {
        let mut sampler = UniquenessSampler::new(Scripted::new(&["Aspirinax", "Aspirinax", "Zyxqklm"]), config(Reduction::Max)).unwrap();
        let found = sampler.find_unique(&corpus(&["Aspirina"])).into_accepted().unwrap();
        assert_eq!(found.name.as_str(), "Zyxqklm");
        assert_eq!(found.attempts, 3);
        assert_eq!(sampler.metrics().rejected_duplicate, 1);
        assert_eq!(sampler.metrics().rejected_similar, 1);
    }

    #[test]
    fn test_malformed_candidates_are_discarded() {
        let mut sampler = UniquenessSampler::new(Scripted::new(&["Two Words", "Zyxqklm"]), config(Reduction::Mean)).unwrap();
        let found = sampler.find_unique(&ReferenceCorpus::empty()).into_accepted().unwrap();
        assert_eq!(found.name.as_str(), "Zyxqklm");
        assert_eq!(sampler.metrics().rejected_malformed, 1);
    }

    #[test]
    fn test_deadline_stops_search() {
        let mut sampler = UniquenessSampler::new(
            Scripted::new(&["Aspirina"]),
            SamplerConfig {
                dedup: false,
                max_attempts: usize::MAX,
                max_duration: Some(Duration::from_millis(50)),
                ..config(Reduction::Max)
            },
        )
        .unwrap();
        assert!(sampler.find_unique(&corpus(&["Aspirina"])).is_exhausted());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = UniquenessSampler::new(
            Scripted::new(&["Keto"]),
            SamplerConfig {
                threshold: -1.0,
                ..Default::default()
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_shared_publishes_accepted_names() {
        let shared = SharedCorpus::new(corpus(&["Ibuprofeno"]));
        let mut first = UniquenessSampler::new(Scripted::new(&["Aspirina"]), config(Reduction::Max)).unwrap();
        assert!(first.find_unique_shared(&shared).accepted().is_some());
        assert_eq!(shared.len(), 2);

        let mut second = UniquenessSampler::new(Scripted::new(&["Aspirina", "Zyxqklm"]), config(Reduction::Max)).unwrap();
        let found = second.find_unique_shared(&shared).into_accepted().unwrap();
        assert_eq!(found.name.as_str(), "Zyxqklm");
        assert_eq!(shared.len(), 3);
    }
}
