//! Several uniqueness searches running side by side

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use tokio::sync::Semaphore;

use super::engine::UniquenessSampler;
use crate::corpus::SharedCorpus;
use crate::error::{NameForgeError, Result};
use crate::generator::{CandidateGenerator, NameGenerator};
use crate::types::{SamplerConfig, SamplerMetrics, SearchOutcome};

/// Batch result with the combined counters of every worker
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub outcomes: Vec<SearchOutcome>,
    pub metrics: SamplerMetrics,
}

impl BatchReport {
    pub fn accepted_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.accepted().is_some()).count()
    }
}

/// Runs `count` searches on blocking worker threads.
///
/// Workers share the corpus: every accepted name is published before the
/// next search can see it, so names in one batch also stay apart from each
/// other. Each worker keeps its own dedup state.
pub struct BatchSampler {
    generator: CandidateGenerator,
    config: SamplerConfig,
    semaphore: Arc<Semaphore>,
}

impl BatchSampler {
    /// `workers` bounds how many searches run at once
    pub fn new(generator: CandidateGenerator, config: SamplerConfig, workers: usize) -> Result<Self> {
        config.validate()?;
        if workers == 0 {
            return Err(NameForgeError::config("workers must be at least 1"));
        }

        Ok(Self {
            generator,
            config,
            semaphore: Arc::new(Semaphore::new(workers)),
        })
    }

    pub async fn run(&self, corpus: &SharedCorpus, count: usize) -> Result<BatchReport> {
        let started = Instant::now();
        let strategy = self.generator.strategy();

        let tasks = (0..count).map(|index| {
            let semaphore = Arc::clone(&self.semaphore);
            let corpus = corpus.clone();
            let generator = self.generator.fork();
            let config = self.config.clone();

            async move {
                let _permit = semaphore.acquire_owned().await.map_err(|e| {
                    NameForgeError::internal(format!("Failed to acquire semaphore: {}", e))
                })?;

                let handle = tokio::task::spawn_blocking(move || -> Result<(SearchOutcome, SamplerMetrics)> {
                    let mut sampler = UniquenessSampler::new(generator, config)?;
                    let outcome = sampler.find_unique_shared(&corpus);
                    tracing::debug!(worker = index, exhausted = outcome.is_exhausted(), "Worker finished");
                    Ok((outcome, sampler.metrics()))
                });
                handle.await?
            }
        });

        let mut outcomes = Vec::with_capacity(count);
        let mut metrics = SamplerMetrics::default();
        for result in join_all(tasks).await {
            let (outcome, worker) = result?;
            metrics.attempts += worker.attempts;
            metrics.rejected_similar += worker.rejected_similar;
            metrics.rejected_duplicate += worker.rejected_duplicate;
            metrics.rejected_malformed += worker.rejected_malformed;
            outcomes.push(outcome);
        }

        let report = BatchReport { outcomes, metrics };
        tracing::info!(
            strategy = %strategy,
            requested = count,
            accepted = report.accepted_count(),
            attempts = metrics.attempts,
            duration_ms = %started.elapsed().as_millis(),
            "Batch completed"
        );
        Ok(report)
    }
}
