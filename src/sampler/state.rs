//! Per-run generation state

use std::collections::HashSet;

use crate::types::Name;

/// Candidates already produced in one run. Owned by a single sampler,
/// never shared between workers.
#[derive(Debug, Clone, Default)]
pub struct GenerationState {
    seen: HashSet<String>,
}

impl GenerationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name`; returns `false` if it was already produced.
    /// Case-insensitive, like every comparison in the crate.
    pub fn record(&mut self, name: &Name) -> bool {
        self.seen.insert(name.normalized())
    }

    pub fn contains(&self, name: &Name) -> bool {
        self.seen.contains(&name.normalized())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
