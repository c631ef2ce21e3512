use std::collections::BTreeMap;

use crate::JobConfig;

/// The set of jobs that currently have an indicator, keyed by normalized name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrackerState {
    jobs: BTreeMap<String, JobConfig>,
}

impl TrackerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tracks(&self, name: &str) -> bool {
        self.jobs.contains_key(name)
    }

    /// Tracked names in ascending order.
    pub fn names(&self) -> Vec<String> {
        self.jobs.keys().cloned().collect()
    }

    pub fn job(&self, name: &str) -> Option<&JobConfig> {
        self.jobs.get(name)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub(crate) fn jobs(&self) -> impl Iterator<Item = (&String, &JobConfig)> {
        self.jobs.iter()
    }

    pub(crate) fn replace(&mut self, batch: &[(String, JobConfig)]) {
        self.jobs = batch.iter().cloned().collect();
    }
}
