#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;

use plugbuild::graph::AssetKind;
use plugbuild::jobs::{BuildPlan, BuildScheduler, JobDetails, JobTracker, ScheduledJob};

/// Builder for per-kind job graphs used in scheduler and tracker tests.
///
/// Dependencies are declared via `before`; the inverse `after` edges are
/// derived automatically so both views stay consistent.
pub struct JobGraphBuilder {
    before: BTreeMap<String, Vec<String>>,
}

impl JobGraphBuilder {
    pub fn new() -> Self {
        Self {
            before: BTreeMap::new(),
        }
    }

    /// Add a job with no dependencies.
    pub fn job(self, key: &str) -> Self {
        self.job_after(key, &[])
    }

    /// Add a job that must run after the given dependencies.
    pub fn job_after(mut self, key: &str, before: &[&str]) -> Self {
        self.before.insert(
            key.to_string(),
            before.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    /// Materialise the job list with consistent `before`/`after` edges.
    pub fn details(self) -> Vec<JobDetails> {
        let mut after: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (key, deps) in self.before.iter() {
            for dep in deps {
                after.entry(dep.clone()).or_default().push(key.clone());
            }
        }

        self.before
            .iter()
            .map(|(key, before)| JobDetails {
                key: key.clone(),
                before: before.clone(),
                after: after.get(key).cloned().unwrap_or_default(),
            })
            .collect()
    }

    pub fn tracker(self) -> JobTracker {
        JobTracker::new(self.details()).expect("builder produced an invalid job graph")
    }

    /// A scheduler core with this graph as the single tracker for `kind`.
    pub fn scheduler(self, kind: AssetKind) -> BuildScheduler {
        let mut trackers = BTreeMap::new();
        trackers.insert(kind, self.tracker());
        BuildScheduler::new(trackers)
    }
}

impl Default for JobGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A build plan whose jobs all run a no-op command; enough for runtime tests
/// that use a fake executor and never spawn processes.
pub fn noop_plan(kind: AssetKind, plugins: &[&str]) -> BuildPlan {
    let mut plan = BuildPlan::new();
    for plugin in plugins {
        plan.insert(ScheduledJob {
            kind,
            plugin: plugin.to_string(),
            cmd: "true".to_string(),
            dir: PathBuf::from("."),
        });
    }
    plan
}
