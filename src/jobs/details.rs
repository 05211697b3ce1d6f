// src/jobs/details.rs

//! Static job data and scheduler→executor handoff types.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::PluginSet;
use crate::graph::{AssetKind, PluginGraph};

/// Canonical job key type: the plugin name within one asset-kind graph.
pub type JobKey = String;

/// One buildable unit within a single asset-kind graph.
///
/// `before` and `after` are mutually consistent views of the same edges
/// (if A is in B's `before`, B is in A's `after`), fixed at construction.
/// Only tracker state-set membership changes afterwards.
#[derive(Debug, Clone)]
pub struct JobDetails {
    pub key: JobKey,
    /// Same-kind dependencies that must complete before this job may start.
    pub before: Vec<JobKey>,
    /// Same-kind dependents, used to propagate dirtiness forward.
    pub after: Vec<JobKey>,
}

impl JobDetails {
    /// Derive the job list for one asset kind from the plugin graph.
    ///
    /// Only plugins participating in `kind` become jobs, and their edges are
    /// filtered to plugins that also participate in `kind`.
    pub fn for_kind(graph: &PluginGraph, kind: AssetKind) -> Vec<JobDetails> {
        graph
            .plugins()
            .filter(|name| graph.participates(name, kind))
            .map(|name| JobDetails {
                key: name.to_string(),
                before: graph
                    .dependencies_of(name)
                    .iter()
                    .filter(|dep| graph.participates(dep, kind))
                    .cloned()
                    .collect(),
                after: graph
                    .dependents_of(name)
                    .iter()
                    .filter(|dep| graph.participates(dep, kind))
                    .cloned()
                    .collect(),
            })
            .collect()
    }
}

/// Identifies one job the scheduler core wants executed now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    pub kind: AssetKind,
    pub plugin: JobKey,
}

/// A fully resolved unit of work for the executor: which compiler command to
/// run, and where.
#[derive(Debug, Clone)]
pub struct ScheduledJob {
    pub kind: AssetKind,
    pub plugin: JobKey,
    pub cmd: String,
    /// Working directory for the command; also the directory watched in
    /// watch mode.
    pub dir: PathBuf,
}

/// Maps `(kind, plugin)` to the concrete work the executor runs for it.
///
/// Built once from the validated plugin set; the runtime looks jobs up here
/// when the scheduler core hands out a [`JobRequest`].
#[derive(Debug, Clone, Default)]
pub struct BuildPlan {
    jobs: BTreeMap<(AssetKind, JobKey), ScheduledJob>,
}

impl BuildPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_plugins(plugins: &PluginSet) -> Self {
        let mut plan = Self::new();

        for (name, plugin) in plugins.plugins().iter() {
            for kind in AssetKind::ALL {
                let Some(section) = plugin.descriptor.asset_section(kind) else {
                    continue;
                };
                plan.insert(ScheduledJob {
                    kind,
                    plugin: name.clone(),
                    cmd: section.effective_cmd(kind),
                    dir: plugin.dir.join(&section.src),
                });
            }
        }

        plan
    }

    pub fn insert(&mut self, job: ScheduledJob) {
        self.jobs.insert((job.kind, job.plugin.clone()), job);
    }

    pub fn job_for(&self, request: &JobRequest) -> Option<&ScheduledJob> {
        self.jobs.get(&(request.kind, request.plugin.clone()))
    }

    /// Directory to watch for the given job in watch mode.
    pub fn watch_dir(&self, kind: AssetKind, plugin: &str) -> Option<&PathBuf> {
        self.jobs
            .get(&(kind, plugin.to_string()))
            .map(|job| &job.dir)
    }
}
