// src/jobs/scheduler.rs

//! Pure multi-tracker scheduling core.
//!
//! `BuildScheduler` owns one [`JobTracker`] per active asset kind and applies
//! all state transitions; it has no channels, no Tokio types, and performs no
//! IO, so the scheduling semantics can be unit tested without an executor or
//! filesystem. The async shell (`engine::Runtime`) drives it.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::errors::{PlugbuildError, Result};
use crate::graph::{AssetKind, PluginGraph};
use crate::jobs::details::{JobDetails, JobKey, JobRequest};
use crate::jobs::tracker::{JobTracker, NextJob};

#[derive(Debug)]
pub struct BuildScheduler {
    trackers: BTreeMap<AssetKind, JobTracker>,
    /// Jobs that failed and have not been re-dirtied by a relevant change
    /// since. Suppressed from scheduling so a broken compile does not
    /// hot-loop in watch mode; dependents stay blocked regardless because a
    /// failed key stays dirty.
    failed: BTreeMap<AssetKind, BTreeSet<JobKey>>,
}

impl BuildScheduler {
    /// Build one tracker per asset kind that has at least one participating
    /// plugin.
    pub fn from_graph(graph: &PluginGraph) -> Result<Self> {
        let mut trackers = BTreeMap::new();

        for kind in AssetKind::ALL {
            let details = JobDetails::for_kind(graph, kind);
            if details.is_empty() {
                continue;
            }
            debug!(kind = %kind, jobs = details.len(), "constructing job tracker");
            trackers.insert(kind, JobTracker::new(details)?);
        }

        Ok(Self::new(trackers))
    }

    pub fn new(trackers: BTreeMap<AssetKind, JobTracker>) -> Self {
        Self {
            trackers,
            failed: BTreeMap::new(),
        }
    }

    fn tracker_mut(&mut self, kind: AssetKind) -> Result<&mut JobTracker> {
        self.trackers.get_mut(&kind).ok_or_else(|| {
            PlugbuildError::UnknownJob(format!("no job tracker for asset kind '{kind}'"))
        })
    }

    /// Read-only access to one tracker (diagnostics and tests).
    pub fn tracker(&self, kind: AssetKind) -> Option<&JobTracker> {
        self.trackers.get(&kind)
    }

    /// Pull the next ready job across all trackers and mark it processing.
    ///
    /// Trackers are polled in kind order, so capacity is shared between
    /// asset kinds rather than one kind starving the other. Returns `None`
    /// when nothing is eligible anywhere (blocked or drained).
    pub fn next_submission(&mut self) -> Result<Option<JobRequest>> {
        let failed = &self.failed;

        for (kind, tracker) in self.trackers.iter_mut() {
            let kind = *kind;
            let suppressed = failed.get(&kind);

            let next =
                tracker.next_job_where(|key| !suppressed.is_some_and(|s| s.contains(key)));

            match next {
                NextJob::Ready(key) => {
                    tracker.mark_processing(&key)?;
                    debug!(kind = %kind, plugin = %key, "job ready for submission");
                    return Ok(Some(JobRequest { kind, plugin: key }));
                }
                NextJob::Blocked | NextJob::Drained => continue,
            }
        }

        Ok(None)
    }

    /// Record a successful job completion.
    ///
    /// Returns `true` if this was the key's first-ever completion. Direct
    /// dependents that were failure-suppressed are released: their inputs
    /// just changed, so they deserve a fresh attempt.
    pub fn job_succeeded(&mut self, kind: AssetKind, plugin: &str) -> Result<bool> {
        let tracker = self.tracker_mut(kind)?;
        let first_time = tracker.mark_completed(plugin)?;
        let dependents: Vec<JobKey> = tracker.dependents_of(plugin)?.to_vec();

        if let Some(suppressed) = self.failed.get_mut(&kind) {
            for dependent in &dependents {
                suppressed.remove(dependent);
            }
        }

        Ok(first_time)
    }

    /// Record a failed job. The key returns to dirty (dependents stay
    /// blocked) but is suppressed from rescheduling until something
    /// re-dirties it.
    pub fn job_failed(&mut self, kind: AssetKind, plugin: &str) -> Result<()> {
        self.tracker_mut(kind)?.mark_failed(plugin)?;
        self.failed
            .entry(kind)
            .or_default()
            .insert(plugin.to_string());
        Ok(())
    }

    /// React to a filesystem change for one plugin's sources: mark the key
    /// and its transitive dependents dirty, and lift failure suppression for
    /// the changed key so a fixed source file actually retriggers.
    pub fn source_changed(&mut self, kind: AssetKind, plugin: &str) -> Result<Vec<JobKey>> {
        let newly_dirty = self.tracker_mut(kind)?.mark_dirty(plugin)?;

        if let Some(suppressed) = self.failed.get_mut(&kind) {
            suppressed.remove(plugin);
            for key in &newly_dirty {
                suppressed.remove(key);
            }
        }

        Ok(newly_dirty)
    }

    /// True when every tracker has neither dirty nor pending work.
    pub fn is_drained(&self) -> bool {
        self.trackers.values().all(JobTracker::is_drained)
    }
}
