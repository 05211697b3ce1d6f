// src/jobs/tracker.rs

//! Per-asset-kind dirty/pending/completed state machine.
//!
//! One `JobTracker` owns the scheduling state for one kind of build graph
//! (e.g. all TypeScript jobs). It decides, at any instant, which job is safe
//! to start next, and keeps the bookkeeping that makes that decision correct:
//!
//! - `dirty`: jobs whose output is stale and that want (re)scheduling,
//! - `pending`: jobs currently handed to the executor,
//! - `completed_once`: jobs that have succeeded at least once this process
//!   lifetime (drives first-build-only side effects such as registering a
//!   watcher).
//!
//! A key may be dirty and pending at the same time (re-dirtied while its
//! build is still in flight); it is only rebuilt after the in-flight build
//! finishes.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::errors::{PlugbuildError, Result};
use crate::jobs::details::{JobDetails, JobKey};

/// Result of asking a tracker for its next job.
///
/// `Blocked` and `Drained` are deliberately distinct: `Blocked` means "work
/// remains but nothing is eligible right now, poll again after a completion",
/// while `Drained` is terminal unless something is re-dirtied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextJob {
    /// A dirty, non-pending job whose dependencies are all settled.
    Ready(JobKey),
    /// Work remains, but it is blocked on dirty or in-flight dependencies.
    Blocked,
    /// Both the dirty and pending sets are empty; no more work, ever,
    /// unless re-dirtied.
    Drained,
}

#[derive(Debug)]
pub struct JobTracker {
    jobs: BTreeMap<JobKey, JobDetails>,
    dirty: BTreeSet<JobKey>,
    pending: BTreeSet<JobKey>,
    completed_once: BTreeSet<JobKey>,
}

impl JobTracker {
    /// Construct a tracker over the given jobs.
    ///
    /// Every job starts dirty: each must build at least once. All `before`
    /// and `after` references must resolve to known keys; anything else is a
    /// broken graph construction and rejected up front.
    pub fn new(details: Vec<JobDetails>) -> Result<Self> {
        let jobs: BTreeMap<JobKey, JobDetails> = details
            .into_iter()
            .map(|d| (d.key.clone(), d))
            .collect();

        for details in jobs.values() {
            for edge in details.before.iter().chain(details.after.iter()) {
                if !jobs.contains_key(edge) {
                    return Err(PlugbuildError::ConfigError(format!(
                        "job '{}' references unknown job '{}'",
                        details.key, edge
                    )));
                }
            }
        }

        let dirty: BTreeSet<JobKey> = jobs.keys().cloned().collect();

        Ok(Self {
            jobs,
            dirty,
            pending: BTreeSet::new(),
            completed_once: BTreeSet::new(),
        })
    }

    fn require_known(&self, key: &str) -> Result<()> {
        if self.jobs.contains_key(key) {
            Ok(())
        } else {
            Err(PlugbuildError::UnknownJob(key.to_string()))
        }
    }

    /// Mark a job and its entire transitive dependent closure dirty.
    ///
    /// Already-dirty keys are skipped, which both makes repeated calls
    /// idempotent and bounds the fan-out even if the graph were accidentally
    /// cyclic. Returns the keys that were newly marked dirty.
    pub fn mark_dirty(&mut self, key: &str) -> Result<Vec<JobKey>> {
        self.require_known(key)?;

        let mut newly_dirty = Vec::new();
        let mut stack: Vec<JobKey> = vec![key.to_string()];

        while let Some(name) = stack.pop() {
            if !self.dirty.insert(name.clone()) {
                // Already dirty: the closure beyond this key is dirty too.
                continue;
            }

            debug!(job = %name, "marked dirty");
            // Edges were validated at construction, so the lookup cannot miss.
            if let Some(details) = self.jobs.get(&name) {
                stack.extend(details.after.iter().cloned());
            }
            newly_dirty.push(name);
        }

        Ok(newly_dirty)
    }

    /// Move a job from dirty to pending. Called exactly when the scheduler
    /// hands the job to the executor.
    pub fn mark_processing(&mut self, key: &str) -> Result<()> {
        self.require_known(key)?;
        self.dirty.remove(key);
        self.pending.insert(key.to_string());
        debug!(job = %key, "marked processing");
        Ok(())
    }

    /// Record a successful completion.
    ///
    /// Returns `true` the first time a given key ever completes, `false` on
    /// every rebuild. Callers use this to run first-build-only side effects.
    pub fn mark_completed(&mut self, key: &str) -> Result<bool> {
        self.require_known(key)?;
        self.pending.remove(key);
        let first_time = self.completed_once.insert(key.to_string());
        debug!(job = %key, first_time, "marked completed");
        Ok(first_time)
    }

    /// Record a failed build: the job leaves pending but returns to dirty,
    /// since its output is still stale. Its dependents therefore stay
    /// blocked behind it.
    pub fn mark_failed(&mut self, key: &str) -> Result<()> {
        self.require_known(key)?;
        self.pending.remove(key);
        self.dirty.insert(key.to_string());
        debug!(job = %key, "marked failed; returned to dirty");
        Ok(())
    }

    /// Next schedulable job, if any. See [`NextJob`] for the three outcomes.
    ///
    /// Candidates are scanned in key order, so the choice is deterministic
    /// for a given state.
    pub fn next_job(&self) -> NextJob {
        self.next_job_where(|_| true)
    }

    /// Like [`Self::next_job`], but skips ready keys the filter rejects.
    ///
    /// Used by the scheduler core to suppress jobs that failed and have not
    /// been re-dirtied since. A filtered-out ready key reports `Blocked`,
    /// never `Drained`: the work still exists.
    pub fn next_job_where<F>(&self, eligible: F) -> NextJob
    where
        F: Fn(&str) -> bool,
    {
        if self.dirty.is_empty() && self.pending.is_empty() {
            return NextJob::Drained;
        }

        for key in self.dirty.iter() {
            if self.pending.contains(key) {
                continue;
            }
            if !eligible(key) {
                continue;
            }

            let details = &self.jobs[key];
            let blocked = details
                .before
                .iter()
                .any(|dep| self.dirty.contains(dep) || self.pending.contains(dep));

            if !blocked {
                return NextJob::Ready(key.clone());
            }
        }

        NextJob::Blocked
    }

    /// `after` edges of a job.
    pub fn dependents_of(&self, key: &str) -> Result<&[JobKey]> {
        self.require_known(key)?;
        Ok(self.jobs[key].after.as_slice())
    }

    pub fn is_drained(&self) -> bool {
        self.dirty.is_empty() && self.pending.is_empty()
    }

    pub fn is_dirty(&self, key: &str) -> bool {
        self.dirty.contains(key)
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.pending.contains(key)
    }

    pub fn has_completed_once(&self, key: &str) -> bool {
        self.completed_once.contains(key)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
