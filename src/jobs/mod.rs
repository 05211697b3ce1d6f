// src/jobs/mod.rs

//! Job tracking and scheduling.
//!
//! - [`details`] defines the static per-job data (`JobDetails`), the
//!   scheduler→executor handoff types, and the build plan.
//! - [`tracker`] contains the per-asset-kind dirty/pending/completed state
//!   machine that decides which job is safe to start next.
//! - [`scheduler`] is the pure multi-tracker core driven by the runtime.

pub mod details;
pub mod scheduler;
pub mod tracker;

pub use details::{BuildPlan, JobDetails, JobKey, JobRequest, ScheduledJob};
pub use scheduler::BuildScheduler;
pub use tracker::{JobTracker, NextJob};
