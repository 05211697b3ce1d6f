// src/exec/backend.rs

//! Pluggable executor abstraction.
//!
//! The runtime never spawns processes itself; it asks a `JobExecutor` for
//! capacity and hands over [`ScheduledJob`]s. Production code uses
//! [`super::pool::ProcessPool`]; tests provide their own implementation that
//! records submissions and synthesises `BuildEvent::JobFinished` events.

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;
use crate::jobs::ScheduledJob;

/// Trait abstracting how scheduled jobs are executed.
pub trait JobExecutor: Send {
    /// Whether the executor can accept another job right now.
    ///
    /// The scheduler stops submitting when this reports `false` and retries
    /// after the next completion event.
    fn has_capacity(&self) -> bool;

    /// Dispatch one job for execution, fire-and-forget.
    ///
    /// The future resolves once the job has been *accepted*, not once it has
    /// run; the eventual outcome arrives asynchronously as a
    /// `BuildEvent::JobFinished` on the runtime channel.
    fn submit(
        &mut self,
        job: ScheduledJob,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}
