// src/exec/pool.rs

//! Bounded compiler process pool.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::engine::{BuildEvent, JobOutcome};
use crate::errors::Result;
use crate::exec::backend::JobExecutor;
use crate::jobs::ScheduledJob;

/// Runs compiler commands in separate OS processes, at most `max_parallel`
/// at a time. Each job runs in its own Tokio task; the pool only tracks the
/// in-flight count for capacity reporting.
pub struct ProcessPool {
    event_tx: mpsc::Sender<BuildEvent>,
    active: Arc<AtomicUsize>,
    max_parallel: usize,
}

impl ProcessPool {
    pub fn new(event_tx: mpsc::Sender<BuildEvent>, max_parallel: usize) -> Self {
        Self {
            event_tx,
            active: Arc::new(AtomicUsize::new(0)),
            max_parallel: max_parallel.max(1),
        }
    }
}

impl JobExecutor for ProcessPool {
    fn has_capacity(&self) -> bool {
        self.active.load(Ordering::SeqCst) < self.max_parallel
    }

    fn submit(
        &mut self,
        job: ScheduledJob,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let event_tx = self.event_tx.clone();
        let active = Arc::clone(&self.active);

        Box::pin(async move {
            active.fetch_add(1, Ordering::SeqCst);

            tokio::spawn(async move {
                let outcome = run_compiler(&job).await;
                active.fetch_sub(1, Ordering::SeqCst);

                let _ = event_tx
                    .send(BuildEvent::JobFinished {
                        kind: job.kind,
                        plugin: job.plugin,
                        outcome,
                    })
                    .await;
            });

            Ok(())
        })
    }
}

/// Run a single compiler command to completion.
///
/// Spawn errors are folded into a failed outcome with exit code -1 so the
/// scheduler sees a uniform success/failure signal.
async fn run_compiler(job: &ScheduledJob) -> JobOutcome {
    info!(
        kind = %job.kind,
        plugin = %job.plugin,
        cmd = %job.cmd,
        dir = ?job.dir,
        "starting compiler process"
    );

    // Build a shell command appropriate for the platform.
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(&job.cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(&job.cmd);
        c
    };

    cmd.current_dir(&job.dir).kill_on_drop(true);

    match cmd.status().await {
        Ok(status) if status.success() => JobOutcome::Success,
        Ok(status) => {
            let code = status.code().unwrap_or(-1);
            warn!(
                kind = %job.kind,
                plugin = %job.plugin,
                exit_code = code,
                "compiler process failed"
            );
            JobOutcome::Failed(code)
        }
        Err(err) => {
            error!(
                kind = %job.kind,
                plugin = %job.plugin,
                error = %err,
                "failed to spawn compiler process"
            );
            JobOutcome::Failed(-1)
        }
    }
}
