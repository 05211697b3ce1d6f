use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use plugbuild::engine::{BuildEvent, JobOutcome};
use plugbuild::errors::Result;
use plugbuild::exec::JobExecutor;
use plugbuild::jobs::ScheduledJob;

/// A fake executor that:
/// - records which jobs were "run" (in submission order)
/// - immediately reports `JobFinished` for each submitted job, with a
///   failure outcome for plugins registered via [`FakeExecutor::failing`].
pub struct FakeExecutor {
    event_tx: mpsc::Sender<BuildEvent>,
    executed: Arc<Mutex<Vec<String>>>,
    failing: HashSet<String>,
}

impl FakeExecutor {
    pub fn new(event_tx: mpsc::Sender<BuildEvent>, executed: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            event_tx,
            executed,
            failing: HashSet::new(),
        }
    }

    /// Make the given plugin's jobs report failure (exit code 1).
    pub fn failing(mut self, plugin: &str) -> Self {
        self.failing.insert(plugin.to_string());
        self
    }
}

impl JobExecutor for FakeExecutor {
    fn has_capacity(&self) -> bool {
        true
    }

    fn submit(
        &mut self,
        job: ScheduledJob,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.event_tx.clone();
        let executed = Arc::clone(&self.executed);
        let fails = self.failing.contains(&job.plugin);

        Box::pin(async move {
            {
                let mut guard = executed.lock().unwrap();
                guard.push(job.plugin.clone());
            }

            let outcome = if fails {
                JobOutcome::Failed(1)
            } else {
                JobOutcome::Success
            };

            tx.send(BuildEvent::JobFinished {
                kind: job.kind,
                plugin: job.plugin,
                outcome,
            })
            .await
            .map_err(anyhow::Error::from)?;

            Ok(())
        })
    }
}
