// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::errors::{PlugbuildError, Result};
use crate::exec::JobExecutor;
use crate::graph::AssetKind;
use crate::jobs::{BuildPlan, BuildScheduler};
use crate::watch::{spawn_plugin_watcher, WatcherHandle};

use super::{BuildEvent, JobOutcome, RuntimeOptions};

/// Async IO shell around the pure [`BuildScheduler`] core.
///
/// Consumes [`BuildEvent`]s, applies them to the core, and keeps the
/// executor fed: after every completion and every dirty-marking it re-runs a
/// scheduling pass, submitting ready jobs until capacity runs out. This is
/// how topological order is enforced without a precomputed batch plan —
/// eligibility is recomputed from live state on every pass.
pub struct Runtime<E: JobExecutor> {
    core: BuildScheduler,
    plan: BuildPlan,
    options: RuntimeOptions,
    event_rx: mpsc::Receiver<BuildEvent>,
    /// Cloned into watchers registered at runtime.
    event_tx: mpsc::Sender<BuildEvent>,
    executor: E,
    /// Keeps registered watchers alive; dropping the runtime stops watching.
    watchers: Vec<WatcherHandle>,
}

impl<E: JobExecutor> fmt::Debug for Runtime<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .field("watchers", &self.watchers.len())
            .finish_non_exhaustive()
    }
}

impl<E: JobExecutor> Runtime<E> {
    pub fn new(
        core: BuildScheduler,
        plan: BuildPlan,
        options: RuntimeOptions,
        event_rx: mpsc::Receiver<BuildEvent>,
        event_tx: mpsc::Sender<BuildEvent>,
        executor: E,
    ) -> Self {
        Self {
            core,
            plan,
            options,
            event_rx,
            event_tx,
            executor,
            watchers: Vec::new(),
        }
    }

    /// Main event loop.
    ///
    /// One-shot mode resolves `Ok(())` once every tracker is drained, or the
    /// first job failure as an error (in-flight siblings are not cancelled,
    /// but no new work is submitted). Watch mode only returns on shutdown.
    pub async fn run(mut self) -> Result<()> {
        info!("plugbuild runtime started");

        // Initial scheduling pass: everything starts dirty.
        self.pump().await?;

        if !self.options.watch && self.core.is_drained() {
            info!("no buildable assets found; nothing to do");
            return Ok(());
        }

        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("runtime event channel closed; exiting");
                    break;
                }
            };

            debug!(?event, "runtime received event");

            match event {
                BuildEvent::JobFinished {
                    kind,
                    plugin,
                    outcome: JobOutcome::Success,
                } => {
                    let first_time = self.core.job_succeeded(kind, &plugin)?;
                    info!(kind = %kind, plugin = %plugin, rebuild = !first_time, "job completed");

                    if first_time && self.options.watch {
                        self.register_watcher(kind, &plugin);
                    }

                    self.pump().await?;

                    if !self.options.watch && self.core.is_drained() {
                        info!("all jobs drained; build finished");
                        return Ok(());
                    }
                }
                BuildEvent::JobFinished {
                    kind,
                    plugin,
                    outcome: JobOutcome::Failed(code),
                } => {
                    self.core.job_failed(kind, &plugin)?;

                    if !self.options.watch {
                        return Err(PlugbuildError::JobFailed { kind, plugin, code });
                    }

                    warn!(
                        kind = %kind,
                        plugin = %plugin,
                        exit_code = code,
                        "job failed; dependents stay blocked until a fixing change arrives"
                    );
                    // Unrelated branches may still have eligible work.
                    self.pump().await?;
                }
                BuildEvent::SourceChanged { kind, plugin } => {
                    let newly_dirty = self.core.source_changed(kind, &plugin)?;
                    debug!(
                        kind = %kind,
                        plugin = %plugin,
                        fan_out = newly_dirty.len(),
                        "sources changed; marked dirty"
                    );
                    self.pump().await?;
                }
                BuildEvent::ShutdownRequested => {
                    info!("shutdown requested; stopping runtime");
                    break;
                }
            }
        }

        Ok(())
    }

    /// One scheduling pass: submit ready jobs while the executor has spare
    /// capacity. Submission is fire-and-forget; completions come back as
    /// events.
    async fn pump(&mut self) -> Result<()> {
        while self.executor.has_capacity() {
            match self.core.next_submission()? {
                Some(request) => {
                    let job = self.plan.job_for(&request).cloned().ok_or_else(|| {
                        PlugbuildError::ConfigError(format!(
                            "no build plan entry for {} job of plugin '{}'",
                            request.kind, request.plugin
                        ))
                    })?;
                    self.executor.submit(job).await?;
                }
                None => break,
            }
        }
        Ok(())
    }

    /// Register a debounced source watcher for a plugin's asset kind.
    ///
    /// Called at most once per (kind, plugin): only on the first successful
    /// completion. A watcher that fails to start is logged and skipped —
    /// that plugin simply won't auto-rebuild.
    fn register_watcher(&mut self, kind: AssetKind, plugin: &str) {
        let Some(dir) = self.plan.watch_dir(kind, plugin) else {
            warn!(kind = %kind, plugin = %plugin, "no watchable directory in build plan");
            return;
        };

        match spawn_plugin_watcher(kind, plugin.to_string(), dir.clone(), self.event_tx.clone())
        {
            Ok(handle) => {
                info!(kind = %kind, plugin = %plugin, dir = ?dir, "watching sources");
                self.watchers.push(handle);
            }
            Err(err) => {
                warn!(
                    kind = %kind,
                    plugin = %plugin,
                    error = %err,
                    "failed to start watcher; plugin will not auto-rebuild"
                );
            }
        }
    }
}
