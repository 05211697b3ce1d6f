// src/watch/watcher.rs

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use notify::{EventKind, RecommendedWatcher, RecursiveMode};
use notify_debouncer_full::{new_debouncer, DebounceEventResult, Debouncer, RecommendedCache};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::engine::{BuildEvent, PluginName};
use crate::graph::AssetKind;
use crate::watch::patterns::source_globset;

/// Debounce window for coalescing bursts of filesystem events (editor
/// saves, VCS checkouts) into a single rebuild trigger.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

/// Handle for one plugin's filesystem watcher.
///
/// This exists mainly so the underlying debounced watcher is kept alive for
/// as long as needed. Dropping this handle stops file watching for that
/// plugin.
pub struct WatcherHandle {
    _inner: Debouncer<RecommendedWatcher, RecommendedCache>,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Spawn a debounced filesystem watcher over one plugin's source directory
/// for one asset kind.
///
/// Each debounced batch containing at least one relevant add/change/remove
/// produces exactly one `BuildEvent::SourceChanged`; irrelevant paths (e.g.
/// compiler output next to the sources) are ignored.
pub fn spawn_plugin_watcher(
    kind: AssetKind,
    plugin: PluginName,
    dir: impl Into<PathBuf>,
    event_tx: mpsc::Sender<BuildEvent>,
) -> Result<WatcherHandle> {
    let dir = dir.into();
    // Canonicalize once so event paths can be relativized reliably.
    let dir = dir.canonicalize().unwrap_or(dir);

    let patterns = source_globset(kind)?;

    // Channel from the blocking notify callback into the async world.
    let (batch_tx, mut batch_rx) = mpsc::unbounded_channel::<DebounceEventResult>();

    let mut debouncer = new_debouncer(DEBOUNCE_WINDOW, None, move |result: DebounceEventResult| {
        if let Err(err) = batch_tx.send(result) {
            // We can't log via tracing here easily, so fall back to stderr.
            eprintln!("plugbuild: failed to forward watch events: {err}");
        }
    })?;

    debouncer.watch(&dir, RecursiveMode::Recursive)?;

    info!(kind = %kind, plugin = %plugin, "file watcher started on {:?}", dir);

    // Async task that consumes debounced batches and forwards at most one
    // trigger per batch to the runtime.
    let watch_root = dir.clone();
    tokio::spawn(async move {
        while let Some(result) = batch_rx.recv().await {
            let events = match result {
                Ok(events) => events,
                Err(errors) => {
                    for err in errors {
                        tracing::warn!(
                            kind = %kind,
                            plugin = %plugin,
                            error = %err,
                            "file watch error"
                        );
                    }
                    continue;
                }
            };

            let relevant = events
                .iter()
                .filter(|de| {
                    matches!(
                        de.event.kind,
                        EventKind::Create(..) | EventKind::Modify(..) | EventKind::Remove(..)
                    )
                })
                .flat_map(|de| de.event.paths.iter())
                .any(|path| {
                    path.strip_prefix(&watch_root)
                        .map(|rel| {
                            let rel_str = rel.to_string_lossy().replace('\\', "/");
                            patterns.is_match(&rel_str)
                        })
                        .unwrap_or(false)
                });

            if !relevant {
                continue;
            }

            debug!(kind = %kind, plugin = %plugin, "relevant source change detected");

            if event_tx
                .send(BuildEvent::SourceChanged {
                    kind,
                    plugin: plugin.clone(),
                })
                .await
                .is_err()
            {
                // Runtime is gone; no point keeping this loop alive.
                break;
            }
        }

        debug!(kind = %kind, plugin = %plugin, "watcher event loop finished");
    });

    Ok(WatcherHandle { _inner: debouncer })
}
