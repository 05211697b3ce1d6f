// src/engine/mod.rs

//! Orchestration engine.
//!
//! The pure scheduling core lives in [`crate::jobs::scheduler`]; this module
//! holds the event types flowing into the runtime and the async shell
//! ([`runtime`]) that reacts to:
//! - executor completion events
//! - file-watch change events
//! - shutdown signals

use crate::graph::AssetKind;

/// Canonical plugin name type used throughout the engine.
pub type PluginName = String;

/// Outcome of one compiler process for the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    Success,
    Failed(i32),
}

/// Runtime options.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeOptions {
    /// If true, keep running and rebuild on file changes; otherwise exit
    /// once every tracker is drained (or on the first failure).
    pub watch: bool,
}

/// Events flowing into the runtime from the executor and watchers.
#[derive(Debug, Clone)]
pub enum BuildEvent {
    /// A compiler process exited with a concrete outcome.
    JobFinished {
        kind: AssetKind,
        plugin: PluginName,
        outcome: JobOutcome,
    },
    /// A plugin's sources of the given kind changed (post-debounce).
    SourceChanged {
        kind: AssetKind,
        plugin: PluginName,
    },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod runtime;

pub use runtime::Runtime;
