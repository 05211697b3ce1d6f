// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module turns filesystem changes into per-plugin dirty triggers. It
//! knows nothing about the dependency graph: fan-out to dependents happens
//! in the job tracker when the runtime processes the resulting
//! `SourceChanged` event.
//!
//! Watchers are registered per (asset kind, plugin) after the plugin's first
//! successful build, and each one debounces bursts of events (editor saves,
//! VCS checkouts) into a single trigger per window.

pub mod patterns;
pub mod watcher;

pub use patterns::source_globset;
pub use watcher::{spawn_plugin_watcher, WatcherHandle, DEBOUNCE_WINDOW};
