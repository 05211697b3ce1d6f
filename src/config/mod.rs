// src/config/mod.rs

//! Plugin descriptor loading and validation.
//!
//! - [`model`] maps `plugin.toml` descriptors into typed structs.
//! - [`loader`] discovers plugin directories under the repository root.
//! - [`validate`] checks descriptor consistency (duplicate names, unknown
//!   dependencies, cycles) before anything is scheduled.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{discover_plugins, load_and_validate, load_descriptor, DESCRIPTOR_FILE};
pub use model::{AssetSection, Plugin, PluginDescriptor, PluginSet, RawPluginSet};
