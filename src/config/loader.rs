// src/config/loader.rs

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::model::{Plugin, PluginDescriptor, PluginSet, RawPluginSet};
use crate::errors::Result;

/// File name that marks a directory as a plugin.
pub const DESCRIPTOR_FILE: &str = "plugin.toml";

/// Parse a single descriptor file.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation (dependency resolution, cycles). Use [`load_and_validate`]
/// for that.
pub fn load_descriptor(path: impl AsRef<Path>) -> Result<PluginDescriptor> {
    let contents = fs::read_to_string(path.as_ref())?;
    let descriptor: PluginDescriptor = toml::from_str(&contents)?;
    Ok(descriptor)
}

/// Scan the repository root for plugin directories.
///
/// Every immediate subdirectory containing a `plugin.toml` is treated as a
/// plugin. The result is sorted by plugin name so that downstream iteration
/// order is stable across runs.
pub fn discover_plugins(root: impl AsRef<Path>) -> Result<RawPluginSet> {
    let root = root.as_ref();
    let mut plugins = Vec::new();

    for entry in fs::read_dir(root)? {
        let entry = entry?;
        let dir = entry.path();
        if !dir.is_dir() {
            continue;
        }

        let descriptor_path = dir.join(DESCRIPTOR_FILE);
        if !descriptor_path.is_file() {
            continue;
        }

        let descriptor = load_descriptor(&descriptor_path)?;
        debug!(plugin = %descriptor.name, dir = ?dir, "discovered plugin");
        plugins.push(Plugin { dir, descriptor });
    }

    plugins.sort_by(|a, b| a.descriptor.name.cmp(&b.descriptor.name));

    Ok(RawPluginSet { plugins })
}

/// Discover plugins under `root` and run full validation.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Scans for `plugin.toml` descriptors.
/// - Checks for duplicate names, unknown/self dependencies and cycles.
pub fn load_and_validate(root: impl AsRef<Path>) -> Result<PluginSet> {
    let raw = discover_plugins(root)?;
    let plugins = PluginSet::try_from(raw)?;
    Ok(plugins)
}
