// src/config/validate.rs

use std::collections::BTreeMap;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{Plugin, PluginSet, RawPluginSet};
use crate::errors::{PlugbuildError, Result};

impl TryFrom<RawPluginSet> for PluginSet {
    type Error = PlugbuildError;

    fn try_from(raw: RawPluginSet) -> std::result::Result<Self, Self::Error> {
        let plugins = collect_unique(raw)?;
        validate_dependencies(&plugins)?;
        validate_acyclic(&plugins)?;
        Ok(PluginSet::new_unchecked(plugins))
    }
}

fn collect_unique(raw: RawPluginSet) -> Result<BTreeMap<String, Plugin>> {
    if raw.plugins.is_empty() {
        return Err(PlugbuildError::ConfigError(
            "no plugin descriptors (plugin.toml) found under the repository root".to_string(),
        ));
    }

    let mut plugins = BTreeMap::new();
    for plugin in raw.plugins {
        let name = plugin.descriptor.name.clone();
        if name.is_empty() {
            return Err(PlugbuildError::ConfigError(format!(
                "plugin descriptor in {:?} has an empty name",
                plugin.dir
            )));
        }
        if let Some(existing) = plugins.insert(name.clone(), plugin) {
            return Err(PlugbuildError::ConfigError(format!(
                "duplicate plugin name '{}' (first seen in {:?})",
                name, existing.dir
            )));
        }
    }
    Ok(plugins)
}

fn validate_dependencies(plugins: &BTreeMap<String, Plugin>) -> Result<()> {
    for (name, plugin) in plugins.iter() {
        for dep in plugin.descriptor.dependencies.iter() {
            if !plugins.contains_key(dep) {
                return Err(PlugbuildError::ConfigError(format!(
                    "plugin '{}' has unknown dependency '{}'",
                    name, dep
                )));
            }
            if dep == name {
                return Err(PlugbuildError::ConfigError(format!(
                    "plugin '{}' cannot depend on itself",
                    name
                )));
            }
        }
    }
    Ok(())
}

fn validate_acyclic(plugins: &BTreeMap<String, Plugin>) -> Result<()> {
    // Edge direction: dependency -> dependent, so a topological sort yields a
    // valid build order. The sort fails exactly when there is a cycle.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in plugins.keys() {
        graph.add_node(name.as_str());
    }

    for (name, plugin) in plugins.iter() {
        for dep in plugin.descriptor.dependencies.iter() {
            graph.add_edge(dep.as_str(), name.as_str(), ());
        }
    }

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => {
            let node = cycle.node_id();
            Err(PlugbuildError::DependencyCycle(format!(
                "cycle detected in plugin dependencies involving '{}'",
                node
            )))
        }
    }
}
