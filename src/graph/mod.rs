// src/graph/mod.rs

//! Dependency graph model.
//!
//! [`PluginGraph`] holds, per plugin, its declared dependencies, the derived
//! dependents, and which asset kinds the plugin participates in. It is built
//! once from validated descriptors and never mutated afterwards; all dynamic
//! state lives in the per-kind job trackers.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::config::PluginSet;

/// A category of buildable output, tracked by its own independent job tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AssetKind {
    Typescript,
    Stylesheet,
}

impl AssetKind {
    pub const ALL: [AssetKind; 2] = [AssetKind::Typescript, AssetKind::Stylesheet];
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Typescript => write!(f, "typescript"),
            AssetKind::Stylesheet => write!(f, "stylesheet"),
        }
    }
}

/// Internal node structure: immediate deps, derived dependents, kind flags.
#[derive(Debug, Clone)]
struct PluginNode {
    dependencies: Vec<String>,
    dependents: Vec<String>,
    kinds: BTreeSet<AssetKind>,
}

/// In-memory dependency graph keyed by plugin name.
///
/// Acyclicity is already enforced in `config::validate`, so this type just
/// keeps adjacency information for scheduling and diagnostics.
#[derive(Debug, Clone)]
pub struct PluginGraph {
    nodes: BTreeMap<String, PluginNode>,
}

impl PluginGraph {
    /// Build the graph from a validated [`PluginSet`].
    pub fn from_plugins(plugins: &PluginSet) -> Self {
        let mut nodes: BTreeMap<String, PluginNode> = BTreeMap::new();

        // First pass: create nodes with their dependency lists and kinds.
        for (name, plugin) in plugins.plugins().iter() {
            let kinds = AssetKind::ALL
                .into_iter()
                .filter(|kind| plugin.descriptor.participates(*kind))
                .collect();

            nodes.insert(
                name.clone(),
                PluginNode {
                    dependencies: plugin.descriptor.dependencies.clone(),
                    dependents: Vec::new(),
                    kinds,
                },
            );
        }

        // Second pass: populate dependents from the dependency lists.
        let names: Vec<String> = nodes.keys().cloned().collect();
        for name in names {
            let deps = nodes
                .get(&name)
                .map(|n| n.dependencies.clone())
                .unwrap_or_default();

            for dep in deps {
                if let Some(dep_node) = nodes.get_mut(&dep) {
                    dep_node.dependents.push(name.clone());
                }
            }
        }

        Self { nodes }
    }

    /// All plugin names, in stable (sorted) order.
    pub fn plugins(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(|s| s.as_str())
    }

    /// Immediate dependencies of a plugin.
    pub fn dependencies_of(&self, name: &str) -> &[String] {
        self.nodes
            .get(name)
            .map(|n| n.dependencies.as_slice())
            .unwrap_or(&[])
    }

    /// Immediate dependents of a plugin.
    pub fn dependents_of(&self, name: &str) -> &[String] {
        self.nodes
            .get(name)
            .map(|n| n.dependents.as_slice())
            .unwrap_or(&[])
    }

    /// Whether the plugin has sources of the given asset kind.
    pub fn participates(&self, name: &str, kind: AssetKind) -> bool {
        self.nodes
            .get(name)
            .is_some_and(|n| n.kinds.contains(&kind))
    }

    /// Asset kinds that at least one plugin participates in.
    pub fn active_kinds(&self) -> BTreeSet<AssetKind> {
        self.nodes
            .values()
            .flat_map(|n| n.kinds.iter().copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::config::{Plugin, PluginDescriptor};

    fn plugin_set(descriptors: Vec<PluginDescriptor>) -> PluginSet {
        let plugins = descriptors
            .into_iter()
            .map(|descriptor| {
                (
                    descriptor.name.clone(),
                    Plugin {
                        dir: PathBuf::from(&descriptor.name),
                        descriptor,
                    },
                )
            })
            .collect();
        PluginSet::new_unchecked(plugins)
    }

    fn descriptor(toml: &str) -> PluginDescriptor {
        toml::from_str(toml).unwrap()
    }

    #[test]
    fn dependents_are_derived_from_dependencies() {
        let plugins = plugin_set(vec![
            descriptor("name = \"platform\"\n[typescript]\nsrc = \"ts\"\n"),
            descriptor(
                "name = \"pluginA\"\ndependencies = [\"platform\"]\n[typescript]\nsrc = \"ts\"\n",
            ),
            descriptor(
                "name = \"pluginB\"\ndependencies = [\"platform\"]\n[stylesheet]\nsrc = \"css\"\n",
            ),
        ]);
        let graph = PluginGraph::from_plugins(&plugins);

        assert_eq!(graph.dependents_of("platform"), ["pluginA", "pluginB"]);
        assert_eq!(graph.dependencies_of("pluginA"), ["platform"]);
        assert!(graph.dependents_of("pluginA").is_empty());
    }

    #[test]
    fn participation_follows_descriptor_sections() {
        let plugins = plugin_set(vec![
            descriptor("name = \"platform\"\n[typescript]\nsrc = \"ts\"\n"),
            descriptor("name = \"pluginB\"\n[stylesheet]\nsrc = \"css\"\n"),
        ]);
        let graph = PluginGraph::from_plugins(&plugins);

        assert!(graph.participates("platform", AssetKind::Typescript));
        assert!(!graph.participates("platform", AssetKind::Stylesheet));
        assert!(graph.participates("pluginB", AssetKind::Stylesheet));
        assert!(!graph.participates("missing", AssetKind::Typescript));

        let kinds = graph.active_kinds();
        assert!(kinds.contains(&AssetKind::Typescript));
        assert!(kinds.contains(&AssetKind::Stylesheet));
    }
}
