// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::graph::AssetKind;

/// Default compiler command per asset kind, used when a descriptor does not
/// override `cmd`. Commands run with the asset source directory as cwd.
pub const DEFAULT_TYPESCRIPT_CMD: &str = "npx tsc";
pub const DEFAULT_STYLESHEET_CMD: &str = "npx lessc plugin.less plugin.css";

/// One plugin's `plugin.toml` descriptor.
///
/// ```toml
/// name = "pluginA"
/// dependencies = ["platform"]
///
/// [typescript]
/// src = "assets/ts"
///
/// [stylesheet]
/// src = "assets/css"
/// cmd = "npx sass main.scss main.css"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct PluginDescriptor {
    /// Unique plugin name; the stable job key within every asset-kind graph.
    pub name: String,

    /// Names of plugins this one builds against.
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Present iff the plugin has TypeScript sources.
    #[serde(default)]
    pub typescript: Option<AssetSection>,

    /// Present iff the plugin has stylesheet sources.
    #[serde(default)]
    pub stylesheet: Option<AssetSection>,
}

impl PluginDescriptor {
    pub fn asset_section(&self, kind: AssetKind) -> Option<&AssetSection> {
        match kind {
            AssetKind::Typescript => self.typescript.as_ref(),
            AssetKind::Stylesheet => self.stylesheet.as_ref(),
        }
    }

    /// Whether this plugin has sources of the given kind.
    pub fn participates(&self, kind: AssetKind) -> bool {
        self.asset_section(kind).is_some()
    }
}

/// `[typescript]` / `[stylesheet]` section of a descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetSection {
    /// Source directory, relative to the plugin directory.
    pub src: String,

    /// Compiler command override; if `None`, the per-kind default is used.
    #[serde(default)]
    pub cmd: Option<String>,
}

impl AssetSection {
    pub fn effective_cmd(&self, kind: AssetKind) -> String {
        match &self.cmd {
            Some(cmd) => cmd.clone(),
            None => match kind {
                AssetKind::Typescript => DEFAULT_TYPESCRIPT_CMD.to_string(),
                AssetKind::Stylesheet => DEFAULT_STYLESHEET_CMD.to_string(),
            },
        }
    }
}

/// One discovered plugin: where it lives plus its parsed descriptor.
#[derive(Debug, Clone)]
pub struct Plugin {
    /// Plugin directory (contains `plugin.toml`).
    pub dir: PathBuf,
    pub descriptor: PluginDescriptor,
}

impl Plugin {
    /// Absolute-ish source directory for the given asset kind, if the plugin
    /// participates in it.
    pub fn src_dir(&self, kind: AssetKind) -> Option<PathBuf> {
        self.descriptor
            .asset_section(kind)
            .map(|section| self.dir.join(&section.src))
    }
}

/// Discovery output before semantic validation.
#[derive(Debug, Clone)]
pub struct RawPluginSet {
    pub plugins: Vec<Plugin>,
}

/// Validated plugin collection keyed by plugin name.
///
/// Construction goes through `TryFrom<RawPluginSet>` (see `validate`), so a
/// value of this type is known to have unique names, resolvable dependencies
/// and an acyclic dependency graph.
#[derive(Debug, Clone)]
pub struct PluginSet {
    plugins: BTreeMap<String, Plugin>,
}

impl PluginSet {
    pub(crate) fn new_unchecked(plugins: BTreeMap<String, Plugin>) -> Self {
        Self { plugins }
    }

    pub fn plugins(&self) -> &BTreeMap<String, Plugin> {
        &self.plugins
    }

    pub fn get(&self, name: &str) -> Option<&Plugin> {
        self.plugins.get(name)
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_parses_with_defaults() {
        let descriptor: PluginDescriptor = toml::from_str(
            r#"
            name = "platform"

            [typescript]
            src = "ts"
            "#,
        )
        .unwrap();

        assert_eq!(descriptor.name, "platform");
        assert!(descriptor.dependencies.is_empty());
        assert!(descriptor.participates(AssetKind::Typescript));
        assert!(!descriptor.participates(AssetKind::Stylesheet));

        let section = descriptor.asset_section(AssetKind::Typescript).unwrap();
        assert_eq!(section.effective_cmd(AssetKind::Typescript), DEFAULT_TYPESCRIPT_CMD);
    }

    #[test]
    fn cmd_override_wins_over_the_default() {
        let descriptor: PluginDescriptor = toml::from_str(
            r#"
            name = "pluginA"

            [stylesheet]
            src = "css"
            cmd = "npx sass main.scss main.css"
            "#,
        )
        .unwrap();

        let section = descriptor.asset_section(AssetKind::Stylesheet).unwrap();
        assert_eq!(
            section.effective_cmd(AssetKind::Stylesheet),
            "npx sass main.scss main.css"
        );
    }
}
