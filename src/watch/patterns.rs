// src/watch/patterns.rs

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::graph::AssetKind;

/// Source-file glob patterns per asset kind, relative to the watched
/// directory.
pub fn source_patterns(kind: AssetKind) -> &'static [&'static str] {
    match kind {
        AssetKind::Typescript => &["**/*.ts", "**/*.tsx"],
        AssetKind::Stylesheet => &["**/*.less", "**/*.scss", "**/*.css"],
    }
}

/// Compile the glob set for one asset kind.
pub fn source_globset(kind: AssetKind) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in source_patterns(kind) {
        let glob = Glob::new(pattern)
            .with_context(|| format!("invalid glob pattern: {pattern}"))?;
        builder.add(glob);
    }
    builder
        .build()
        .with_context(|| format!("building source globset for kind {kind}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typescript_globs_match_nested_sources_only() {
        let set = source_globset(AssetKind::Typescript).unwrap();
        assert!(set.is_match("index.ts"));
        assert!(set.is_match("components/widgets/widget.tsx"));
        assert!(!set.is_match("plugin.js"));
        assert!(!set.is_match("styles/main.less"));
    }

    #[test]
    fn stylesheet_globs_cover_all_dialects() {
        let set = source_globset(AssetKind::Stylesheet).unwrap();
        assert!(set.is_match("plugin.less"));
        assert!(set.is_match("theme/main.scss"));
        assert!(set.is_match("vendor/reset.css"));
        assert!(!set.is_match("plugin.ts"));
    }
}
