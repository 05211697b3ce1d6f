// tests/error_handling.rs

//! Discovery and validation against real descriptor files on disk.

use std::fs;
use std::path::Path;

use tempfile::tempdir;

use plugbuild::config::{load_and_validate, load_descriptor};
use plugbuild::errors::PlugbuildError;
use plugbuild::graph::{AssetKind, PluginGraph};
use plugbuild::jobs::{BuildPlan, BuildScheduler, NextJob};

fn write_plugin(root: &Path, dir: &str, descriptor: &str) {
    let plugin_dir = root.join(dir);
    fs::create_dir_all(&plugin_dir).unwrap();
    fs::write(plugin_dir.join("plugin.toml"), descriptor).unwrap();
}

#[test]
fn discovers_and_validates_a_small_repository() {
    let root = tempdir().unwrap();
    write_plugin(
        root.path(),
        "platform",
        r#"
name = "platform"

[typescript]
src = "ts"
"#,
    );
    write_plugin(
        root.path(),
        "pluginA",
        r#"
name = "pluginA"
dependencies = ["platform"]

[typescript]
src = "ts"

[stylesheet]
src = "css"
cmd = "npx sass main.scss main.css"
"#,
    );

    let plugins = load_and_validate(root.path()).unwrap();
    assert_eq!(plugins.len(), 2);

    let graph = PluginGraph::from_plugins(&plugins);
    let mut core = BuildScheduler::from_graph(&graph).unwrap();

    // Only the typescript graph carries the platform edge; the stylesheet
    // graph is just pluginA since the platform has no stylesheet sources.
    let ts = core.tracker(AssetKind::Typescript).unwrap();
    assert_eq!(ts.next_job(), NextJob::Ready("platform".to_string()));
    let css = core.tracker(AssetKind::Stylesheet).unwrap();
    assert_eq!(css.next_job(), NextJob::Ready("pluginA".to_string()));

    // Both first submissions are eligible straight away.
    let first = core.next_submission().unwrap().unwrap();
    assert_eq!(first.plugin, "platform");

    let plan = BuildPlan::from_plugins(&plugins);
    let job = plan.job_for(&first).unwrap();
    assert!(job.dir.ends_with("platform/ts"));
    assert_eq!(job.cmd, "npx tsc");

    let css_dir = plan.watch_dir(AssetKind::Stylesheet, "pluginA").unwrap();
    assert!(css_dir.ends_with("pluginA/css"));
}

#[test]
fn dependency_cycle_is_rejected() {
    let root = tempdir().unwrap();
    write_plugin(
        root.path(),
        "a",
        "name = \"a\"\ndependencies = [\"b\"]\n\n[typescript]\nsrc = \"ts\"\n",
    );
    write_plugin(
        root.path(),
        "b",
        "name = \"b\"\ndependencies = [\"a\"]\n\n[typescript]\nsrc = \"ts\"\n",
    );

    assert!(matches!(
        load_and_validate(root.path()),
        Err(PlugbuildError::DependencyCycle(_))
    ));
}

#[test]
fn unknown_dependency_is_rejected() {
    let root = tempdir().unwrap();
    write_plugin(
        root.path(),
        "a",
        "name = \"a\"\ndependencies = [\"ghost\"]\n\n[typescript]\nsrc = \"ts\"\n",
    );

    assert!(matches!(
        load_and_validate(root.path()),
        Err(PlugbuildError::ConfigError(_))
    ));
}

#[test]
fn self_dependency_is_rejected() {
    let root = tempdir().unwrap();
    write_plugin(
        root.path(),
        "a",
        "name = \"a\"\ndependencies = [\"a\"]\n\n[typescript]\nsrc = \"ts\"\n",
    );

    assert!(matches!(
        load_and_validate(root.path()),
        Err(PlugbuildError::ConfigError(_))
    ));
}

#[test]
fn duplicate_plugin_names_are_rejected() {
    let root = tempdir().unwrap();
    write_plugin(root.path(), "one", "name = \"dup\"\n\n[typescript]\nsrc = \"ts\"\n");
    write_plugin(root.path(), "two", "name = \"dup\"\n\n[typescript]\nsrc = \"ts\"\n");

    assert!(matches!(
        load_and_validate(root.path()),
        Err(PlugbuildError::ConfigError(_))
    ));
}

#[test]
fn empty_repository_is_rejected() {
    let root = tempdir().unwrap();

    assert!(matches!(
        load_and_validate(root.path()),
        Err(PlugbuildError::ConfigError(_))
    ));
}

#[test]
fn malformed_descriptor_is_a_toml_error() {
    let root = tempdir().unwrap();
    write_plugin(root.path(), "a", "name = \n");

    assert!(matches!(
        load_descriptor(root.path().join("a").join("plugin.toml")),
        Err(PlugbuildError::TomlError(_))
    ));
}

#[test]
fn directories_without_a_descriptor_are_skipped() {
    let root = tempdir().unwrap();
    write_plugin(root.path(), "real", "name = \"real\"\n\n[typescript]\nsrc = \"ts\"\n");
    fs::create_dir_all(root.path().join("node_modules")).unwrap();
    fs::write(root.path().join("README.md"), "not a plugin").unwrap();

    let plugins = load_and_validate(root.path()).unwrap();
    assert_eq!(plugins.len(), 1);
    assert!(plugins.get("real").is_some());
}
