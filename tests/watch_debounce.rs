// tests/watch_debounce.rs

//! Filesystem watcher tests against a real temporary directory: a burst of
//! writes must coalesce into a single trigger, and irrelevant files must not
//! trigger at all.

use std::fs;
use std::time::Duration;

use tempfile::tempdir;
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};

use plugbuild::engine::BuildEvent;
use plugbuild::graph::AssetKind;
use plugbuild::watch::{spawn_plugin_watcher, DEBOUNCE_WINDOW};
use plugbuild_test_utils::init_tracing;

/// Generous ceiling for one debounced batch to arrive.
const EVENT_DEADLINE: Duration = Duration::from_secs(10);

/// Window in which a spurious second trigger would show up.
fn quiet_period() -> Duration {
    DEBOUNCE_WINDOW * 3
}

#[tokio::test]
async fn burst_of_source_writes_coalesces_into_one_trigger() {
    init_tracing();

    let dir = tempdir().unwrap();
    let (tx, mut rx) = mpsc::channel::<BuildEvent>(16);

    let _handle = spawn_plugin_watcher(
        AssetKind::Typescript,
        "pluginA".to_string(),
        dir.path().to_path_buf(),
        tx,
    )
    .unwrap();

    // Give the backend a moment to establish the watch.
    sleep(Duration::from_millis(300)).await;

    fs::write(dir.path().join("index.ts"), "export {};").unwrap();
    fs::write(dir.path().join("util.ts"), "export {};").unwrap();
    fs::write(dir.path().join("view.tsx"), "export {};").unwrap();

    let event = timeout(EVENT_DEADLINE, rx.recv())
        .await
        .expect("no trigger arrived for the write burst")
        .expect("watcher channel closed");

    match event {
        BuildEvent::SourceChanged { kind, plugin } => {
            assert_eq!(kind, AssetKind::Typescript);
            assert_eq!(plugin, "pluginA");
        }
        other => panic!("unexpected event: {other:?}"),
    }

    // The whole burst fell inside one debounce window, so there must not be
    // a second trigger.
    assert!(
        timeout(quiet_period(), rx.recv()).await.is_err(),
        "burst produced more than one trigger"
    );
}

#[tokio::test]
async fn irrelevant_files_do_not_trigger() {
    init_tracing();

    let dir = tempdir().unwrap();
    let (tx, mut rx) = mpsc::channel::<BuildEvent>(16);

    let _handle = spawn_plugin_watcher(
        AssetKind::Stylesheet,
        "pluginA".to_string(),
        dir.path().to_path_buf(),
        tx,
    )
    .unwrap();

    sleep(Duration::from_millis(300)).await;

    // Compiler output and unrelated files next to the sources.
    fs::write(dir.path().join("plugin.js"), "// generated").unwrap();
    fs::write(dir.path().join("notes.txt"), "scratch").unwrap();

    assert!(
        timeout(quiet_period(), rx.recv()).await.is_err(),
        "irrelevant files produced a trigger"
    );

    // A real stylesheet change still comes through afterwards.
    fs::write(dir.path().join("plugin.less"), "body { }").unwrap();

    let event = timeout(EVENT_DEADLINE, rx.recv())
        .await
        .expect("no trigger arrived for the stylesheet change")
        .expect("watcher channel closed");
    assert!(matches!(
        event,
        BuildEvent::SourceChanged {
            kind: AssetKind::Stylesheet,
            ..
        }
    ));
}

#[tokio::test]
async fn nested_source_directories_are_watched_recursively() {
    init_tracing();

    let dir = tempdir().unwrap();
    let nested = dir.path().join("components").join("widgets");
    fs::create_dir_all(&nested).unwrap();

    let (tx, mut rx) = mpsc::channel::<BuildEvent>(16);
    let _handle = spawn_plugin_watcher(
        AssetKind::Typescript,
        "pluginA".to_string(),
        dir.path().to_path_buf(),
        tx,
    )
    .unwrap();

    sleep(Duration::from_millis(300)).await;

    fs::write(nested.join("widget.ts"), "export {};").unwrap();

    let event = timeout(EVENT_DEADLINE, rx.recv())
        .await
        .expect("no trigger arrived for the nested write")
        .expect("watcher channel closed");
    assert!(matches!(event, BuildEvent::SourceChanged { .. }));
}
