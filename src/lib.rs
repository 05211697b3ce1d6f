// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod graph;
pub mod jobs;
pub mod logging;
pub mod watch;

use std::path::PathBuf;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::PluginSet;
use crate::engine::{BuildEvent, Runtime, RuntimeOptions};
use crate::exec::ProcessPool;
use crate::graph::{AssetKind, PluginGraph};
use crate::jobs::{BuildPlan, BuildScheduler};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - plugin discovery and validation
/// - dependency graph / job trackers / scheduler core
/// - the bounded compiler process pool
/// - Ctrl-C handling
/// - the runtime event loop (and, in watch mode, source watchers)
pub async fn run(args: CliArgs) -> Result<()> {
    let root = PathBuf::from(&args.root);
    let plugins = load_and_validate(&root)?;

    if args.dry_run {
        print_dry_run(&plugins);
        return Ok(());
    }

    let graph = PluginGraph::from_plugins(&plugins);
    let scheduler = BuildScheduler::from_graph(&graph)?;
    let plan = BuildPlan::from_plugins(&plugins);

    info!(
        plugins = plugins.len(),
        parallel = args.parallel,
        watch = args.watch,
        "starting build"
    );

    // Runtime event channel.
    let (event_tx, event_rx) = mpsc::channel::<BuildEvent>(64);

    // Bounded compiler process pool.
    let executor = ProcessPool::new(event_tx.clone(), args.parallel);

    // Ctrl-C → graceful shutdown.
    {
        let tx = event_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(BuildEvent::ShutdownRequested).await;
        });
    }

    let options = RuntimeOptions { watch: args.watch };

    let runtime = Runtime::new(scheduler, plan, options, event_rx, event_tx, executor);
    runtime.run().await?;
    Ok(())
}

/// Simple dry-run output: print plugins, dependencies and asset kinds.
fn print_dry_run(plugins: &PluginSet) {
    println!("plugbuild dry-run");
    println!();
    println!("plugins ({}):", plugins.len());

    for (name, plugin) in plugins.plugins().iter() {
        println!("  - {name}");
        if !plugin.descriptor.dependencies.is_empty() {
            println!("      dependencies: {:?}", plugin.descriptor.dependencies);
        }
        for kind in AssetKind::ALL {
            if let Some(section) = plugin.descriptor.asset_section(kind) {
                println!(
                    "      {kind}: src = {:?}, cmd = {}",
                    section.src,
                    section.effective_cmd(kind)
                );
            }
        }
    }

    debug!("dry-run complete (no execution)");
}
