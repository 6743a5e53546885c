// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod notify;
pub mod tekton;
pub mod types;
pub mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{load_and_validate, ConfigFile};
use crate::engine::{Dispatcher, PipelineRunSupervisor, RuntimeEvent, Scanner};
use crate::notify::{HookNotifier, LogTransport};
use crate::watch::{ResourceWatcher, SnapshotCluster};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - snapshot cluster / watcher / notifier
/// - supervisor / scanner / dispatcher
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = Arc::new(load_and_validate(&config_path)?);

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    if args.runs.is_empty() {
        bail!("no pipeline run given (expected one or more `namespace/name`)");
    }

    let cluster = SnapshotCluster::new(&args.snapshots, cfg.poll_interval());
    let watcher = ResourceWatcher::new(Arc::new(cluster));
    let notifier = HookNotifier::from_hooks(cfg.hooks(), Arc::new(LogTransport))?;
    let supervisor = PipelineRunSupervisor::new(watcher, Arc::new(notifier));
    let scanner = Scanner::new(supervisor, cfg.retry_policy(), cfg.timeout());

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);
    let dispatcher = Dispatcher::new(scanner, rt_rx);

    // Ctrl-C → graceful shutdown.
    {
        let shutdown = dispatcher.shutdown_token();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            shutdown.cancel();
        });
    }

    let dispatcher = tokio::spawn(dispatcher.run());

    info!(runs = args.runs.len(), snapshots = %args.snapshots, "scanning pipeline runs");
    for reference in args.runs {
        rt_tx.send(RuntimeEvent::pipeline_run(reference)).await?;
    }
    // Closing the only sender lets the dispatcher stop once the scans are done.
    drop(rt_tx);

    let summary = dispatcher.await?;
    if summary.failed > 0 {
        bail!("{} of {} scans failed", summary.failed, summary.failed + summary.succeeded);
    }
    Ok(())
}

/// Simple dry-run output: print the effective configuration.
fn print_dry_run(cfg: &ConfigFile) {
    let retry = cfg.retry_policy();

    println!("ci-status dry-run");
    println!("  timeout = {} min", cfg.timeout_minutes());
    println!("  listen = {}", cfg.listen());
    println!(
        "  retry = {} attempts, {:?} apart",
        retry.attempts(),
        retry.delay()
    );
    println!("  snapshot poll interval = {:?}", cfg.poll_interval());
    println!();

    println!("hooks ({}):", cfg.hooks().len());
    for hook in cfg.hooks() {
        let scope = if hook.scope.is_empty() { "*" } else { &hook.scope };
        println!("  - {} (scope: {})", hook.url, scope);
    }

    debug!("dry-run complete (nothing watched)");
}
