//! Certfetch main entry point
//!
//! This is the command-line interface for the certificate batch retriever.

use anyhow::Context;
use certfetch::config::{load_config_with_hash, Config};
use certfetch::output::{format_outcome, format_records, print_statistics};
use certfetch::{BatchOrchestrator, CancelSignal, ExecutionMode};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Certfetch: retrieve public high-school certificate records
///
/// Looks up certificate pages by identifier and summarizes whole batches of
/// sequential identifiers. Batch N covers identifiers N*size to N*size+size-1.
#[derive(Parser, Debug)]
#[command(name = "certfetch")]
#[command(version)]
#[command(about = "Batch retriever for public certificate records", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Batch number to retrieve
    #[arg(short, long, conflicts_with = "id")]
    batch: Option<u64>,

    /// Look up a single identifier
    #[arg(long, conflicts_with_all = ["batch", "dry_run"])]
    id: Option<u64>,

    /// Resolve identifiers one at a time instead of on the worker pool
    #[arg(long, requires = "batch")]
    sequential: bool,

    /// Override the number of concurrent workers
    #[arg(short, long, requires = "batch")]
    workers: Option<usize>,

    /// Validate config and show what would be fetched without fetching
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(workers) = cli.workers {
        config.batch.max_workers = workers;
    }

    let orchestrator = BatchOrchestrator::from_config(&config)?;

    if cli.dry_run {
        handle_dry_run(&config, cli.batch.unwrap_or(0), &orchestrator)?;
    } else if let Some(identifier) = cli.id {
        let outcome = orchestrator.resolve(identifier).await;
        print!("{}", format_outcome(&outcome));
    } else if let Some(batch_index) = cli.batch {
        let mode = ExecutionMode::from(!cli.sequential);
        handle_batch(&orchestrator, batch_index, mode).await?;
    } else {
        anyhow::bail!("nothing to do: pass --batch N, --id N or --dry-run");
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("certfetch=warn,error"),
            1 => EnvFilter::new("certfetch=info,warn"),
            2 => EnvFilter::new("certfetch=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Handles the --dry-run mode: shows the configuration and batch range
fn handle_dry_run<T>(
    config: &Config,
    batch_index: u64,
    orchestrator: &BatchOrchestrator<T>,
) -> anyhow::Result<()>
where
    T: certfetch::pipeline::Transport + 'static,
{
    println!("=== Certfetch Dry Run ===\n");

    println!("Portal:");
    println!("  Base URL: {}", config.portal.base_url);
    println!("  Field prefix: {}", config.portal.field_prefix);
    println!("  Request timeout: {}ms", config.portal.request_timeout_ms);
    println!("  User agent: {}", config.portal.user_agent);

    println!("\nRetry:");
    println!("  Max attempts: {}", config.retry.max_attempts);
    println!("  Backoff: {}ms", config.retry.backoff_ms);

    println!("\nBatch:");
    println!("  Batch size: {}", orchestrator.batch_size());
    println!("  Workers: {}", orchestrator.worker_count());

    let range = orchestrator.identifier_range(batch_index)?;
    println!(
        "\n✓ Batch {} would fetch identifiers {} - {}",
        batch_index,
        range.start(),
        range.end()
    );

    Ok(())
}

/// Handles the main batch operation; Ctrl-C cancels the remaining lookups
async fn handle_batch<T>(
    orchestrator: &BatchOrchestrator<T>,
    batch_index: u64,
    mode: ExecutionMode,
) -> anyhow::Result<()>
where
    T: certfetch::pipeline::Transport + 'static,
{
    let cancel = CancelSignal::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling batch");
            trigger.cancel();
        }
    });

    let result = orchestrator
        .run_batch_with_cancel(batch_index, mode, &cancel)
        .await
        .context("batch failed")?;

    print!("{}", format_records(&result));
    println!();
    print_statistics(&result);

    Ok(())
}
