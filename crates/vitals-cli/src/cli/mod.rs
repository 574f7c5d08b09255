//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

/// Run the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);
    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = Config::load()?;

    // Determine output format
    let output_format = cli
        .output
        .or(config.output_format)
        .unwrap_or_default();

    let workers = match &cli.command {
        Commands::Watch(args) => args.workers.unwrap_or(config.workers),
        Commands::Counters(_) | Commands::Config(_) => 1,
    };
    if workers == 0 {
        anyhow::bail!("--workers must be at least 1");
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(workers)
        .thread_name("vitals-worker")
        .enable_all()
        .build()?;

    let ctx = commands::Context {
        config,
        output_format,
        verbose: cli.verbose,
        no_color: cli.no_color,
    };

    // Dispatch to appropriate command
    runtime.block_on(async move {
        match cli.command {
            Commands::Watch(args) => commands::watch::execute(ctx, args).await,
            Commands::Counters(args) => commands::counters::execute(ctx, args).await,
            Commands::Config(args) => commands::config::execute(ctx, args).await,
        }
    })
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
