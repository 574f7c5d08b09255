//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use vitals::SamplerKind;

use crate::config::SourceKind;
use crate::output::OutputFormat;

/// Live CPU, GC and heap utilization of a JVM or local process
///
/// Counters are polled at a fixed rate and turned into per-interval
/// utilization normalized across all processors.
#[derive(Parser, Debug)]
#[command(name = "vitals")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sample utilization periodically until interrupted
    Watch(WatchArgs),

    /// Print every raw counter once
    Counters(CountersArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),
}

// ============================================================================
// Metrics source selection
// ============================================================================

#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Where to read counters from
    #[arg(short, long, value_enum)]
    pub source: Option<SourceKind>,

    /// Jolokia agent URL
    #[arg(long, env = "VITALS_JOLOKIA_URL")]
    pub url: Option<String>,

    /// Jolokia basic auth user
    #[arg(long, env = "VITALS_USERNAME")]
    pub username: Option<String>,

    /// Jolokia basic auth password
    #[arg(long, env = "VITALS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Pid to watch with the local source (defaults to vitals itself)
    #[arg(long)]
    pub pid: Option<i32>,
}

// ============================================================================
// Watch command
// ============================================================================

#[derive(Args, Debug)]
pub struct WatchArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Milliseconds between ticks
    #[arg(long)]
    pub period_ms: Option<u64>,

    /// Milliseconds before the first tick
    #[arg(long)]
    pub initial_delay_ms: Option<u64>,

    /// Worker threads shared by the samplers
    #[arg(long)]
    pub workers: Option<usize>,

    /// Stop after this many seconds instead of waiting for Ctrl-C
    #[arg(long)]
    pub duration_secs: Option<u64>,

    /// Samplers to run (e.g., cpu,gc,memory,system)
    #[arg(long, value_delimiter = ',')]
    pub samplers: Vec<SamplerKind>,

    /// Also sample machine-wide CPU usage (local source only)
    #[arg(long)]
    pub system: bool,

    /// Threads generating synthetic allocation load
    #[arg(long, default_value = "0")]
    pub load_threads: usize,
}

// ============================================================================
// Counters command
// ============================================================================

#[derive(Args, Debug)]
pub struct CountersArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

// ============================================================================
// Config command
// ============================================================================

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Key to set (e.g., jolokia_url, period_ms)
        key: String,

        /// Value to set
        value: String,
    },

    /// Show config file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_watch_flags() {
        let cli = Cli::parse_from([
            "vitals",
            "--output",
            "json",
            "watch",
            "--source",
            "jolokia",
            "--url",
            "http://app:8778/jolokia",
            "--samplers",
            "cpu,gc",
            "--period-ms",
            "500",
        ]);
        assert_eq!(cli.output, Some(OutputFormat::Json));
        let Commands::Watch(args) = cli.command else {
            panic!("expected watch");
        };
        assert_eq!(args.source.source, Some(SourceKind::Jolokia));
        assert_eq!(args.samplers, vec![SamplerKind::Cpu, SamplerKind::Gc]);
        assert_eq!(args.period_ms, Some(500));
        assert_eq!(args.load_threads, 0);
    }
}
