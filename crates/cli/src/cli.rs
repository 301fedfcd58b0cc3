//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// loggen - synthetic log traffic generator
#[derive(Parser, Debug)]
#[command(
    name = "loggen",
    author,
    version,
    about = "Synthetic log traffic generator",
    long_about = "Generates realistic, randomized log traffic from templated line \n\
                  definitions.\n\n\
                  Loads line templates from data and replay files, schedules them on \n\
                  jittered intervals, resolves their randomization tokens on every \n\
                  firing, and delivers the results over HTTP, syslog sockets, or to \n\
                  a local file."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "LOGGEN_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "LOGGEN_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the generator
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, default_value = "config.toml", env = "LOGGEN_CONFIG")]
    pub config: PathBuf,

    /// Number of delivery workers
    #[arg(long, default_value = "10", env = "LOGGEN_WORKERS")]
    pub workers: usize,

    /// Delivery queue capacity
    #[arg(long, default_value = "100", env = "LOGGEN_QUEUE_CAPACITY")]
    pub queue_capacity: usize,

    /// How long to run, in seconds (0 = until interrupted)
    #[arg(long, default_value = "0", env = "LOGGEN_DURATION")]
    pub duration: u64,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "LOGGEN_METRICS_PORT")]
    pub metrics_port: u16,

    /// Load and validate everything, then exit without generating
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// List every loaded line template
    #[arg(long)]
    pub lines: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
