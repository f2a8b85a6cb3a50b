//! # Main — CLI Entry Point
//!
//! Parses the command line, initialises logging and hands off to `cli`.
//!
//! ## Subcommands
//!
//! - `search`: build the prime table and walk the Perrin sequence up to its
//!   limit, printing every pseudoprime (and any anomaly) to stdout.
//! - `check`: classify a single index with the independent matrix method.
//!
//! ## Global Options
//!
//! - `--config` / `PERRIN_CONFIG`: TOML file with `[search]` and `[output]`.
//! - `--threads`: rayon pool size for the parallel sieve build (0 = all cores).
//!
//! Logs go to stderr; `LOG_FORMAT=json` switches them to JSON and `RUST_LOG`
//! sets the filter (default `info`).

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use perrin_hunter::config::OutputFormat;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "perrin", about = "Hunt for Perrin pseudoprimes")]
struct Cli {
    /// TOML config file with [search] and [output] sections
    #[arg(long, env = "PERRIN_CONFIG")]
    config: Option<PathBuf>,

    /// Number of rayon worker threads for the sieve build (defaults to all logical cores)
    #[arg(long)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk the Perrin sequence up to the table limit and report pseudoprimes
    Search {
        /// Upper bound of the prime table; last index tested (default 28000000)
        #[arg(long, env = "PERRIN_LIMIT")]
        limit: Option<u64>,
        /// Maximum 32-bit limbs per accumulator (default 360000)
        #[arg(long, env = "PERRIN_CAPACITY")]
        capacity: Option<usize>,
        /// Initial terms P(0),P(1),P(2) (default 3,0,2)
        #[arg(long, value_delimiter = ',')]
        seeds: Option<Vec<u32>>,
        /// Build the prime table with the single-threaded sieve
        #[arg(long)]
        sequential_sieve: bool,
        /// Do not re-check findings independently
        #[arg(long)]
        skip_verify: bool,
        /// Output format for findings on stdout
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
        /// Seconds between progress log lines (0 disables, default 30)
        #[arg(long)]
        progress_secs: Option<u64>,
    },
    /// Classify a single index n without walking the sequence
    Check {
        /// Index to check
        #[arg(long)]
        n: u64,
        /// Initial terms P(0),P(1),P(2) (default 3,0,2)
        #[arg(long, value_delimiter = ',')]
        seeds: Option<Vec<u32>>,
    },
}

fn main() -> Result<ExitCode> {
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();
    cli::configure_rayon(cli.threads);

    match &cli.command {
        Commands::Search { .. } => cli::run_search(&cli),
        Commands::Check { n, seeds } => cli::run_check(&cli, *n, seeds.as_deref()),
    }
}
