//! # CLI Execution Functions
//!
//! Extracted from `main.rs` to keep the entry point slim: configuration
//! resolution, the search run with its summary, single-index checks and
//! rayon configuration.

use anyhow::{bail, Context, Result};
use perrin_hunter::config::{FileConfig, OutputFormat, Overrides, RunConfig};
use perrin_hunter::perrin::PERRIN_SEEDS;
use perrin_hunter::progress::Progress;
use perrin_hunter::report::{FindingSink, JsonSink, TextSink};
use perrin_hunter::{verify, PerrinSearch, PrimeTable, StopReason};
use rug::integer::IsPrime;
use rug::Integer;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{info, warn};

use super::{Cli, Commands};

/// Exit status when the accumulators ran out of capacity before the limit.
const EXIT_CAPACITY_EXHAUSTED: u8 = 3;

/// Build the run configuration from the optional TOML file and the
/// `search` subcommand flags.
fn resolve_config(cli: &Cli) -> Result<RunConfig> {
    let Commands::Search {
        limit,
        capacity,
        seeds,
        sequential_sieve,
        skip_verify,
        format,
        progress_secs,
    } = &cli.command
    else {
        bail!("resolve_config called for a non-search command");
    };

    let file = cli.config.as_deref().map(FileConfig::load).transpose()?;
    let overrides = Overrides {
        limit: *limit,
        capacity: *capacity,
        seeds: seeds.clone(),
        sequential_sieve: *sequential_sieve,
        skip_verify: *skip_verify,
        format: *format,
        progress_secs: *progress_secs,
    };
    Ok(RunConfig::resolve(file.as_ref(), &overrides)?)
}

// ── Search ──────────────────────────────────────────────────────

/// Run the `search` subcommand: build the table, walk the sequence, log a summary.
pub fn run_search(cli: &Cli) -> Result<ExitCode> {
    let run = resolve_config(cli)?;
    let config = &run.search;
    info!(
        limit = config.limit,
        capacity = config.capacity,
        seeds = ?config.seeds,
        parallel_sieve = config.parallel_sieve,
        verify = config.verify,
        threads = rayon::current_num_threads(),
        "perrin search starting"
    );

    let sieve_start = Instant::now();
    let table = PrimeTable::build_with(config.limit, config.parallel_sieve);
    info!(
        primes = table.prime_count(),
        limit = table.limit(),
        elapsed_ms = sieve_start.elapsed().as_millis() as u64,
        "prime table built"
    );

    let mut search = PerrinSearch::with_table(table, config.capacity, config.seeds)?;
    search.set_verify(config.verify);

    let stdout = std::io::stdout();
    let mut sink: Box<dyn FindingSink> = match run.format {
        OutputFormat::Text => Box::new(TextSink::new(stdout.lock())),
        OutputFormat::Json => Box::new(JsonSink::new(stdout.lock())),
    };
    let mut progress = Progress::new(run.progress_interval);

    let search_start = Instant::now();
    let outcome = search.run(sink.as_mut(), &mut progress)?;

    if !outcome.anomalies.is_empty() {
        warn!(
            count = outcome.anomalies.len(),
            first = outcome.anomalies[0],
            "primes failed the Perrin test; the arithmetic is broken"
        );
    }
    info!(
        stopped_at = outcome.stopped_at,
        reason = ?outcome.reason,
        tested = outcome.tested,
        pseudoprimes = outcome.pseudoprimes.len(),
        anomalies = outcome.anomalies.len(),
        highest_limb = outcome.highest_used,
        elapsed_secs = format_args!("{:.2}", search_start.elapsed().as_secs_f64()),
        "Search complete"
    );

    Ok(match outcome.reason {
        StopReason::LimitReached => ExitCode::SUCCESS,
        StopReason::CapacityExhausted => ExitCode::from(EXIT_CAPACITY_EXHAUSTED),
    })
}

// ── Single-Index Check ──────────────────────────────────────────

/// Run the `check` subcommand: P(n) mod n by matrix exponentiation plus a
/// Miller–Rabin primality test, one line on stdout.
///
/// Seeds come from `--seeds`, then `[search] seeds` in the config file, then
/// the Perrin defaults.
pub fn run_check(cli: &Cli, n: u64, seeds: Option<&[u32]>) -> Result<ExitCode> {
    if n < 2 {
        bail!("n must be at least 2, got {}", n);
    }
    let file = cli.config.as_deref().map(FileConfig::load).transpose()?;
    let seeds: [u32; 3] = match seeds {
        Some(s) => s
            .try_into()
            .with_context(|| format!("expected exactly 3 seeds, got {}", s.len()))?,
        None => file
            .and_then(|f| f.search.seeds)
            .unwrap_or(PERRIN_SEEDS),
    };

    let residue = verify::perrin_residue(seeds, n, n);
    let prime = Integer::from(n).is_probably_prime(25) != IsPrime::No;
    let verdict = match (residue == 0, prime) {
        (true, false) => "pseudoprime",
        (true, true) => "prime",
        (false, false) => "composite",
        (false, true) => "anomaly",
    };
    println!("n={} residue={} prime={} verdict={}", n, residue, prime, verdict);
    Ok(ExitCode::SUCCESS)
}

// ── Rayon ───────────────────────────────────────────────────────

pub fn configure_rayon(threads: Option<usize>) {
    let num_threads = threads.unwrap_or(0);
    if num_threads > 0 {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
        {
            warn!(error = %e, "Could not configure rayon thread pool");
        }
    }
}
