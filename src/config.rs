//! # Config — Search Parameters from Defaults, TOML and CLI
//!
//! Resolution order, lowest to highest precedence:
//!
//! 1. built-in defaults ([`SearchConfig::default`]),
//! 2. an optional TOML file (`[search]` and `[output]` sections),
//! 3. command-line flags and their environment fallbacks.
//!
//! ```toml
//! [search]
//! limit = 1_000_000
//! capacity = 20_000
//! seeds = [3, 0, 2]
//! parallel_sieve = true
//! verify = true
//!
//! [output]
//! format = "json"
//! progress_secs = 10
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{SearchError, SearchResult};
use crate::perrin::{FIRST_INDEX, PERRIN_SEEDS};
use crate::sieve::DEFAULT_LIMIT;

/// Default accumulator capacity in 32-bit limbs (enough for ~28M indices).
pub const DEFAULT_CAPACITY: usize = 360_000;

/// Default interval between progress log lines.
pub const DEFAULT_PROGRESS_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// The `[search]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchSection {
    pub limit: Option<u64>,
    pub capacity: Option<usize>,
    pub seeds: Option<[u32; 3]>,
    pub parallel_sieve: Option<bool>,
    pub verify: Option<bool>,
}

/// The `[output]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    pub format: Option<OutputFormat>,
    pub progress_secs: Option<u64>,
}

/// Top-level TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub search: SearchSection,
    #[serde(default)]
    pub output: OutputSection,
}

impl FileConfig {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("parsing config TOML")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        FileConfig::parse(&text).with_context(|| format!("in {}", path.display()))
    }
}

/// Values given on the command line; `None`/`false` leaves the lower layer in place.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub limit: Option<u64>,
    pub capacity: Option<usize>,
    pub seeds: Option<Vec<u32>>,
    pub sequential_sieve: bool,
    pub skip_verify: bool,
    pub format: Option<OutputFormat>,
    pub progress_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Upper bound N of the prime table; the last index tested.
    pub limit: u64,
    /// Maximum limbs per accumulator.
    pub capacity: usize,
    /// P(0), P(1), P(2).
    pub seeds: [u32; 3],
    pub parallel_sieve: bool,
    pub verify: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            limit: DEFAULT_LIMIT,
            capacity: DEFAULT_CAPACITY,
            seeds: PERRIN_SEEDS,
            parallel_sieve: true,
            verify: true,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> SearchResult<()> {
        if self.limit < FIRST_INDEX {
            return Err(SearchError::InvalidConfig(format!(
                "limit must be at least {}, got {}",
                FIRST_INDEX, self.limit
            )));
        }
        if self.limit > u32::MAX as u64 {
            return Err(SearchError::InvalidConfig(format!(
                "limit {} does not fit a 32-bit divisor",
                self.limit
            )));
        }
        if self.capacity == 0 {
            return Err(SearchError::InvalidConfig(
                "capacity must be at least one limb".into(),
            ));
        }
        Ok(())
    }
}

/// Everything a run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub search: SearchConfig,
    pub format: OutputFormat,
    pub progress_interval: Duration,
}

impl RunConfig {
    /// Layer `file` and `overrides` over the defaults and validate the result.
    pub fn resolve(file: Option<&FileConfig>, overrides: &Overrides) -> SearchResult<Self> {
        let defaults = SearchConfig::default();
        let (search, output) = match file {
            Some(f) => (f.search.clone(), f.output.clone()),
            None => (SearchSection::default(), OutputSection::default()),
        };

        let seeds = match &overrides.seeds {
            Some(v) => <[u32; 3]>::try_from(v.as_slice()).map_err(|_| {
                SearchError::InvalidConfig(format!("expected exactly 3 seeds, got {}", v.len()))
            })?,
            None => search.seeds.unwrap_or(defaults.seeds),
        };

        let config = SearchConfig {
            limit: overrides.limit.or(search.limit).unwrap_or(defaults.limit),
            capacity: overrides
                .capacity
                .or(search.capacity)
                .unwrap_or(defaults.capacity),
            seeds,
            parallel_sieve: !overrides.sequential_sieve
                && search.parallel_sieve.unwrap_or(defaults.parallel_sieve),
            verify: !overrides.skip_verify && search.verify.unwrap_or(defaults.verify),
        };
        config.validate()?;

        let progress_secs = overrides
            .progress_secs
            .or(output.progress_secs)
            .unwrap_or(DEFAULT_PROGRESS_SECS);

        Ok(RunConfig {
            search: config,
            format: overrides.format.or(output.format).unwrap_or_default(),
            progress_interval: Duration::from_secs(progress_secs),
        })
    }
}
