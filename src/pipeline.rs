/// One fetch → enrich → sort → write cycle.
///
/// This module ties the pieces together:
/// 1. Fetches the station list from the configured endpoint
/// 2. Enriches every reading with AQI fields and an ISO timestamp
/// 3. Sorts stations into their published order
/// 4. Writes the output document, replacing the previous one
///
/// A fetch failure aborts before the output path is touched, so the last
/// good document stays in place.

use crate::config::{self, ConfigError, ServiceConfig};
use crate::enrich::{self, format_iso_utc};
use crate::ingest::nbro;
use crate::model::{FetchError, OutputDocument, RawReading};
use crate::output;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Errors and results
// ---------------------------------------------------------------------------

/// Why a run failed. Every variant is fatal.
#[derive(Debug)]
pub enum RunError {
    Config(ConfigError),
    Fetch(FetchError),
    Write(PathBuf, std::io::Error),
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunError::Config(e) => write!(f, "{}", e),
            RunError::Fetch(e) => write!(f, "{}", e),
            RunError::Write(path, e) => {
                write!(f, "Failed to write {}: {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::Config(e) => Some(e),
            RunError::Fetch(e) => Some(e),
            RunError::Write(_, e) => Some(e),
        }
    }
}

impl From<ConfigError> for RunError {
    fn from(e: ConfigError) -> Self {
        RunError::Config(e)
    }
}

impl From<FetchError> for RunError {
    fn from(e: FetchError) -> Self {
        RunError::Fetch(e)
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub output_path: PathBuf,
    pub station_count: usize,
    pub fetched_at_utc: String,
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Wrote {} ({} stations) at {}",
            self.output_path.display(),
            self.station_count,
            self.fetched_at_utc
        )
    }
}

// ---------------------------------------------------------------------------
// Pure transform
// ---------------------------------------------------------------------------

/// Builds the output document from raw readings: enrich each, then sort.
///
/// Needs no network or filesystem; `Pipeline::run_once` is this plus I/O.
pub fn build_document(
    source: &str,
    fetched_at: &DateTime<Utc>,
    raw: Vec<RawReading>,
) -> OutputDocument {
    let mut stations = enrich::enrich_all(raw);
    enrich::sort_stations(&mut stations);
    output::build_document(source, &format_iso_utc(fetched_at), stations)
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// A configured pipeline, ready to run.
pub struct Pipeline {
    config: ServiceConfig,
    client: reqwest::blocking::Client,
}

impl Pipeline {
    /// Create a pipeline with the built-in defaults
    pub fn new() -> Result<Self, RunError> {
        Self::with_config(ServiceConfig::default())
    }

    /// Create a pipeline from the config file lookup in `config::load_config`,
    /// optionally redirecting the output document.
    pub fn from_config_file(
        config_path: Option<&Path>,
        output_override: Option<PathBuf>,
    ) -> Result<Self, RunError> {
        let mut config = config::load_config(config_path)?;
        if let Some(path) = output_override {
            config.output_path = path;
        }
        Self::with_config(config)
    }

    /// Create a pipeline with custom configuration
    pub fn with_config(config: ServiceConfig) -> Result<Self, RunError> {
        let client = nbro::build_client(&config)?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Runs one full cycle and reports what was written.
    pub fn run_once(&self) -> Result<RunSummary, RunError> {
        let raw = nbro::fetch_readings(&self.client, &self.config.endpoint)?;
        let fetched_at = Utc::now();

        let doc = build_document(&self.config.endpoint, &fetched_at, raw);
        let path = &self.config.output_path;
        output::write_document(&doc, path).map_err(|e| RunError::Write(path.clone(), e))?;

        Ok(RunSummary {
            output_path: path.clone(),
            station_count: doc.count,
            fetched_at_utc: doc.fetched_at_utc,
        })
    }
}
