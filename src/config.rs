/// Service configuration loader - parses aqmon.toml
///
/// Every setting has a built-in default matching the published NBRO feed,
/// so running without a config file fetches from the production endpoint
/// and writes `air_quality/data/latest.json`.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// NBRO air quality feed: a JSON array of station readings.
pub const DEFAULT_ENDPOINT: &str = "https://aq.nbro.gov.lk/invoker.php";
pub const DEFAULT_USER_AGENT: &str =
    "air_quality_bot/1.0 (+https://github.com/enigmazero-net/air_quality)";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_OUTPUT_PATH: &str = "air_quality/data/latest.json";

/// Config file looked up when `AQMON_CONFIG` is not set.
pub const DEFAULT_CONFIG_FILE: &str = "aqmon.toml";
/// Environment variable (also read from `.env`) naming the config file.
pub const CONFIG_ENV_VAR: &str = "AQMON_CONFIG";

/// Runtime settings for one fetch-enrich-write cycle.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    /// URL fetched with a single GET.
    pub endpoint: String,
    /// Sent as the `User-Agent` header.
    pub user_agent: String,
    /// Whole-request timeout.
    pub timeout_secs: u64,
    /// Where the output document is written; parents are created.
    pub output_path: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

/// Configuration loading error
#[derive(Debug)]
pub enum ConfigError {
    /// The file exists (or was asked for explicitly) but could not be read
    Read(PathBuf, std::io::Error),
    /// The file is not valid TOML for `ServiceConfig`
    Parse(PathBuf, toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read(path, e) => {
                write!(f, "Failed to read config file {}: {}", path.display(), e)
            }
            ConfigError::Parse(path, e) => {
                write!(f, "Failed to parse config file {}:\n\n{}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parses a config document. Missing keys take their defaults.
pub fn parse_config(contents: &str, origin: &Path) -> Result<ServiceConfig, ConfigError> {
    toml::from_str(contents).map_err(|e| ConfigError::Parse(origin.to_path_buf(), e))
}

/// Loads configuration from an explicit file. The file must exist.
pub fn load_config_from(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let contents =
        fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
    parse_config(&contents, path)
}

/// Loads configuration the way the binary does.
///
/// `explicit` (from `--config`) wins, then `AQMON_CONFIG` (environment or
/// `.env`); either must point at a readable file. Otherwise `aqmon.toml` in
/// the working directory is used if present, and built-in defaults if not.
pub fn load_config(explicit: Option<&Path>) -> Result<ServiceConfig, ConfigError> {
    dotenv::dotenv().ok();

    if let Some(path) = explicit {
        return load_config_from(path);
    }
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        return load_config_from(Path::new(&path));
    }

    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    if default_path.exists() {
        load_config_from(default_path)
    } else {
        tracing::debug!("no {} found, using built-in defaults", DEFAULT_CONFIG_FILE);
        Ok(ServiceConfig::default())
    }
}
