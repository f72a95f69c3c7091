/// Shared data types for the air quality service.
///
/// Raw station readings are kept as open JSON maps because the NBRO API owns
/// that schema; everything this service derives is strongly typed and merged
/// back in at serialization time.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Raw input
// ---------------------------------------------------------------------------

/// One station record exactly as returned by the remote source.
pub type RawReading = Map<String, Value>;

/// Field carrying the PM2.5 concentration (µg/m³).
pub const FIELD_PM25: &str = "pm25";
/// Field carrying the reading time as epoch milliseconds.
pub const FIELD_TIMESTAMP: &str = "timestamp";
/// Station display name, primary sort key.
pub const FIELD_NAME: &str = "name";
/// Device identifier, secondary sort key.
pub const FIELD_DEVICE_ID: &str = "meta_device_id";

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// One row of the PM2.5 → AQI breakpoint table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub pm_low: f64,
    /// `f64::INFINITY` for the open-ended top band.
    pub pm_high: f64,
    pub aqi_low: i64,
    pub aqi_high: i64,
    pub label: &'static str,
}

/// Result of classifying a single PM2.5 value.
///
/// `band` is `None` whenever the label is `"Unknown"`.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: &'static str,
    pub estimate: Option<i64>,
    pub band: Option<&'static Breakpoint>,
}

impl Classification {
    /// `[aqi_low, aqi_high]` of the matched band.
    pub fn aqi_range(&self) -> Option<[i64; 2]> {
        self.band.map(|b| [b.aqi_low, b.aqi_high])
    }

    /// `[pm_low, pm_high]` of the matched band, upper bound `None` when infinite.
    pub fn pm25_range(&self) -> Option<(f64, Option<f64>)> {
        self.band.map(|b| {
            let high = if b.pm_high.is_infinite() { None } else { Some(b.pm_high) };
            (b.pm_low, high)
        })
    }
}

// ---------------------------------------------------------------------------
// Enriched output
// ---------------------------------------------------------------------------

/// Derived fields appended to every station record.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Enrichment {
    pub timestamp_iso_utc: Option<String>,
    pub sl_aqi_label: String,
    pub sl_aqi_est: Option<i64>,
    pub sl_aqi_range: Option<[i64; 2]>,
    pub pm25_band_range: Option<(f64, Option<f64>)>,
}

/// A raw reading plus its enrichment.
///
/// Serializes as a single flat object: every raw key, then the enrichment
/// keys, which win over any raw key of the same name.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedReading {
    pub raw: RawReading,
    pub enrichment: Enrichment,
}

impl EnrichedReading {
    /// Flattens into the JSON object written to the output document.
    pub fn to_json_map(&self) -> Result<Map<String, Value>, serde_json::Error> {
        let mut merged = self.raw.clone();
        if let Value::Object(extra) = serde_json::to_value(&self.enrichment)? {
            merged.extend(extra);
        }
        Ok(merged)
    }

    /// String value of a raw field for ordering purposes.
    ///
    /// Missing or null fields are the empty string; strings use their
    /// contents; anything else uses its compact JSON text.
    pub fn sort_field(&self, field: &str) -> String {
        match self.raw.get(field) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

impl Serialize for EnrichedReading {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let merged = self.to_json_map().map_err(serde::ser::Error::custom)?;
        let mut map = serializer.serialize_map(Some(merged.len()))?;
        for (k, v) in &merged {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// The document written once per run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct OutputDocument {
    pub source: String,
    pub fetched_at_utc: String,
    pub count: usize,
    pub stations: Vec<EnrichedReading>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures retrieving or decoding the station list. All are fatal to a run.
#[derive(Debug)]
pub enum FetchError {
    /// Connection failure, timeout, or any other transport-level problem.
    Transport(String),
    /// The server answered with a non-2xx status.
    HttpStatus(u16),
    /// Body was not a JSON array of objects.
    ParseError(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Transport(msg) => write!(f, "Request to air quality API failed: {}", msg),
            FetchError::HttpStatus(code) => write!(f, "Air quality API returned HTTP {}", code),
            FetchError::ParseError(msg) => write!(f, "Malformed air quality API response: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => FetchError::HttpStatus(status.as_u16()),
            None => FetchError::Transport(e.to_string()),
        }
    }
}
