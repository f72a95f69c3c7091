/// NBRO (National Building Research Organisation) air quality API client.
///
/// The endpoint returns a bare JSON array with one object per monitoring
/// station. We only rely on `pm25`, `timestamp`, `name` and
/// `meta_device_id`; every other field is carried through untouched. See
/// `fixtures.rs` for annotated examples of the response structure.
///
/// Endpoint: https://aq.nbro.gov.lk/invoker.php

use crate::config::ServiceConfig;
use crate::model::{FetchError, RawReading};
use std::time::Duration;

// ---------------------------------------------------------------------------
// HTTP client
// ---------------------------------------------------------------------------

/// Builds the blocking client used for the single fetch: fixed timeout and
/// identifying `User-Agent`.
pub fn build_client(config: &ServiceConfig) -> Result<reqwest::blocking::Client, FetchError> {
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(config.user_agent.as_str())
        .build()
        .map_err(|e| FetchError::Transport(format!("could not build HTTP client: {}", e)))
}

/// Fetches the current station list.
///
/// # Errors
/// - `FetchError::Transport` — connection failure or timeout.
/// - `FetchError::HttpStatus` — any non-2xx response.
/// - `FetchError::ParseError` — body is not a JSON array of objects.
pub fn fetch_readings(
    client: &reqwest::blocking::Client,
    endpoint: &str,
) -> Result<Vec<RawReading>, FetchError> {
    tracing::info!(endpoint, "fetching air quality readings");

    let response = client
        .get(endpoint)
        .header("Accept", "application/json")
        .send()?;

    let status = response.status();
    if !status.is_success() {
        tracing::error!(status = status.as_u16(), "air quality API returned an error status");
        return Err(FetchError::HttpStatus(status.as_u16()));
    }

    let body = response.text()?;
    let readings = parse_readings(&body)?;
    tracing::info!(count = readings.len(), "received station readings");
    Ok(readings)
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses a response body into raw station readings.
///
/// An empty array is valid (zero stations). Anything other than an array
/// of objects is a `ParseError`.
pub fn parse_readings(body: &str) -> Result<Vec<RawReading>, FetchError> {
    serde_json::from_str::<Vec<RawReading>>(body)
        .map_err(|e| FetchError::ParseError(format!("expected a JSON array of objects: {}", e)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
