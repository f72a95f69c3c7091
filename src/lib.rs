/// aqmon_service: Sri Lanka air quality snapshot service.
///
/// # Module structure
///
/// ```text
/// aqmon_service
/// ├── model       — shared data types (RawReading, Breakpoint, EnrichedReading, FetchError, …)
/// ├── config      — service configuration loader (aqmon.toml)
/// ├── aqi         — PM2.5 → AQI breakpoint table and classification
/// ├── enrich      — per-reading enrichment, timestamp conversion, station ordering
/// ├── ingest
/// │   ├── nbro    — NBRO air quality API: HTTP fetch + JSON parsing
/// │   └── fixtures (test only) — representative API response payloads
/// ├── output      — output document rendering and writing
/// └── pipeline    — one fetch → enrich → sort → write cycle
/// ```

/// Public modules
pub mod aqi;
pub mod config;
pub mod enrich;
pub mod ingest;
pub mod model;
pub mod output;
pub mod pipeline;
