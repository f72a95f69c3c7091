/// Enrichment pass: derives the AQI fields and readable timestamp for each
/// raw station record, then puts the records in their published order.
///
/// Everything here is pure. Bad per-station data never fails the pass; it
/// degrades to an `"Unknown"` label or a null timestamp for that station.

use crate::aqi::{self, coerce_f64};
use crate::model::{
    Enrichment, EnrichedReading, RawReading, FIELD_DEVICE_ID, FIELD_NAME, FIELD_PM25,
    FIELD_TIMESTAMP,
};
use chrono::{DateTime, Datelike, Timelike, Utc};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Timestamps
// ---------------------------------------------------------------------------

/// Formats a UTC instant as ISO 8601 with a `Z` suffix.
///
/// Whole seconds print as `2023-11-14T22:13:20Z`; anything finer prints
/// six fractional digits, e.g. `2023-11-14T22:13:20.250000Z`.
pub fn format_iso_utc(dt: &DateTime<Utc>) -> String {
    if dt.nanosecond() / 1_000 == 0 {
        dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    } else {
        dt.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
    }
}

/// Converts epoch milliseconds to an ISO 8601 UTC string.
///
/// Returns `None` for `None`, NaN/infinite values, and instants outside
/// years 1 through 9999. Sub-millisecond fractions are kept to the
/// microsecond.
pub fn iso_from_ms(ts_ms: Option<f64>) -> Option<String> {
    let ms = ts_ms?;
    if !ms.is_finite() {
        return None;
    }
    let micros = (ms * 1_000.0).round();
    if micros < i64::MIN as f64 || micros > i64::MAX as f64 {
        return None;
    }
    let dt = DateTime::<Utc>::from_timestamp_micros(micros as i64)?;
    if !(1..=9999).contains(&dt.year()) {
        return None;
    }
    Some(format_iso_utc(&dt))
}

/// `iso_from_ms` over a raw JSON field value.
pub fn iso_from_value(value: Option<&Value>) -> Option<String> {
    iso_from_ms(value.and_then(coerce_f64))
}

// ---------------------------------------------------------------------------
// Per-reading enrichment
// ---------------------------------------------------------------------------

/// Derives the enrichment fields for one raw reading.
pub fn enrichment_for(raw: &RawReading) -> Enrichment {
    let class = aqi::classify_value(raw.get(FIELD_PM25));
    Enrichment {
        timestamp_iso_utc: iso_from_value(raw.get(FIELD_TIMESTAMP)),
        sl_aqi_label: class.label.to_string(),
        sl_aqi_est: class.estimate,
        sl_aqi_range: class.aqi_range(),
        pm25_band_range: class.pm25_range(),
    }
}

/// Enriches one reading, keeping every raw field.
pub fn enrich_reading(raw: RawReading) -> EnrichedReading {
    let enrichment = enrichment_for(&raw);
    EnrichedReading { raw, enrichment }
}

/// Enriches every reading independently, preserving input order.
pub fn enrich_all(raw: Vec<RawReading>) -> Vec<EnrichedReading> {
    let enriched: Vec<EnrichedReading> = raw.into_iter().map(enrich_reading).collect();

    let unknown = enriched
        .iter()
        .filter(|r| r.enrichment.sl_aqi_label == aqi::UNKNOWN_LABEL)
        .count();
    if unknown > 0 {
        tracing::debug!(unknown, total = enriched.len(), "readings without a usable PM2.5 value");
    }

    enriched
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Stable sort by (station name, device id), both compared as plain
/// strings. Keeps successive documents diff-friendly.
pub fn sort_stations(readings: &mut [EnrichedReading]) {
    readings.sort_by_cached_key(|r| (r.sort_field(FIELD_NAME), r.sort_field(FIELD_DEVICE_ID)));
}
