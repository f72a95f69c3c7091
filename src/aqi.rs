/// Sri Lanka AQI estimation from PM2.5 concentration.
///
/// Bands as published on the NBRO air quality site (aq.nbro.gov.lk),
/// PM2.5 µg/m³ mapped onto AQI:
///
/// ```text
/// Good                             0    – 25    =>   0 – 50
/// Moderate                         25.1 – 50    =>  51 – 100
/// Unhealthy for Sensitive Groups   50.1 – 75    => 101 – 150
/// Unhealthy                        75.1 – 150   => 151 – 200
/// Very Unhealthy                   150.1 – 250  => 201 – 300
/// Hazardous                        > 250.1      => 301 – 500
/// ```
///
/// Within a band the AQI is linearly interpolated and rounded half away
/// from zero.

use crate::model::{Breakpoint, Classification};
use serde_json::Value;

/// Label used when no band applies or the input is unusable.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// The breakpoint table, in scan order. Values are the published ones,
/// including the 0.1 gaps between bands.
pub static BREAKPOINTS: &[Breakpoint] = &[
    Breakpoint { pm_low: 0.0, pm_high: 25.0, aqi_low: 0, aqi_high: 50, label: "Good" },
    Breakpoint { pm_low: 25.1, pm_high: 50.0, aqi_low: 51, aqi_high: 100, label: "Moderate" },
    Breakpoint {
        pm_low: 50.1,
        pm_high: 75.0,
        aqi_low: 101,
        aqi_high: 150,
        label: "Unhealthy for Sensitive Groups",
    },
    Breakpoint { pm_low: 75.1, pm_high: 150.0, aqi_low: 151, aqi_high: 200, label: "Unhealthy" },
    Breakpoint { pm_low: 150.1, pm_high: 250.0, aqi_low: 201, aqi_high: 300, label: "Very Unhealthy" },
    Breakpoint { pm_low: 250.1, pm_high: f64::INFINITY, aqi_low: 301, aqi_high: 500, label: "Hazardous" },
];

const UNKNOWN: Classification = Classification {
    label: UNKNOWN_LABEL,
    estimate: None,
    band: None,
};

/// Classifies a PM2.5 concentration.
///
/// `None` and values outside every band (negative, NaN, infinite) are
/// `"Unknown"`. The first band with `pm_low <= pm <= pm_high` wins, so a
/// value equal to a band's upper bound stays in that band.
pub fn classify_pm25(pm25: Option<f64>) -> Classification {
    let Some(pm) = pm25 else {
        return UNKNOWN;
    };
    if !pm.is_finite() {
        return UNKNOWN;
    }

    match BREAKPOINTS.iter().find(|b| b.pm_low <= pm && pm <= b.pm_high) {
        Some(band) => Classification {
            label: band.label,
            estimate: Some(interpolate(band, pm)),
            band: Some(band),
        },
        None => UNKNOWN,
    }
}

/// Classifies the `pm25` field of a raw record, coercing whatever JSON
/// value the source sent. Anything that cannot be read as a number is
/// `"Unknown"` rather than an error.
pub fn classify_value(value: Option<&Value>) -> Classification {
    classify_pm25(value.and_then(coerce_f64))
}

/// Looks up a band by its label.
pub fn band_for_label(label: &str) -> Option<&'static Breakpoint> {
    BREAKPOINTS.iter().find(|b| b.label == label)
}

/// Best-effort numeric reading of a JSON value: numbers, numeric strings,
/// and booleans (as 1/0). Null and everything else yield `None`.
pub(crate) fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn interpolate(band: &Breakpoint, pm: f64) -> i64 {
    if band.pm_high == band.pm_low {
        return band.aqi_high;
    }
    let aqi_span = (band.aqi_high - band.aqi_low) as f64;
    let est = band.aqi_low as f64 + (pm - band.pm_low) * aqi_span / (band.pm_high - band.pm_low);
    est.round() as i64
}
