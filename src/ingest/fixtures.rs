/// Test fixtures: representative JSON payloads from the NBRO air quality API.
///
/// Response shape (a bare array, one object per station):
///   [
///     { "name": "...",            — station display name
///       "meta_device_id": "...",  — sensor device identifier
///       "pm25": 18.4,             — µg/m³, may be null when the sensor is down
///       "timestamp": 1700000000000, — epoch milliseconds
///       ...                       — other fields vary by station and are kept as-is
///     }
///   ]

/// Three stations, deliberately out of order: one Good, one Hazardous,
/// one with a dead PM2.5 sensor.
#[cfg(test)]
pub(crate) fn fixture_three_stations_json() -> &'static str {
    r#"[
      {
        "name": "Kandy",
        "meta_device_id": "NBRO-KDY-02",
        "pm25": 18.4,
        "pm10": 27.0,
        "timestamp": 1700000000000,
        "location": { "lat": 7.2906, "lon": 80.6337 }
      },
      {
        "name": "Colombo Fort",
        "meta_device_id": "NBRO-CMB-01",
        "pm25": 312.7,
        "timestamp": 1700000060000
      },
      {
        "name": "Anuradhapura",
        "meta_device_id": "NBRO-ANU-01",
        "pm25": null,
        "timestamp": null
      }
    ]"#
}

/// Station records with values the source occasionally sends in the
/// wrong type: numeric strings, text placeholders, numeric device ids.
#[cfg(test)]
pub(crate) fn fixture_mixed_types_json() -> &'static str {
    r#"[
      { "name": "Jaffna", "meta_device_id": 7, "pm25": "55.2", "timestamp": "1700000000000" },
      { "name": "Galle", "meta_device_id": "G1", "pm25": "offline", "timestamp": "n/a" },
      { "meta_device_id": "ORPHAN", "pm25": 4 }
    ]"#
}

/// Valid JSON, but an object rather than the expected array.
#[cfg(test)]
pub(crate) fn fixture_object_envelope_json() -> &'static str {
    r#"{ "stations": [ { "name": "Kandy", "pm25": 18.4 } ] }"#
}

/// An array whose second element is not an object.
#[cfg(test)]
pub(crate) fn fixture_array_with_scalar_json() -> &'static str {
    r#"[ { "name": "Kandy", "pm25": 18.4 }, 42 ]"#
}
