/// Integration tests for the full fetch → enrich → write cycle
///
/// A local tiny_http server stands in for the NBRO endpoint so these tests
/// need no network access. They verify:
/// 1. A successful run writes the sorted, enriched document and reports it
/// 2. The identifying User-Agent header is sent
/// 3. Non-2xx responses, malformed bodies and timeouts abort the run
/// 4. A failed run leaves the previous output file untouched
///
/// Run with: cargo test --test pipeline_local_server

use aqmon_service::config::ServiceConfig;
use aqmon_service::model::FetchError;
use aqmon_service::pipeline::{Pipeline, RunError};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

const FEED_BODY: &str = r#"[
  { "name": "Kandy", "meta_device_id": "NBRO-KDY-02", "pm25": 18.4, "timestamp": 1700000000000 },
  { "name": "Colombo Fort", "meta_device_id": "NBRO-CMB-01", "pm25": 60, "timestamp": 1700000060000 },
  { "name": "Anuradhapura", "meta_device_id": "NBRO-ANU-01", "pm25": null }
]"#;

/// Serves exactly one request with the given status and body. Returns the
/// endpoint URL and a receiver yielding the request's User-Agent.
fn serve_once(status: u16, body: &'static str) -> (String, mpsc::Receiver<Option<String>>) {
    let server = tiny_http::Server::http("127.0.0.1:0").expect("bind local test server");
    let addr = server.server_addr().to_ip().expect("TCP listener");
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        if let Ok(request) = server.recv() {
            let agent = request
                .headers()
                .iter()
                .find(|h| h.field.equiv("User-Agent"))
                .map(|h| h.value.as_str().to_string());
            let _ = tx.send(agent);

            let response = tiny_http::Response::from_string(body)
                .with_status_code(tiny_http::StatusCode::from(status))
                .with_header(
                    tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                        .unwrap(),
                );
            let _ = request.respond(response);
        }
    });

    (format!("http://{}/invoker.php", addr), rx)
}

fn config_for(endpoint: String, output: &Path) -> ServiceConfig {
    ServiceConfig {
        endpoint,
        timeout_secs: 5,
        output_path: output.to_path_buf(),
        ..ServiceConfig::default()
    }
}

// ---------------------------------------------------------------------------
// 1. Successful run
// ---------------------------------------------------------------------------

#[test]
fn test_run_writes_sorted_enriched_document() {
    let (endpoint, _agent) = serve_once(200, FEED_BODY);
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("air_quality").join("data").join("latest.json");

    let pipeline = Pipeline::with_config(config_for(endpoint.clone(), &output)).unwrap();
    let summary = pipeline.run_once().expect("run against local server should succeed");

    assert_eq!(summary.station_count, 3);
    assert_eq!(summary.output_path, output);
    assert!(summary.fetched_at_utc.ends_with('Z'), "fetch time should be UTC with Z suffix");

    let text = fs::read_to_string(&output).expect("output file should exist");
    assert!(text.ends_with("}\n"), "document should end with a newline");

    let doc: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(doc["source"], json!(endpoint));
    assert_eq!(doc["count"], json!(3));
    assert_eq!(doc["fetched_at_utc"], json!(summary.fetched_at_utc));

    let names: Vec<&str> = doc["stations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Anuradhapura", "Colombo Fort", "Kandy"]);

    let colombo = &doc["stations"][1];
    assert_eq!(colombo["sl_aqi_label"], json!("Unhealthy for Sensitive Groups"));
    assert_eq!(colombo["sl_aqi_est"], json!(120));
    assert_eq!(colombo["sl_aqi_range"], json!([101, 150]));
    assert_eq!(colombo["pm25_band_range"], json!([50.1, 75.0]));
    assert_eq!(colombo["timestamp_iso_utc"], json!("2023-11-14T22:14:20Z"));
    assert_eq!(colombo["meta_device_id"], json!("NBRO-CMB-01"));

    let anuradhapura = &doc["stations"][0];
    assert_eq!(anuradhapura["sl_aqi_label"], json!("Unknown"));
    assert_eq!(anuradhapura["sl_aqi_est"], Value::Null);
    assert_eq!(anuradhapura["timestamp_iso_utc"], Value::Null);
}

#[test]
fn test_run_sends_identifying_user_agent() {
    let (endpoint, agent) = serve_once(200, "[]");
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("latest.json");

    let pipeline = Pipeline::with_config(config_for(endpoint, &output)).unwrap();
    let summary = pipeline.run_once().unwrap();
    assert_eq!(summary.station_count, 0);

    let agent = agent.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(
        agent.as_deref(),
        Some("air_quality_bot/1.0 (+https://github.com/enigmazero-net/air_quality)")
    );
}

// ---------------------------------------------------------------------------
// 2. Fatal failures
// ---------------------------------------------------------------------------

#[test]
fn test_server_error_aborts_without_writing() {
    let (endpoint, _agent) = serve_once(503, r#"{"error":"maintenance"}"#);
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("data").join("latest.json");

    let pipeline = Pipeline::with_config(config_for(endpoint, &output)).unwrap();
    let result = pipeline.run_once();

    assert!(
        matches!(result, Err(RunError::Fetch(FetchError::HttpStatus(503)))),
        "503 should abort the run, got {:?}",
        result
    );
    assert!(!output.exists(), "no output should be written on fetch failure");
    assert!(!dir.path().join("data").exists(), "output directory should not be created either");
}

#[test]
fn test_malformed_body_aborts_and_keeps_previous_output() {
    let (endpoint, _agent) = serve_once(200, r#"{ "stations": [] }"#);
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("latest.json");
    fs::write(&output, "previous document\n").unwrap();

    let pipeline = Pipeline::with_config(config_for(endpoint, &output)).unwrap();
    let result = pipeline.run_once();

    assert!(
        matches!(result, Err(RunError::Fetch(FetchError::ParseError(_)))),
        "object body should be rejected, got {:?}",
        result
    );
    assert_eq!(fs::read_to_string(&output).unwrap(), "previous document\n");
}

#[test]
fn test_unreachable_endpoint_is_transport_error() {
    // Bind then drop to get a port with nothing listening on it.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("latest.json");

    let config = config_for(format!("http://127.0.0.1:{}/invoker.php", port), &output);
    let result = Pipeline::with_config(config).unwrap().run_once();

    assert!(
        matches!(result, Err(RunError::Fetch(FetchError::Transport(_)))),
        "connection refused should be a transport error, got {:?}",
        result
    );
    assert!(!output.exists());
}

#[test]
fn test_slow_server_hits_timeout() {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    thread::spawn(move || {
        if let Ok(request) = server.recv() {
            thread::sleep(Duration::from_secs(4));
            let _ = request.respond(tiny_http::Response::from_string("[]"));
        }
    });

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("latest.json");
    let config = ServiceConfig {
        timeout_secs: 1,
        ..config_for(format!("http://{}/invoker.php", addr), &output)
    };
    let result = Pipeline::with_config(config).unwrap().run_once();

    assert!(
        matches!(result, Err(RunError::Fetch(FetchError::Transport(_)))),
        "timeout should be a transport error, got {:?}",
        result
    );
    assert!(!output.exists());
}

#[test]
fn test_unwritable_output_is_write_error() {
    let (endpoint, _agent) = serve_once(200, "[]");
    let dir = tempfile::tempdir().unwrap();
    // A regular file where a parent directory is expected.
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "").unwrap();
    let output = blocker.join("latest.json");

    let result = Pipeline::with_config(config_for(endpoint, &output)).unwrap().run_once();
    assert!(
        matches!(result, Err(RunError::Write(_, _))),
        "filesystem failure should surface as a write error, got {:?}",
        result
    );
}
