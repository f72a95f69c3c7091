//! Air Quality Monitoring Service - single-shot fetcher
//!
//! Each invocation:
//! 1. Fetches current station readings from the NBRO air quality API
//! 2. Adds a Sri Lanka AQI estimate and ISO timestamp to every reading
//! 3. Writes a sorted, key-ordered JSON document for the publishing site
//!
//! Meant to be run from cron or CI; there is no loop and no retry.
//!
//! Usage:
//!   cargo run --release                              # defaults / aqmon.toml
//!   cargo run --release -- --config conf/aqmon.toml  # explicit config file
//!   cargo run --release -- --output public/aq.json   # override output path
//!
//! Environment:
//!   AQMON_CONFIG - config file path (also read from .env)
//!   RUST_LOG     - log filter for diagnostics on stderr (default: info)

use aqmon_service::pipeline::Pipeline;
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    // Banner goes to stderr; stdout carries only the summary line
    eprintln!("🌫️  Air Quality Snapshot");
    eprintln!("========================\n");

    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();
    let mut config_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            flag @ ("--config" | "--output") => {
                let Some(value) = args.get(i + 1) else {
                    eprintln!("Error: {} requires a path", flag);
                    std::process::exit(1);
                };
                if flag == "--config" {
                    config_path = Some(PathBuf::from(value));
                } else {
                    output_path = Some(PathBuf::from(value));
                }
                i += 2;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                eprintln!("Usage: {} [--config PATH] [--output PATH]", args[0]);
                std::process::exit(1);
            }
        }
    }

    let pipeline = match Pipeline::from_config_file(config_path.as_deref(), output_path) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("\n❌ Initialization failed: {}\n", e);
            std::process::exit(1);
        }
    };
    eprintln!("   Endpoint: {}", pipeline.config().endpoint);
    eprintln!("   Output:   {}\n", pipeline.config().output_path.display());

    match pipeline.run_once() {
        Ok(summary) => println!("{}", summary),
        Err(e) => {
            eprintln!("\n❌ Run failed: {}\n", e);
            std::process::exit(1);
        }
    }
}
