//! Hide & Seek headless entry point
//!
//! `hide-seek [config.json]` runs a batch and prints the report as JSON.
//! Without an argument the default batch configuration is used.

use std::process::ExitCode;

use hide_seek::{Harness, HarnessConfig};

fn load_config(path: Option<String>) -> Result<HarnessConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            log::info!("Loading config from {}", path);
            let text = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&text)?)
        }
        None => Ok(HarnessConfig::default()),
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(std::env::args().nth(1))?;
    let harness = Harness::new(config)?;
    let report = harness.run()?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn main() -> ExitCode {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    log::info!("Hide & Seek (headless) starting...");
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("hide-seek: {err}");
            ExitCode::FAILURE
        }
    }
}
