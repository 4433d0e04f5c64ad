//! CLI `track` command: forward one `(action, path)` note access into the engine.
//!
//! Each invocation is its own process. Consecutive calls keep extending the newest
//! unended session document under `sessions/` until `track --end <success>` closes
//! it and records the knowledge path.

use anyhow::Result;
use heattrail::adapter::{end_note_session, record_note_access};
use heattrail::config::HeattrailConfig;
use heattrail::engine::Engine;

/// Record a note access and print the receipt as JSON.
pub fn track(config: &HeattrailConfig, action: Option<&str>, path: Option<&str>) -> Result<()> {
    let mut engine = Engine::open(config.clone())?;
    let receipt = record_note_access(&mut engine, action, path)?;
    println!("{}", serde_json::to_string(&receipt)?);
    Ok(())
}

/// End the tracked session and print the summary as JSON.
pub fn end(config: &HeattrailConfig, success: f64) -> Result<()> {
    let mut engine = Engine::open(config.clone())?;
    let summary = end_note_session(&mut engine, success)?;
    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}
