//! CLI `reset` command: delete the heat map and session documents after user confirmation.

use anyhow::{bail, Context, Result};
use std::io::Write;

use heattrail::config::HeattrailConfig;
use heattrail::engine::Engine;

/// Delete all heat data after user confirmation.
pub fn reset(config: &HeattrailConfig) -> Result<()> {
    let root = config.resolved_root();

    println!("WARNING: This will permanently delete the heat map, all knowledge paths and session documents.");
    println!("Root: {}", root.display());
    print!("\nType YES to confirm: ");
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    if input.trim() != "YES" {
        bail!("reset cancelled");
    }

    let mut engine = Engine::open(config.clone())?;
    engine.reset()?;

    let sessions = config.sessions_dir();
    if sessions.exists() {
        std::fs::remove_dir_all(&sessions)
            .with_context(|| format!("failed to remove {}", sessions.display()))?;
    }

    println!("Heat map cleared. Reset complete.");
    Ok(())
}
