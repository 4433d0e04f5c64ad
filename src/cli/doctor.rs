//! CLI `doctor` command: strictly re-read the heat map and print a health report.

use anyhow::Result;
use heattrail::config::HeattrailConfig;
use heattrail::heat::HeatStore;

/// Run storage diagnostics and print a health report.
pub fn doctor(config: &HeattrailConfig) -> Result<()> {
    let path = config.heat_map_path();

    if !path.exists() {
        println!("Heat map: not found at {}", path.display());
        println!("Run `heattrail serve` and record a session to create it.");
        return Ok(());
    }

    let file_size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
    let session_docs = std::fs::read_dir(config.sessions_dir())
        .map(|entries| entries.filter_map(|e| e.ok()).count())
        .unwrap_or(0);

    println!("heattrail Health Report");
    println!("=======================");
    println!();
    println!("Heat map:          {}", path.display());
    println!("File size:         {}", format_bytes(file_size));
    println!("Load mode:         {}", if config.storage.strict_load { "strict" } else { "lenient" });
    println!("Session documents: {session_docs}");
    println!();

    // Always strict here: the point is to find corruption lenient mode would hide.
    let store = HeatStore::new(&path, true, config.heat.max_paths);
    match store.load() {
        Ok(map) => {
            println!("Schema version:    {}", map.version);
            println!("Knowledge paths:   {}", map.paths.len());
            println!("Nodes:             {}", map.nodes.len());
            println!("Edges:             {}", map.edges.len());
            println!();
            println!("Document check:    PASSED");
        }
        Err(e) => {
            println!("Document check:    FAILED ({e})");
            println!();
            println!("Recovery steps:");
            println!("  1. Restore heat-map.json from a backup, or");
            println!("  2. Run `heattrail reset` to start from an empty heat map.");
            if !config.storage.strict_load {
                println!("  Note: lenient mode is on, so the server is currently running on an empty map.");
            }
        }
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
