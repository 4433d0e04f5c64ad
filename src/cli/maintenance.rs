//! CLI `maintain` command: run one heat decay pass.

use anyhow::Result;
use heattrail::config::HeattrailConfig;
use heattrail::engine::Engine;

pub fn maintain(config: &HeattrailConfig) -> Result<()> {
    let mut engine = Engine::open(config.clone())?;
    let result = engine.maintain()?;

    println!(
        "Decay x{} applied to {} nodes, {} edges, {} paths.",
        config.maintenance.decay_factor,
        result.nodes_decayed,
        result.edges_decayed,
        result.paths_decayed
    );
    println!(
        "Pruned {} nodes and {} edges below {}.",
        result.nodes_pruned, result.edges_pruned, config.maintenance.prune_below
    );
    Ok(())
}
