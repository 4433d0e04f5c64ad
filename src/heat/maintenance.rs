use chrono::Utc;
use serde::Serialize;

use crate::config::MaintenanceConfig;
use crate::heat::types::HeatMap;

#[derive(Debug, Serialize)]
pub struct DecayResult {
    pub nodes_decayed: usize,
    pub edges_decayed: usize,
    pub paths_decayed: usize,
    pub nodes_pruned: usize,
    pub edges_pruned: usize,
}

// ── Heat Decay ───────────────────────────────────────────────────────────────

/// Multiply every node, edge and path heat by `decay_factor`, then drop nodes and
/// edges that fell below `prune_below`. Recorded paths are never pruned here; the
/// path cap in the store handles their eviction.
///
/// Only runs when explicitly invoked. Tracking operations never cool anything.
pub fn apply_decay(map: &mut HeatMap, config: &MaintenanceConfig) -> DecayResult {
    let factor = config.decay_factor.clamp(0.0, 1.0);

    for node in map.nodes.values_mut() {
        node.heat *= factor;
    }
    for edge in map.edges.values_mut() {
        edge.heat *= factor;
    }
    for path in &mut map.paths {
        path.heat *= factor;
    }

    let nodes_before = map.nodes.len();
    let edges_before = map.edges.len();
    map.nodes.retain(|_, node| node.heat >= config.prune_below);
    map.edges.retain(|_, edge| edge.heat >= config.prune_below);

    map.last_maintenance = Utc::now();

    DecayResult {
        nodes_decayed: nodes_before,
        edges_decayed: edges_before,
        paths_decayed: map.paths.len(),
        nodes_pruned: nodes_before - map.nodes.len(),
        edges_pruned: edges_before - map.edges.len(),
    }
}
