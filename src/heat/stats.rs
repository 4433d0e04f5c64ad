use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::heat::types::HeatMap;

/// Response from `get_heat_map`.
#[derive(Debug, Serialize)]
pub struct HeatMapSummary {
    pub nodes: Vec<NodeEntry>,
    pub edges: Vec<EdgeEntry>,
    pub total_paths: usize,
    pub total_nodes: usize,
    pub total_edges: usize,
    pub last_maintenance: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct NodeEntry {
    pub id: String,
    pub heat: f64,
    pub access_count: u64,
    pub last_accessed: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct EdgeEntry {
    pub from: String,
    pub to: String,
    pub heat: f64,
    pub traversal_count: u64,
}

/// Hottest `limit` nodes and `limit / 2` edges, plus totals.
///
/// Ties on heat are broken by access (or traversal) count, then by key.
pub fn heat_map_summary(map: &HeatMap, limit: usize) -> HeatMapSummary {
    let mut nodes: Vec<NodeEntry> = map
        .nodes
        .iter()
        .map(|(id, node)| NodeEntry {
            id: id.clone(),
            heat: node.heat,
            access_count: node.access_count,
            last_accessed: node.last_accessed,
        })
        .collect();
    nodes.sort_by(|a, b| {
        b.heat
            .total_cmp(&a.heat)
            .then(b.access_count.cmp(&a.access_count))
    });
    nodes.truncate(limit);

    let mut edges: Vec<EdgeEntry> = map
        .edges
        .values()
        .map(|edge| EdgeEntry {
            from: edge.from.clone(),
            to: edge.to.clone(),
            heat: edge.heat,
            traversal_count: edge.traversal_count,
        })
        .collect();
    edges.sort_by(|a, b| {
        b.heat
            .total_cmp(&a.heat)
            .then(b.traversal_count.cmp(&a.traversal_count))
    });
    edges.truncate(limit / 2);

    HeatMapSummary {
        nodes,
        edges,
        total_paths: map.paths.len(),
        total_nodes: map.nodes.len(),
        total_edges: map.edges.len(),
        last_maintenance: map.last_maintenance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warmed_map() -> HeatMap {
        let mut map = HeatMap::default();
        let now = Utc::now();
        for (id, visits) in [("cold", 1), ("hot", 5), ("warm", 3), ("tepid", 2)] {
            for _ in 0..visits {
                map.warm_node(id, 0.1, now);
            }
        }
        for (from, to, visits) in [("hot", "warm", 3), ("warm", "cold", 1), ("cold", "hot", 2)] {
            for _ in 0..visits {
                map.warm_edge(from, to, 0.1, now);
            }
        }
        map
    }

    #[test]
    fn test_empty_map_summary() {
        let summary = heat_map_summary(&HeatMap::default(), 10);
        assert!(summary.nodes.is_empty());
        assert!(summary.edges.is_empty());
        assert_eq!(summary.total_paths, 0);
    }

    #[test]
    fn test_nodes_sorted_by_heat_and_limited() {
        let summary = heat_map_summary(&warmed_map(), 2);
        let ids: Vec<&str> = summary.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["hot", "warm"]);
        assert_eq!(summary.total_nodes, 4);
    }

    #[test]
    fn test_edges_limited_to_half() {
        let summary = heat_map_summary(&warmed_map(), 4);
        assert_eq!(summary.edges.len(), 2);
        assert_eq!(summary.edges[0].from, "hot");
        assert_eq!(summary.edges[0].to, "warm");
        assert_eq!(summary.total_edges, 3);
    }
}
