//! Heat-map document types.
//!
//! Defines [`HeatNode`] (per-resource heat), [`HeatEdge`] (per-transition heat),
//! [`KnowledgePath`] (a finished session) and the [`HeatMap`] aggregate that is
//! persisted as a single JSON document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Schema version written into fresh heat-map documents.
pub const HEAT_MAP_VERSION: &str = "1.0.0";

/// Marker joining the two endpoints of an edge key.
pub const EDGE_MARKER: &str = "->";

/// Key under which the edge `from → to` is stored.
pub fn edge_key(from: &str, to: &str) -> String {
    format!("{from}{EDGE_MARKER}{to}")
}

fn clamp_heat(heat: f64) -> f64 {
    heat.clamp(0.0, 1.0)
}

/// Heat accumulated by a single resource identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatNode {
    /// Bounded to `[0.0, 1.0]`.
    pub heat: f64,
    pub last_accessed: DateTime<Utc>,
    pub access_count: u64,
    /// Reserved; nothing measures dwell time yet.
    pub avg_dwell_time: f64,
}

impl HeatNode {
    fn new(increment: f64, now: DateTime<Utc>) -> Self {
        Self {
            heat: clamp_heat(increment),
            last_accessed: now,
            access_count: 1,
            avg_dwell_time: 0.0,
        }
    }

    fn warm(&mut self, increment: f64, now: DateTime<Utc>) {
        self.heat = clamp_heat(self.heat + increment);
        self.last_accessed = now;
        self.access_count += 1;
    }
}

/// Heat accumulated by a directed transition between two resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatEdge {
    pub from: String,
    pub to: String,
    pub heat: f64,
    pub last_accessed: DateTime<Utc>,
    pub traversal_count: u64,
}

impl HeatEdge {
    fn new(from: &str, to: &str, increment: f64, now: DateTime<Utc>) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            heat: clamp_heat(increment),
            last_accessed: now,
            traversal_count: 1,
        }
    }

    fn warm(&mut self, increment: f64, now: DateTime<Utc>) {
        self.heat = clamp_heat(self.heat + increment);
        self.last_accessed = now;
        self.traversal_count += 1;
    }
}

/// Back-reference from a recorded path to the session that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathMetadata {
    pub session_id: String,
    pub interaction_count: usize,
}

/// The finalized record of one completed navigation session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgePath {
    pub id: String,
    /// Visited resource identifiers, in order.
    pub sequence: Vec<String>,
    /// Free-text intent the session was started with.
    pub intent: String,
    pub timestamp: DateTime<Utc>,
    pub duration_ms: i64,
    /// Caller-reported outcome, expected in `[0.0, 1.0]` but not enforced.
    pub success: f64,
    pub heat: f64,
    pub last_accessed: DateTime<Utc>,
    pub access_count: u64,
    pub metadata: PathMetadata,
}

/// Aggregate root persisted at `<root>/heat-map.json`.
///
/// Nodes, edges and intents are written as arrays of `[key, record]` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatMap {
    pub paths: Vec<KnowledgePath>,
    #[serde(with = "pairs")]
    pub nodes: BTreeMap<String, HeatNode>,
    #[serde(with = "pairs")]
    pub edges: BTreeMap<String, HeatEdge>,
    /// Reserved for per-intent aggregates.
    #[serde(default, with = "pairs")]
    pub intents: BTreeMap<String, serde_json::Value>,
    pub last_maintenance: DateTime<Utc>,
    pub version: String,
}

impl Default for HeatMap {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            nodes: BTreeMap::new(),
            edges: BTreeMap::new(),
            intents: BTreeMap::new(),
            last_maintenance: Utc::now(),
            version: HEAT_MAP_VERSION.to_string(),
        }
    }
}

impl HeatMap {
    /// Insert or warm the node for `id`. Returns the resulting heat.
    pub fn warm_node(&mut self, id: &str, increment: f64, now: DateTime<Utc>) -> f64 {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.warm(increment, now);
                node.heat
            }
            None => {
                let node = HeatNode::new(increment, now);
                let heat = node.heat;
                self.nodes.insert(id.to_string(), node);
                heat
            }
        }
    }

    /// Insert or warm the edge `from → to`. Returns the resulting heat.
    pub fn warm_edge(&mut self, from: &str, to: &str, increment: f64, now: DateTime<Utc>) -> f64 {
        let key = edge_key(from, to);
        match self.edges.get_mut(&key) {
            Some(edge) => {
                edge.warm(increment, now);
                edge.heat
            }
            None => {
                let edge = HeatEdge::new(from, to, increment, now);
                let heat = edge.heat;
                self.edges.insert(key, edge);
                heat
            }
        }
    }

    /// Append a path, evicting the oldest records beyond `max_paths`.
    /// Returns how many records were evicted.
    pub fn push_path(&mut self, record: KnowledgePath, max_paths: usize) -> usize {
        self.paths.push(record);
        let excess = self.paths.len().saturating_sub(max_paths);
        if excess > 0 {
            self.paths.drain(..excess);
        }
        excess
    }
}

/// Serialize a string-keyed map as a sequence of `[key, value]` pairs.
mod pairs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S, V>(map: &BTreeMap<String, V>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        V: Serialize,
    {
        serializer.collect_seq(map.iter())
    }

    pub fn deserialize<'de, D, V>(deserializer: D) -> Result<BTreeMap<String, V>, D::Error>
    where
        D: Deserializer<'de>,
        V: Deserialize<'de>,
    {
        let pairs = Vec::<(String, V)>::deserialize(deserializer)?;
        Ok(pairs.into_iter().collect())
    }
}
