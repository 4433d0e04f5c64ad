//! The heat map: per-resource and per-transition heat plus the recorded
//! knowledge paths, persisted as one JSON document.

pub mod maintenance;
pub mod stats;
pub mod store;
pub mod types;

pub use store::HeatStore;
pub use types::{HeatEdge, HeatMap, HeatNode, KnowledgePath, PathMetadata};
