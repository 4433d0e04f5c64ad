#![allow(dead_code)]

use chrono::Utc;
use heattrail::config::HeattrailConfig;
use heattrail::engine::Engine;
use heattrail::heat::{KnowledgePath, PathMetadata};
use heattrail::session::InteractionType;
use tempfile::TempDir;

/// Config whose storage root is the given temp dir.
pub fn test_config(dir: &TempDir) -> HeattrailConfig {
    let mut config = HeattrailConfig::default();
    config.storage.root_dir = dir.path().to_string_lossy().into_owned();
    config
}

/// Open a lenient engine over a fresh root.
pub fn test_engine(dir: &TempDir) -> Engine {
    Engine::open(test_config(dir)).unwrap()
}

/// Run a whole session: start, visit every path as a note, end with `success`.
pub fn record_session(engine: &mut Engine, intent: &str, steps: &[&str], success: f64) {
    let handle = engine.start_tracking(intent).unwrap();
    for step in steps {
        engine
            .record_step(&handle, step, InteractionType::Note)
            .unwrap();
    }
    engine.end_tracking(&handle, success).unwrap();
}

/// A detached knowledge path record, for store-level tests.
pub fn knowledge_path(id: &str, intent: &str, steps: usize) -> KnowledgePath {
    let now = Utc::now();
    KnowledgePath {
        id: id.to_string(),
        sequence: (0..steps).map(|i| format!("notes/{id}-{i}.md")).collect(),
        intent: intent.to_string(),
        timestamp: now,
        duration_ms: 1500,
        success: 0.8,
        heat: 1.0,
        last_accessed: now,
        access_count: 1,
        metadata: PathMetadata {
            session_id: format!("session-{id}"),
            interaction_count: steps,
        },
    }
}
