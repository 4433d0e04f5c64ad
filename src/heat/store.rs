//! Persistence for the heat-map document.
//!
//! Every mutation is a full load → mutate → save cycle over one JSON file. Mutating
//! methods take `&mut self`, so a process that owns a single [`HeatStore`] (the
//! [`Engine`](crate::engine::Engine) does) serializes its own writes. Saves go to a
//! temp file that is renamed over the document, so readers never observe a torn write.

use chrono::Utc;
use std::path::{Path, PathBuf};

use crate::config::HeattrailConfig;
use crate::error::{EngineError, EngineResult};
use crate::heat::types::{HeatMap, KnowledgePath};

pub struct HeatStore {
    path: PathBuf,
    strict: bool,
    max_paths: usize,
}

impl HeatStore {
    pub fn new(path: impl Into<PathBuf>, strict: bool, max_paths: usize) -> Self {
        Self {
            path: path.into(),
            strict,
            max_paths,
        }
    }

    pub fn from_config(config: &HeattrailConfig) -> Self {
        Self::new(
            config.heat_map_path(),
            config.storage.strict_load,
            config.heat.max_paths,
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Read the document.
    ///
    /// A missing document is an empty map. An unreadable or corrupt one is an empty
    /// map in lenient mode (logged at `warn`) and a storage error in strict mode.
    pub fn load(&self) -> EngineResult<HeatMap> {
        if !self.path.exists() {
            return Ok(HeatMap::default());
        }

        let parsed = std::fs::read_to_string(&self.path)
            .map_err(|e| EngineError::storage("read heat map", e))
            .and_then(|contents| {
                serde_json::from_str::<HeatMap>(&contents)
                    .map_err(|e| EngineError::storage("parse heat map", e))
            });

        match parsed {
            Ok(map) => Ok(map),
            Err(err) if self.strict => Err(err),
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "heat map unreadable, starting from an empty map"
                );
                Ok(HeatMap::default())
            }
        }
    }

    /// Overwrite the whole document.
    pub fn save(&mut self, map: &HeatMap) -> EngineResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| EngineError::storage("create storage directory", e))?;
        }

        let json = serde_json::to_vec_pretty(map)?;
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json)
            .map_err(|e| EngineError::storage("write heat map", e))?;
        std::fs::rename(&tmp_path, &self.path)
            .map_err(|e| EngineError::storage("replace heat map", e))?;

        tracing::debug!(
            path = %self.path.display(),
            nodes = map.nodes.len(),
            edges = map.edges.len(),
            paths = map.paths.len(),
            "heat map saved"
        );
        Ok(())
    }

    /// Load, apply `mutate`, save.
    pub fn update<R>(&mut self, mutate: impl FnOnce(&mut HeatMap) -> R) -> EngineResult<R> {
        let mut map = self.load()?;
        let result = mutate(&mut map);
        self.save(&map)?;
        Ok(result)
    }

    /// Warm the node for `id`. Returns its new heat.
    pub fn upsert_node(&mut self, id: &str, increment: f64) -> EngineResult<f64> {
        let now = Utc::now();
        self.update(|map| map.warm_node(id, increment, now))
    }

    /// Warm the edge `from → to`. Returns its new heat.
    pub fn upsert_edge(&mut self, from: &str, to: &str, increment: f64) -> EngineResult<f64> {
        let now = Utc::now();
        self.update(|map| map.warm_edge(from, to, increment, now))
    }

    /// Append a finished path, keeping only the most recent `max_paths`.
    /// Returns how many old records were evicted.
    pub fn append_path(&mut self, record: KnowledgePath) -> EngineResult<usize> {
        let max_paths = self.max_paths;
        let evicted = self.update(|map| map.push_path(record, max_paths))?;
        if evicted > 0 {
            tracing::debug!(evicted, max_paths, "evicted oldest knowledge paths");
        }
        Ok(evicted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir, strict: bool) -> HeatStore {
        HeatStore::new(dir.path().join("heat-map.json"), strict, 1000)
    }

    #[test]
    fn missing_document_loads_empty() {
        let dir = TempDir::new().unwrap();
        let map = store_in(&dir, true).load().unwrap();
        assert!(map.paths.is_empty());
        assert!(map.nodes.is_empty());
        assert!(map.edges.is_empty());
    }

    #[test]
    fn corrupt_document_is_tolerated_when_lenient() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("heat-map.json"), "{ not json").unwrap();

        let map = store_in(&dir, false).load().unwrap();
        assert!(map.nodes.is_empty());
    }

    #[test]
    fn corrupt_document_fails_when_strict() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("heat-map.json"), "{ not json").unwrap();

        let err = store_in(&dir, true).load().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Storage);
    }

    #[test]
    fn upsert_node_persists_between_calls() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir, true);

        store.upsert_node("notes/a.md", 0.1).unwrap();
        let heat = store.upsert_node("notes/a.md", 0.1).unwrap();
        assert!((heat - 0.2).abs() < 1e-9);

        let map = store.load().unwrap();
        assert_eq!(map.nodes["notes/a.md"].access_count, 2);
    }

    #[test]
    fn save_leaves_no_temp_file_behind() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir, true);
        store.upsert_edge("a", "b", 0.1).unwrap();

        assert!(dir.path().join("heat-map.json").exists());
        assert!(!dir.path().join("heat-map.json.tmp").exists());
    }

    #[test]
    fn save_creates_missing_root() {
        let dir = TempDir::new().unwrap();
        let mut store = HeatStore::new(dir.path().join("nested/root/heat-map.json"), true, 10);
        store.upsert_node("x", 0.1).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn save_into_unwritable_location_is_a_storage_error() {
        let dir = TempDir::new().unwrap();
        // A regular file where the parent directory should be.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let mut store = HeatStore::new(blocker.join("heat-map.json"), false, 10);

        let err = store.upsert_node("x", 0.1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Storage);
    }
}
