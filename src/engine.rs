//! The heat/relevance engine.
//!
//! [`Engine`] owns the [`HeatStore`] and the [`SessionTracker`], so every heat-map
//! mutation in a process flows through one `&mut Engine`. Transports share it
//! behind a single mutex.

use serde::Serialize;

use crate::config::HeattrailConfig;
use crate::error::{EngineError, EngineResult};
use crate::heat::maintenance::{apply_decay, DecayResult};
use crate::heat::stats::{heat_map_summary, HeatMapSummary};
use crate::heat::HeatStore;
use crate::intent::{analyze, IntentAnalysis};
use crate::planner::{LoadingPlan, LoadingPlanner};
use crate::relevance::rank;
use crate::session::{EndSummary, InteractionType, SessionHandle, SessionTracker, StepReceipt};
use crate::sync::{sync_with_brain, SyncDirection, SyncSummary};

/// Response from `evolve_context`.
#[derive(Debug, Serialize)]
pub struct EvolveResponse {
    pub analysis: IntentAnalysis,
    pub plan: LoadingPlan,
    /// Ranked paths considered before the budget was applied.
    pub candidates: usize,
    pub max_tokens: usize,
}

pub struct Engine {
    config: HeattrailConfig,
    store: HeatStore,
    tracker: SessionTracker,
    planner: LoadingPlanner,
}

impl Engine {
    /// Build an engine over the configured storage root.
    ///
    /// In strict mode the heat map is read once up front so corruption is reported
    /// at startup rather than on the first tool call.
    pub fn open(config: HeattrailConfig) -> EngineResult<Self> {
        let store = HeatStore::from_config(&config);
        if store.is_strict() {
            store.load()?;
        }
        let tracker = SessionTracker::new(Some(config.sessions_dir()), config.heat.step_increment);
        let planner = LoadingPlanner::from_config(&config.retrieval);

        tracing::info!(
            root = %config.resolved_root().display(),
            strict = store.is_strict(),
            "engine ready"
        );
        Ok(Self {
            config,
            store,
            tracker,
            planner,
        })
    }

    pub fn config(&self) -> &HeattrailConfig {
        &self.config
    }

    pub fn store(&self) -> &HeatStore {
        &self.store
    }

    pub fn active_session(&self) -> Option<SessionHandle> {
        self.tracker.active()
    }

    /// Turn an optional caller-supplied id into a handle; `None` means the live session.
    pub fn resolve_session(&self, session_id: Option<&str>) -> EngineResult<SessionHandle> {
        match session_id {
            Some(id) => Ok(SessionHandle::from_id(id)),
            None => self.tracker.active().ok_or_else(EngineError::no_active_session),
        }
    }

    pub fn start_tracking(&mut self, intent: &str) -> EngineResult<SessionHandle> {
        self.tracker.start_tracking(intent)
    }

    /// Make the newest unended session document live again, if there is one.
    pub fn resume_session(&mut self) -> EngineResult<Option<SessionHandle>> {
        self.tracker.resume_latest()
    }

    pub fn record_step(
        &mut self,
        handle: &SessionHandle,
        path: &str,
        kind: InteractionType,
    ) -> EngineResult<StepReceipt> {
        self.tracker.record_step(&mut self.store, handle, path, kind)
    }

    pub fn end_tracking(&mut self, handle: &SessionHandle, success: f64) -> EngineResult<EndSummary> {
        self.tracker.end_tracking(&mut self.store, handle, success)
    }

    /// Blank input is not an error; it classifies as `general`.
    pub fn analyze_intent(&self, input: &str) -> EngineResult<IntentAnalysis> {
        Ok(analyze(input))
    }

    pub fn heat_map(&self, limit: Option<usize>) -> EngineResult<HeatMapSummary> {
        let limit = limit.unwrap_or(self.config.retrieval.default_heat_limit);
        let map = self.store.load()?;
        Ok(heat_map_summary(&map, limit))
    }

    /// Classify `intent`, rank recorded paths against it and fit them into `max_tokens`.
    pub fn evolve_context(
        &self,
        intent: &str,
        max_tokens: Option<usize>,
    ) -> EngineResult<EvolveResponse> {
        let max_tokens = max_tokens.unwrap_or(self.config.retrieval.default_max_tokens);

        let analysis = analyze(intent);
        let map = self.store.load()?;
        let ranked = rank(&analysis, intent, &map);
        let plan = self.planner.plan(&ranked, max_tokens);

        tracing::info!(
            intent = %analysis.intent,
            candidates = ranked.len(),
            selected = plan.entries.len(),
            total_tokens = plan.total_tokens,
            max_tokens,
            "context evolved"
        );

        Ok(EvolveResponse {
            analysis,
            plan,
            candidates: ranked.len(),
            max_tokens,
        })
    }

    pub fn sync(&self, direction: &str) -> EngineResult<SyncSummary> {
        let direction: SyncDirection = direction.parse()?;
        Ok(sync_with_brain(direction))
    }

    /// Cool the whole heat map once and persist it.
    pub fn maintain(&mut self) -> EngineResult<DecayResult> {
        let config = self.config.maintenance.clone();
        self.store.update(|map| apply_decay(map, &config))
    }

    /// Replace the heat map with an empty one.
    pub fn reset(&mut self) -> EngineResult<()> {
        self.store.save(&Default::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::intent::IntentCategory;
    use tempfile::TempDir;

    fn engine(dir: &TempDir) -> Engine {
        let mut config = HeattrailConfig::default();
        config.storage.root_dir = dir.path().to_string_lossy().into_owned();
        Engine::open(config).unwrap()
    }

    #[test]
    fn resolve_session_defaults_to_live_one() {
        let dir = TempDir::new().unwrap();
        let mut engine = engine(&dir);
        let err = engine.resolve_session(None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);

        let handle = engine.start_tracking("read notes").unwrap();
        assert_eq!(engine.resolve_session(None).unwrap(), handle);
    }

    #[test]
    fn strict_open_rejects_corrupt_heat_map() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("heat-map.json"), "[]").unwrap();

        let mut config = HeattrailConfig::default();
        config.storage.root_dir = dir.path().to_string_lossy().into_owned();
        config.storage.strict_load = true;
        let err = Engine::open(config).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Storage);
    }

    #[test]
    fn blank_text_classifies_as_general() {
        let dir = TempDir::new().unwrap();
        let mut engine = engine(&dir);
        let analysis = engine.analyze_intent(" ").unwrap();
        assert_eq!(analysis.intent, IntentCategory::General);
        assert_eq!(analysis.confidence, 0.5);

        let response = engine.evolve_context("", None).unwrap();
        assert_eq!(response.analysis.intent, IntentCategory::General);
        assert!(response.plan.entries.is_empty());

        let handle = engine.start_tracking("").unwrap();
        engine.end_tracking(&handle, 0.5).unwrap();
        assert_eq!(engine.store().load().unwrap().paths[0].intent, "");
    }

    #[test]
    fn maintain_and_reset_touch_the_document() {
        let dir = TempDir::new().unwrap();
        let mut engine = engine(&dir);
        let handle = engine.start_tracking("warm up").unwrap();
        engine.record_step(&handle, "a", InteractionType::Note).unwrap();

        let result = engine.maintain().unwrap();
        assert_eq!(result.nodes_decayed, 1);

        engine.reset().unwrap();
        assert_eq!(engine.heat_map(None).unwrap().total_nodes, 0);
    }
}
