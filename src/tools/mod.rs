pub mod analyze_intent;
pub mod end_tracking;
pub mod evolve_context;
pub mod get_heat_map;
pub mod record_step;
pub mod start_tracking;
pub mod sync_with_brain;

use analyze_intent::AnalyzeIntentParams;
use end_tracking::EndTrackingParams;
use evolve_context::EvolveContextParams;
use get_heat_map::GetHeatMapParams;
use record_step::RecordStepParams;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{tool, tool_handler, tool_router, ServerHandler};
use serde::Serialize;
use start_tracking::StartTrackingParams;
use std::sync::{Arc, Mutex};
use sync_with_brain::SyncWithBrainParams;

use crate::engine::Engine;
use crate::error::EngineResult;
use crate::session::InteractionType;

/// The heattrail MCP tool handler. Holds the shared engine and exposes every
/// operation via the `#[tool_router]` macro.
#[derive(Clone)]
pub struct HeattrailTools {
    tool_router: ToolRouter<Self>,
    engine: Arc<Mutex<Engine>>,
}

#[tool_router]
impl HeattrailTools {
    pub fn new(engine: Arc<Mutex<Engine>>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            engine,
        }
    }

    /// Begin recording a navigation session.
    #[tool(description = "Start tracking a navigation session for a stated intent. Returns the session id to pass to record_step and end_tracking.")]
    async fn start_tracking(
        &self,
        Parameters(params): Parameters<StartTrackingParams>,
    ) -> Result<String, String> {
        tracing::info!(intent = %params.intent, "start_tracking called");
        self.run("start_tracking", move |engine| {
            let handle = engine.start_tracking(&params.intent)?;
            Ok(serde_json::json!({ "session_id": handle.as_str() }))
        })
        .await
    }

    /// Record one visited resource in the active session.
    #[tool(description = "Record a visited resource in the active session. Warms the resource and the transition from the previous step in the heat map.")]
    async fn record_step(
        &self,
        Parameters(params): Parameters<RecordStepParams>,
    ) -> Result<String, String> {
        tracing::info!(path = %params.path, kind = %params.r#type, "record_step called");
        self.run("record_step", move |engine| {
            let kind: InteractionType = params.r#type.parse()?;
            let handle = engine.resolve_session(params.session_id.as_deref())?;
            engine.record_step(&handle, &params.path, kind)
        })
        .await
    }

    /// Finish the active session and store it as a knowledge path.
    #[tool(description = "End the active session with a success rating (0.0-1.0). The visited sequence is stored as a knowledge path for future recall.")]
    async fn end_tracking(
        &self,
        Parameters(params): Parameters<EndTrackingParams>,
    ) -> Result<String, String> {
        tracing::info!(success = params.success, "end_tracking called");
        self.run("end_tracking", move |engine| {
            let handle = engine.resolve_session(params.session_id.as_deref())?;
            engine.end_tracking(&handle, params.success)
        })
        .await
    }

    /// Classify free text into an intent category.
    #[tool(description = "Classify free text into an intent (debug, implementation, research, documentation, planning, general) with confidence, signals and alternatives.")]
    async fn analyze_intent(
        &self,
        Parameters(params): Parameters<AnalyzeIntentParams>,
    ) -> Result<String, String> {
        tracing::info!(input_len = params.input.len(), "analyze_intent called");
        self.run("analyze_intent", move |engine| engine.analyze_intent(&params.input))
            .await
    }

    /// Show the hottest resources and transitions.
    #[tool(description = "Get the hottest resources and transitions in the heat map, plus the number of recorded knowledge paths.")]
    async fn get_heat_map(
        &self,
        Parameters(params): Parameters<GetHeatMapParams>,
    ) -> Result<String, String> {
        tracing::info!(limit = ?params.limit, "get_heat_map called");
        self.run("get_heat_map", move |engine| engine.heat_map(params.limit))
            .await
    }

    /// Build a token-bounded loading plan for a new intent.
    #[tool(description = "Rank previously successful knowledge paths against a new intent and return a loading plan that fits the token budget.")]
    async fn evolve_context(
        &self,
        Parameters(params): Parameters<EvolveContextParams>,
    ) -> Result<String, String> {
        tracing::info!(intent = %params.intent, max_tokens = ?params.max_tokens, "evolve_context called");
        self.run("evolve_context", move |engine| {
            engine.evolve_context(&params.intent, params.max_tokens)
        })
        .await
    }

    /// Synchronize with the external notes store.
    #[tool(description = "Synchronize with the external notes store. Directions: brain-to-mercury, mercury-to-brain, bidirectional. Not implemented yet; reports what would run.")]
    async fn sync_with_brain(
        &self,
        Parameters(params): Parameters<SyncWithBrainParams>,
    ) -> Result<String, String> {
        tracing::info!(direction = %params.direction, "sync_with_brain called");
        self.run("sync_with_brain", move |engine| engine.sync(&params.direction))
            .await
    }
}

impl HeattrailTools {
    /// Run `op` against the engine on the blocking pool (file I/O) and render the
    /// result as JSON. Engine failures become `"<operation> failed: [<kind>] <message>"`.
    async fn run<T, F>(&self, operation: &'static str, op: F) -> Result<String, String>
    where
        T: Serialize + Send + 'static,
        F: FnOnce(&mut Engine) -> EngineResult<T> + Send + 'static,
    {
        let engine = Arc::clone(&self.engine);
        let result = tokio::task::spawn_blocking(move || {
            let mut engine = engine
                .lock()
                .map_err(|e| format!("engine lock poisoned: {e}"))?;
            op(&mut *engine).map_err(|e| format!("[{}] {e}", e.kind()))
        })
        .await
        .map_err(|e| format!("{operation} task failed: {e}"))?
        .map_err(|e| format!("{operation} failed: {e}"))?;

        serde_json::to_string(&result).map_err(|e| format!("serialization failed: {e}"))
    }
}

#[tool_handler]
impl ServerHandler for HeattrailTools {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            instructions: Some(
                "heattrail learns which navigation paths work. Call start_tracking with your \
                 goal, record_step for each resource you visit, end_tracking with a success \
                 rating, and evolve_context to get a loading plan for a new goal."
                    .into(),
            ),
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HeattrailConfig;
    use tempfile::TempDir;

    fn tools(dir: &TempDir) -> HeattrailTools {
        let mut config = HeattrailConfig::default();
        config.storage.root_dir = dir.path().to_string_lossy().into_owned();
        let engine = Engine::open(config).unwrap();
        HeattrailTools::new(Arc::new(Mutex::new(engine)))
    }

    #[tokio::test]
    async fn failures_are_rendered_with_operation_and_kind() {
        let dir = TempDir::new().unwrap();
        let tools = tools(&dir);
        let err = tools
            .run("record_step", |engine| {
                let handle = engine.resolve_session(None)?;
                engine.record_step(&handle, "notes/a.md", InteractionType::Note)
            })
            .await
            .unwrap_err();
        assert_eq!(err, "record_step failed: [state] no active session");
    }

    #[tokio::test]
    async fn results_are_json() {
        let dir = TempDir::new().unwrap();
        let tools = tools(&dir);
        let out = tools
            .run("get_heat_map", |engine| engine.heat_map(Some(3)))
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["total_paths"], 0);
    }
}
