//! Navigation session lifecycle.
//!
//! [`SessionTracker`] is a two-state machine (idle / active) owning at most one live
//! [`Session`]. Starting returns a [`SessionHandle`] that every later step and the
//! final [`end_tracking`](SessionTracker::end_tracking) must present; a handle
//! whose session has ended is rejected forever.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::PathBuf;

use crate::error::{EngineError, EngineResult};
use crate::heat::types::{KnowledgePath, PathMetadata};
use crate::heat::HeatStore;

/// Hex characters kept from the session id hash.
const SESSION_ID_LEN: usize = 12;

/// Heat a freshly recorded path starts with.
const INITIAL_PATH_HEAT: f64 = 1.0;

/// How a resource was reached during a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionType {
    Note,
    Search,
    Link,
    Create,
}

impl InteractionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Search => "search",
            Self::Link => "link",
            Self::Create => "create",
        }
    }
}

impl std::fmt::Display for InteractionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InteractionType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "note" => Ok(Self::Note),
            "search" => Ok(Self::Search),
            "link" => Ok(Self::Link),
            "create" => Ok(Self::Create),
            _ => Err(EngineError::Validation(format!(
                "unknown interaction type: {s} (expected note, search, link or create)"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    #[serde(rename = "type")]
    pub kind: InteractionType,
    pub path: String,
    pub timestamp: DateTime<Utc>,
}

/// A navigation episode. Persisted to `sessions/<id>.json` as it grows and kept
/// there after it ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub intent: String,
    pub start_time: DateTime<Utc>,
    pub paths: Vec<String>,
    pub interactions: Vec<Interaction>,
    /// Set when the session is ended; such documents are never resumed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

/// Proof of a started session, required by every later call on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionHandle(String);

impl SessionHandle {
    /// Wrap an id received from a caller. Validity is checked on use.
    pub fn from_id(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Acknowledgement of a recorded step.
#[derive(Debug, Serialize)]
pub struct StepReceipt {
    pub session_id: String,
    pub step: usize,
    pub node_heat: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge_heat: Option<f64>,
}

/// Result of ending a session.
#[derive(Debug, Serialize)]
pub struct EndSummary {
    pub session_id: String,
    pub path_id: String,
    pub path_length: usize,
    pub duration_ms: i64,
    pub heat_updated: bool,
}

/// `sha256("<nanos>:<uuid v7>")`, hex, truncated.
pub fn generate_session_id() -> String {
    let timestamp = Utc::now().timestamp_nanos_opt().unwrap_or(0);
    let input = format!("{timestamp}:{}", uuid::Uuid::now_v7());

    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let full_hex = hex::encode(hasher.finalize());
    full_hex[..SESSION_ID_LEN].to_string()
}

pub struct SessionTracker {
    sessions_dir: Option<PathBuf>,
    step_increment: f64,
    active: Option<Session>,
}

impl SessionTracker {
    /// `sessions_dir = None` keeps sessions in memory only.
    pub fn new(sessions_dir: Option<PathBuf>, step_increment: f64) -> Self {
        Self {
            sessions_dir,
            step_increment,
            active: None,
        }
    }

    /// Handle of the live session, if any.
    pub fn active(&self) -> Option<SessionHandle> {
        self.active.as_ref().map(|s| SessionHandle(s.id.clone()))
    }

    pub fn current(&self) -> Option<&Session> {
        self.active.as_ref()
    }

    /// Idle → active. Fails if a session is already live instead of discarding it.
    ///
    /// The intent is free text and is stored exactly as supplied.
    pub fn start_tracking(&mut self, intent: &str) -> EngineResult<SessionHandle> {
        if let Some(live) = &self.active {
            return Err(EngineError::State(format!(
                "session {} is still active; end it before starting another",
                live.id
            )));
        }

        let session = Session {
            id: generate_session_id(),
            intent: intent.to_string(),
            start_time: Utc::now(),
            paths: Vec::new(),
            interactions: Vec::new(),
            ended_at: None,
        };
        self.persist(&session)?;

        tracing::info!(session = %session.id, intent = %session.intent, "tracking started");
        let handle = SessionHandle(session.id.clone());
        self.active = Some(session);
        Ok(handle)
    }

    /// Idle → active again, picking up the most recently started session document
    /// that was never ended. Returns `None` when there is nothing to resume.
    ///
    /// Unreadable documents are skipped.
    pub fn resume_latest(&mut self) -> EngineResult<Option<SessionHandle>> {
        if let Some(live) = &self.active {
            return Ok(Some(SessionHandle(live.id.clone())));
        }
        let Some(dir) = &self.sessions_dir else {
            return Ok(None);
        };
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(EngineError::storage("read sessions directory", e)),
        };

        let mut latest: Option<Session> = None;
        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let session = match std::fs::read(&path)
                .map_err(EngineError::from)
                .and_then(|bytes| Ok(serde_json::from_slice::<Session>(&bytes)?))
            {
                Ok(session) => session,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable session document");
                    continue;
                }
            };
            if session.ended_at.is_some() {
                continue;
            }
            if latest.as_ref().map_or(true, |l| session.start_time > l.start_time) {
                latest = Some(session);
            }
        }

        Ok(latest.map(|session| {
            tracing::info!(session = %session.id, steps = session.paths.len(), "tracking resumed");
            let handle = SessionHandle(session.id.clone());
            self.active = Some(session);
            handle
        }))
    }

    /// Append a step and warm its node (and the edge from the previous step).
    ///
    /// The step only counts once both the session document and the heat map are
    /// written; on any failure the live session is left as it was.
    pub fn record_step(
        &mut self,
        store: &mut HeatStore,
        handle: &SessionHandle,
        path: &str,
        kind: InteractionType,
    ) -> EngineResult<StepReceipt> {
        if path.trim().is_empty() {
            return Err(EngineError::Validation("path must not be empty".into()));
        }
        let increment = self.step_increment;
        let now = Utc::now();

        let current = self.live(handle)?.clone();
        let previous = current.paths.last().cloned();
        let mut next = current.clone();
        next.paths.push(path.to_string());
        next.interactions.push(Interaction {
            kind,
            path: path.to_string(),
            timestamp: now,
        });

        self.persist(&next)?;
        let warmed = store.update(|map| {
            let node_heat = map.warm_node(path, increment, now);
            let edge_heat = previous
                .as_deref()
                .map(|prev| map.warm_edge(prev, path, increment, now));
            (node_heat, edge_heat)
        });
        let (node_heat, edge_heat) = match warmed {
            Ok(heat) => heat,
            Err(e) => {
                if let Err(restore) = self.persist(&current) {
                    tracing::warn!(session = %current.id, error = %restore, "failed to restore session document");
                }
                return Err(e);
            }
        };

        let receipt = StepReceipt {
            session_id: next.id.clone(),
            step: next.paths.len(),
            node_heat,
            edge_heat,
        };
        self.active = Some(next);

        tracing::debug!(session = %handle, path, kind = %kind, step = receipt.step, "step recorded");
        Ok(receipt)
    }

    /// Active → idle, recording the session as a knowledge path.
    ///
    /// The session document is marked ended first; if that write fails the session
    /// stays live. Once it succeeds the tracker is idle, even if appending the path
    /// fails.
    pub fn end_tracking(
        &mut self,
        store: &mut HeatStore,
        handle: &SessionHandle,
        success: f64,
    ) -> EngineResult<EndSummary> {
        if !success.is_finite() {
            return Err(EngineError::Validation("success must be a finite number".into()));
        }
        let now = Utc::now();
        let mut ended = self.live(handle)?.clone();
        ended.ended_at = Some(now);
        self.persist(&ended)?;
        self.active = None;
        let session = ended;

        let duration_ms = (now - session.start_time).num_milliseconds();
        let record = KnowledgePath {
            id: uuid::Uuid::now_v7().to_string(),
            sequence: session.paths.clone(),
            intent: session.intent.clone(),
            timestamp: now,
            duration_ms,
            success,
            heat: INITIAL_PATH_HEAT,
            last_accessed: now,
            access_count: 1,
            metadata: PathMetadata {
                session_id: session.id.clone(),
                interaction_count: session.interactions.len(),
            },
        };
        let path_id = record.id.clone();
        store.append_path(record)?;

        tracing::info!(
            session = %session.id,
            path_length = session.paths.len(),
            duration_ms,
            success,
            "tracking ended"
        );

        Ok(EndSummary {
            session_id: session.id,
            path_id,
            path_length: session.paths.len(),
            duration_ms,
            heat_updated: true,
        })
    }

    fn live(&self, handle: &SessionHandle) -> EngineResult<&Session> {
        match self.active.as_ref() {
            Some(session) if session.id == handle.0 => Ok(session),
            Some(_) => Err(EngineError::State(format!(
                "session {handle} is not the active session"
            ))),
            None => Err(EngineError::no_active_session()),
        }
    }

    fn persist(&self, session: &Session) -> EngineResult<()> {
        let Some(dir) = &self.sessions_dir else {
            return Ok(());
        };
        std::fs::create_dir_all(dir)
            .map_err(|e| EngineError::storage("create sessions directory", e))?;
        let json = serde_json::to_vec_pretty(session)?;
        std::fs::write(dir.join(format!("{}.json", session.id)), json)
            .map_err(|e| EngineError::storage("write session document", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::TempDir;

    fn setup(dir: &TempDir) -> (SessionTracker, HeatStore) {
        let tracker = SessionTracker::new(Some(dir.path().join("sessions")), 0.1);
        let store = HeatStore::new(dir.path().join("heat-map.json"), true, 1000);
        (tracker, store)
    }

    #[test]
    fn session_ids_are_short_hex_and_distinct() {
        let a = generate_session_id();
        let b = generate_session_id();
        assert_eq!(a.len(), SESSION_ID_LEN);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn interaction_type_parses_known_values_only() {
        assert_eq!("link".parse::<InteractionType>().unwrap(), InteractionType::Link);
        let err = "teleport".parse::<InteractionType>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn start_while_active_is_rejected() {
        let dir = TempDir::new().unwrap();
        let (mut tracker, _) = setup(&dir);
        let first = tracker.start_tracking("write docs").unwrap();

        let err = tracker.start_tracking("something else").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
        assert_eq!(tracker.active(), Some(first));
    }

    #[test]
    fn steps_warm_nodes_and_edges() {
        let dir = TempDir::new().unwrap();
        let (mut tracker, mut store) = setup(&dir);
        let handle = tracker.start_tracking("trace heat").unwrap();

        let first = tracker
            .record_step(&mut store, &handle, "notes/a.md", InteractionType::Note)
            .unwrap();
        assert_eq!(first.step, 1);
        assert!(first.edge_heat.is_none());

        let second = tracker
            .record_step(&mut store, &handle, "notes/b.md", InteractionType::Link)
            .unwrap();
        assert_eq!(second.step, 2);
        assert!(second.edge_heat.is_some());

        let map = store.load().unwrap();
        assert_eq!(map.nodes.len(), 2);
        assert!(map.edges.contains_key("notes/a.md->notes/b.md"));
        assert_eq!(tracker.current().unwrap().interactions[1].kind, InteractionType::Link);
    }

    #[test]
    fn session_document_tracks_live_steps() {
        let dir = TempDir::new().unwrap();
        let (mut tracker, mut store) = setup(&dir);
        let handle = tracker.start_tracking("persist me").unwrap();
        tracker
            .record_step(&mut store, &handle, "notes/a.md", InteractionType::Search)
            .unwrap();

        let doc = dir.path().join("sessions").join(format!("{handle}.json"));
        let session: Session =
            serde_json::from_str(&std::fs::read_to_string(doc).unwrap()).unwrap();
        assert_eq!(session.paths, vec!["notes/a.md".to_string()]);
        assert_eq!(session.intent, "persist me");
    }

    #[test]
    fn end_appends_path_and_returns_to_idle() {
        let dir = TempDir::new().unwrap();
        let (mut tracker, mut store) = setup(&dir);
        let handle = tracker.start_tracking("implementation").unwrap();
        tracker
            .record_step(&mut store, &handle, "src/a.rs", InteractionType::Create)
            .unwrap();

        let summary = tracker.end_tracking(&mut store, &handle, 0.9).unwrap();
        assert_eq!(summary.session_id, handle.as_str());
        assert_eq!(summary.path_length, 1);
        assert!(summary.heat_updated);
        assert!(tracker.active().is_none());

        let map = store.load().unwrap();
        assert_eq!(map.paths.len(), 1);
        let path = &map.paths[0];
        assert_eq!(path.heat, 1.0);
        assert_eq!(path.access_count, 1);
        assert_eq!(path.metadata.session_id, handle.as_str());
    }

    #[test]
    fn ended_handle_is_never_accepted_again() {
        let dir = TempDir::new().unwrap();
        let (mut tracker, mut store) = setup(&dir);
        let old = tracker.start_tracking("first").unwrap();
        tracker.end_tracking(&mut store, &old, 0.5).unwrap();

        let err = tracker
            .record_step(&mut store, &old, "x", InteractionType::Note)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);

        let _new = tracker.start_tracking("second").unwrap();
        let err = tracker
            .record_step(&mut store, &old, "x", InteractionType::Note)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
        let err = tracker.end_tracking(&mut store, &old, 0.5).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
        assert!(tracker.active().is_some());
    }

    #[test]
    fn operations_without_session_are_state_errors() {
        let dir = TempDir::new().unwrap();
        let (mut tracker, mut store) = setup(&dir);
        let handle = SessionHandle::from_id("deadbeef0000");

        let err = tracker
            .record_step(&mut store, &handle, "x", InteractionType::Note)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
        let err = tracker.end_tracking(&mut store, &handle, 1.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
    }

    #[test]
    fn empty_path_and_nan_success_are_validation_errors() {
        let dir = TempDir::new().unwrap();
        let (mut tracker, mut store) = setup(&dir);
        let handle = tracker.start_tracking("validate").unwrap();

        let err = tracker
            .record_step(&mut store, &handle, "  ", InteractionType::Note)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        let err = tracker.end_tracking(&mut store, &handle, f64::NAN).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(tracker.active().is_some());
    }

    fn read_session(dir: &TempDir, handle: &SessionHandle) -> Session {
        let doc = dir.path().join("sessions").join(format!("{handle}.json"));
        serde_json::from_str(&std::fs::read_to_string(doc).unwrap()).unwrap()
    }

    #[test]
    fn intent_is_stored_as_supplied() {
        let dir = TempDir::new().unwrap();
        let (mut tracker, _) = setup(&dir);
        let handle = tracker.start_tracking("  Fix the Planner  ").unwrap();
        assert_eq!(tracker.current().unwrap().intent, "  Fix the Planner  ");
        assert_eq!(read_session(&dir, &handle).intent, "  Fix the Planner  ");
    }

    #[test]
    fn unwritable_session_document_rejects_step_without_warming() {
        let dir = TempDir::new().unwrap();
        let (mut tracker, mut store) = setup(&dir);
        let handle = tracker.start_tracking("blocked").unwrap();

        let sessions = dir.path().join("sessions");
        std::fs::remove_dir_all(&sessions).unwrap();
        std::fs::write(&sessions, "not a directory").unwrap();

        let err = tracker
            .record_step(&mut store, &handle, "notes/a.md", InteractionType::Note)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert!(store.load().unwrap().nodes.is_empty());
        assert!(tracker.current().unwrap().paths.is_empty());

        std::fs::remove_file(&sessions).unwrap();
        let retry = tracker
            .record_step(&mut store, &handle, "notes/a.md", InteractionType::Note)
            .unwrap();
        assert_eq!(retry.step, 1);
        assert!(retry.edge_heat.is_none());
        assert!((retry.node_heat - 0.1).abs() < 1e-9);
    }

    #[test]
    fn unwritable_heat_map_rejects_step_and_restores_document() {
        let dir = TempDir::new().unwrap();
        let mut tracker = SessionTracker::new(Some(dir.path().join("sessions")), 0.1);
        std::fs::write(dir.path().join("blocker"), "file").unwrap();
        let mut store = HeatStore::new(dir.path().join("blocker").join("heat-map.json"), false, 1000);
        let handle = tracker.start_tracking("blocked").unwrap();

        let err = tracker
            .record_step(&mut store, &handle, "notes/a.md", InteractionType::Note)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert!(tracker.current().unwrap().paths.is_empty());
        assert!(read_session(&dir, &handle).paths.is_empty());
    }

    #[test]
    fn failed_end_keeps_session_live() {
        let dir = TempDir::new().unwrap();
        let (mut tracker, mut store) = setup(&dir);
        let handle = tracker.start_tracking("blocked end").unwrap();

        let sessions = dir.path().join("sessions");
        std::fs::remove_dir_all(&sessions).unwrap();
        std::fs::write(&sessions, "not a directory").unwrap();

        let err = tracker.end_tracking(&mut store, &handle, 0.7).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert_eq!(tracker.active(), Some(handle));
        assert!(store.load().unwrap().paths.is_empty());
    }

    #[test]
    fn resume_picks_latest_unended_document() {
        let dir = TempDir::new().unwrap();
        let (mut first, mut store) = setup(&dir);
        let ended = first.start_tracking("done").unwrap();
        first.end_tracking(&mut store, &ended, 0.9).unwrap();
        assert!(read_session(&dir, &ended).ended_at.is_some());

        let open = first.start_tracking("still going").unwrap();
        first
            .record_step(&mut store, &open, "notes/a.md", InteractionType::Note)
            .unwrap();

        let (mut second, _) = setup(&dir);
        assert_eq!(second.resume_latest().unwrap(), Some(open.clone()));
        let receipt = second
            .record_step(&mut store, &open, "notes/b.md", InteractionType::Link)
            .unwrap();
        assert_eq!(receipt.step, 2);
        assert!(receipt.edge_heat.is_some());
    }

    #[test]
    fn resume_finds_nothing_when_all_sessions_ended() {
        let dir = TempDir::new().unwrap();
        let (mut tracker, mut store) = setup(&dir);
        assert_eq!(tracker.resume_latest().unwrap(), None);

        let handle = tracker.start_tracking("short").unwrap();
        tracker.end_tracking(&mut store, &handle, 0.4).unwrap();
        std::fs::write(dir.path().join("sessions").join("junk.json"), "{").unwrap();

        let (mut fresh, _) = setup(&dir);
        assert_eq!(fresh.resume_latest().unwrap(), None);
        assert!(fresh.active().is_none());
    }
}
