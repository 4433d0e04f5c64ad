//! Note-access adapter.
//!
//! Hosts that only know "a note was created/read/updated/deleted/listed" report
//! `(action, path)` pairs here. Each pair becomes one step of the live session. If
//! none is live, the newest unended session document is resumed, and failing that
//! a `brain-navigation` session is started. Short-lived callers (one process per
//! access) therefore keep extending one session until [`end_note_session`].

use serde::Serialize;

use crate::engine::Engine;
use crate::error::{EngineError, EngineResult};
use crate::session::{EndSummary, InteractionType, StepReceipt};

/// Intent given to sessions the adapter starts on its own.
pub const AUTO_SESSION_INTENT: &str = "brain-navigation";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteAction {
    Create,
    Read,
    Update,
    Delete,
    List,
}

impl NoteAction {
    pub fn interaction_type(&self) -> InteractionType {
        match self {
            Self::Create => InteractionType::Create,
            Self::Read | Self::Update | Self::Delete => InteractionType::Note,
            Self::List => InteractionType::Search,
        }
    }
}

impl std::str::FromStr for NoteAction {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Self::Create),
            "read" => Ok(Self::Read),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            "list" => Ok(Self::List),
            _ => Err(EngineError::Validation(format!(
                "unknown action: {s} (expected create, read, update, delete or list)"
            ))),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AccessReceipt {
    pub action: NoteAction,
    pub interaction: InteractionType,
    /// `true` when this call had to start the session.
    pub auto_started: bool,
    /// `true` when an unended session from an earlier process was picked up.
    pub resumed: bool,
    pub step: StepReceipt,
}

/// Record one note access against the live session, starting one if needed.
pub fn record_note_access(
    engine: &mut Engine,
    action: Option<&str>,
    path: Option<&str>,
) -> EngineResult<AccessReceipt> {
    let action: NoteAction = action
        .filter(|a| !a.trim().is_empty())
        .ok_or_else(|| EngineError::Validation("action is required".into()))?
        .trim()
        .parse()?;
    let path = path
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| EngineError::Validation("path is required".into()))?;

    let (handle, auto_started, resumed) = match engine.active_session() {
        Some(handle) => (handle, false, false),
        None => match engine.resume_session()? {
            Some(handle) => (handle, false, true),
            None => (engine.start_tracking(AUTO_SESSION_INTENT)?, true, false),
        },
    };

    let interaction = action.interaction_type();
    let step = engine.record_step(&handle, path, interaction)?;

    Ok(AccessReceipt {
        action,
        interaction,
        auto_started,
        resumed,
        step,
    })
}

/// End the live (or newest resumable) session with `success`.
pub fn end_note_session(engine: &mut Engine, success: f64) -> EngineResult<EndSummary> {
    let handle = match engine.active_session() {
        Some(handle) => handle,
        None => engine
            .resume_session()?
            .ok_or_else(EngineError::no_active_session)?,
    };
    engine.end_tracking(&handle, success)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_table_matches_interaction_types() {
        let table = [
            ("create", InteractionType::Create),
            ("read", InteractionType::Note),
            ("update", InteractionType::Note),
            ("delete", InteractionType::Note),
            ("list", InteractionType::Search),
        ];
        for (action, expected) in table {
            let parsed: NoteAction = action.parse().unwrap();
            assert_eq!(parsed.interaction_type(), expected, "action {action}");
        }
    }

    #[test]
    fn unknown_action_is_rejected() {
        assert!("rename".parse::<NoteAction>().is_err());
    }
}
