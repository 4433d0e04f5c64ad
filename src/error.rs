//! Engine error taxonomy.
//!
//! Every failure the engine raises belongs to one [`ErrorKind`]. The tool layer
//! renders them as `"<operation> failed: [<kind>] <message>"`; nothing is retried.

use std::fmt;
use thiserror::Error;

/// Machine-checkable failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    State,
    Storage,
    UnknownOperation,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::State => "state",
            Self::Storage => "storage",
            Self::UnknownOperation => "unknown_operation",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum EngineError {
    /// A required argument is missing or malformed.
    #[error("{0}")]
    Validation(String),

    /// The operation needs a live session and there is none (or the handle is stale).
    #[error("{0}")]
    State(String),

    /// Writing to (or, in strict mode, reading from) the persistence layer failed.
    #[error("{0}")]
    Storage(String),

    /// Unrecognized sync direction, tool or adapter action.
    #[error("{0}")]
    UnknownOperation(String),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::State(_) => ErrorKind::State,
            Self::Storage(_) => ErrorKind::Storage,
            Self::UnknownOperation(_) => ErrorKind::UnknownOperation,
        }
    }

    pub fn no_active_session() -> Self {
        Self::State("no active session".into())
    }

    pub fn storage(operation: &str, error: impl fmt::Display) -> Self {
        Self::Storage(format!("failed to {operation}: {error}"))
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        Self::storage("write heat-map storage", err)
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        Self::storage("serialize document", err)
    }
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_from_variants() {
        assert_eq!(EngineError::no_active_session().kind(), ErrorKind::State);
        assert_eq!(
            EngineError::Validation("path must not be empty".into()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            EngineError::UnknownOperation("sideways".into()).kind().as_str(),
            "unknown_operation"
        );
    }

    #[test]
    fn io_errors_become_storage_errors() {
        let err: EngineError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into();
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert!(err.to_string().contains("read-only"));
    }
}
