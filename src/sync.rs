//! Synchronization with the external notes store ("brain").
//!
//! Only the interface exists: every direction reports `not_implemented` and moves
//! nothing.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncDirection {
    BrainToMercury,
    MercuryToBrain,
    Bidirectional,
}

impl SyncDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BrainToMercury => "brain-to-mercury",
            Self::MercuryToBrain => "mercury-to-brain",
            Self::Bidirectional => "bidirectional",
        }
    }
}

impl std::fmt::Display for SyncDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SyncDirection {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "brain-to-mercury" => Ok(Self::BrainToMercury),
            "mercury-to-brain" => Ok(Self::MercuryToBrain),
            "bidirectional" => Ok(Self::Bidirectional),
            _ => Err(EngineError::UnknownOperation(format!(
                "unknown sync direction: {s}"
            ))),
        }
    }
}

/// Outcome of one leg of a sync.
#[derive(Debug, Serialize)]
pub struct SyncLeg {
    pub direction: SyncDirection,
    pub status: &'static str,
    pub items: usize,
}

#[derive(Debug, Serialize)]
pub struct SyncSummary {
    pub direction: SyncDirection,
    pub legs: Vec<SyncLeg>,
    pub message: String,
}

pub fn sync_with_brain(direction: SyncDirection) -> SyncSummary {
    let legs = match direction {
        SyncDirection::Bidirectional => vec![
            SyncDirection::BrainToMercury,
            SyncDirection::MercuryToBrain,
        ],
        single => vec![single],
    }
    .into_iter()
    .map(|direction| SyncLeg {
        direction,
        status: "not_implemented",
        items: 0,
    })
    .collect();

    tracing::info!(direction = %direction, "sync requested (not implemented)");
    SyncSummary {
        direction,
        legs,
        message: format!("sync {direction} is not implemented; nothing was transferred"),
    }
}
