//! MCP `start_tracking` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `start_tracking` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct StartTrackingParams {
    /// Free-text goal of the navigation session.
    #[schemars(description = "What you are trying to accomplish in this session (free text)")]
    pub intent: String,
}
