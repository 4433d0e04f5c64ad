//! MCP `record_step` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `record_step` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct RecordStepParams {
    /// Resource identifier that was visited.
    #[schemars(description = "Identifier of the visited resource (e.g. a note path)")]
    pub path: String,

    /// How the resource was reached: `"note"`, `"search"`, `"link"`, `"create"`.
    #[schemars(description = "Interaction type: 'note', 'search', 'link' or 'create'")]
    pub r#type: String,

    #[schemars(
        description = "Session id returned by start_tracking. Defaults to the active session."
    )]
    pub session_id: Option<String>,
}
