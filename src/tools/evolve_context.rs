//! MCP `evolve_context` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `evolve_context` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct EvolveContextParams {
    /// What the caller is about to do; matched against recorded session intents.
    #[schemars(description = "What you are about to work on (free text)")]
    pub intent: String,

    /// Token budget for the loading plan. Defaults to 30000.
    #[schemars(description = "Token budget for the loading plan. Defaults to 30000.")]
    pub max_tokens: Option<usize>,
}
