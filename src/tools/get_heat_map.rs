//! MCP `get_heat_map` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `get_heat_map` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetHeatMapParams {
    /// Number of nodes to return; half as many edges are returned. Defaults to 10.
    #[schemars(description = "Number of hottest nodes to return (edges: half of this). Defaults to 10.")]
    pub limit: Option<usize>,
}
