use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct EndTrackingParams {
    #[schemars(description = "How well the session achieved its intent, 0.0-1.0")]
    pub success: f64,

    #[schemars(
        description = "Session id returned by start_tracking. Defaults to the active session."
    )]
    pub session_id: Option<String>,
}
