use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SyncWithBrainParams {
    #[schemars(
        description = "Sync direction: 'brain-to-mercury', 'mercury-to-brain' or 'bidirectional'"
    )]
    pub direction: String,
}
