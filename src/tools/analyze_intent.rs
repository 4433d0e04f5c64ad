use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AnalyzeIntentParams {
    #[schemars(description = "Free text describing what you want to do")]
    pub input: String,
}
