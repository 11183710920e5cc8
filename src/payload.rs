use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// NDJSON payload for a single batch upload into the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestPayload {
    pub dataset_id: String,
    pub records: Vec<Value>,
}

impl IngestPayload {
    pub fn new(dataset_id: impl Into<String>, records: Vec<Value>) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            records,
        }
    }

    /// Serializes the records as newline-delimited JSON: one compact object
    /// per line, no trailing newline. An empty record list yields an empty
    /// string.
    pub fn to_ndjson(&self) -> Result<String> {
        let lines = self
            .records
            .iter()
            .map(serde_json::to_string)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(lines.join("\n"))
    }
}
