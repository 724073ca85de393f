//! Activity log stub

use crate::tools::{Tool, ToolDescription, ToolError};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use tracing::info;

/// Records what an agent is about to do. Returns a mock log id.
pub struct ActivityLogTool;

impl Default for ActivityLogTool {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityLogTool {
    pub fn new() -> Self {
        Self
    }

    /// `<agent>_log_<unix millis>`
    fn log_id(agent: &str, millis: i64) -> String {
        format!("{agent}_log_{millis}")
    }
}

#[async_trait]
impl Tool for ActivityLogTool {
    fn describe(&self) -> ToolDescription {
        ToolDescription {
            name: "log_activity".to_string(),
            description: "Record a summary of an agent task and the intended approach".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "agent": { "type": "string", "pattern": "^[a-z0-9_]+$" },
                    "activitySummary": { "type": "string", "minLength": 1 },
                    "details": { "type": "string" }
                },
                "required": ["agent", "activitySummary"],
                "additionalProperties": false
            }),
        }
    }

    async fn execute(&self, parameters: &Value) -> Result<Value, ToolError> {
        let agent = parameters["agent"]
            .as_str()
            .ok_or_else(|| ToolError::ExecutionError("agent must be a string".to_string()))?;
        let summary = parameters["activitySummary"].as_str().unwrap_or_default();
        let details = parameters["details"].as_str().unwrap_or_default();

        let log_id = Self::log_id(agent, Utc::now().timestamp_millis());
        info!(agent, log_id = %log_id, summary, details_len = details.len(), "Activity logged");

        Ok(json!({
            "status": "Log successfully recorded (simulated).",
            "logId": log_id
        }))
    }
}
