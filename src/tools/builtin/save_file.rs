//! File save stub
//!
//! Reports the path a file would be stored at under `agent_storage/`
//! without writing anything. The schema restricts names to a single path
//! component so the reported path can never escape the agent's directory.

use crate::tools::{Tool, ToolDescription, ToolError};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;

pub const STORAGE_ROOT: &str = "agent_storage";

pub struct SaveFileTool;

impl Default for SaveFileTool {
    fn default() -> Self {
        Self::new()
    }
}

impl SaveFileTool {
    pub fn new() -> Self {
        Self
    }

    fn storage_path(agent: &str, file_name: &str) -> String {
        format!("{STORAGE_ROOT}/{agent}/{file_name}")
    }
}

#[async_trait]
impl Tool for SaveFileTool {
    fn describe(&self) -> ToolDescription {
        ToolDescription {
            name: "save_file".to_string(),
            description: "Save generated content to the agent's storage area (simulated)"
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "agent": { "type": "string", "pattern": "^[a-z0-9_]+$" },
                    "fileName": {
                        "type": "string",
                        "pattern": "^[A-Za-z0-9_-][A-Za-z0-9._-]*$",
                        "maxLength": 128
                    },
                    "content": { "type": "string" }
                },
                "required": ["agent", "fileName", "content"],
                "additionalProperties": false
            }),
        }
    }

    async fn execute(&self, parameters: &Value) -> Result<Value, ToolError> {
        let (Some(agent), Some(file_name)) = (
            parameters["agent"].as_str(),
            parameters["fileName"].as_str(),
        ) else {
            return Err(ToolError::ExecutionError(
                "agent and fileName must be strings".to_string(),
            ));
        };
        let content_len = parameters["content"].as_str().map_or(0, str::len);

        let file_path = Self::storage_path(agent, file_name);
        info!(agent, file_path = %file_path, bytes = content_len, "File saved (simulated)");

        Ok(json!({
            "status": format!("File \"{file_name}\" saved successfully (simulated)."),
            "filePath": file_path
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolSystem;

    #[tokio::test]
    async fn test_execute_reports_storage_path() {
        let tool = SaveFileTool::new();
        let result = tool
            .execute(&json!({
                "agent": "programmer",
                "fileName": "solution.py",
                "content": "print('hi')"
            }))
            .await
            .unwrap();

        assert_eq!(result["filePath"], "agent_storage/programmer/solution.py");
        assert_eq!(
            result["status"],
            "File \"solution.py\" saved successfully (simulated)."
        );
    }

    #[tokio::test]
    async fn test_path_traversal_rejected_by_schema() {
        let tools = ToolSystem::with_builtins();
        for file_name in ["../etc/passwd", "a/b.txt", ".hidden", ""] {
            let result = tools
                .execute_tool(
                    "save_file",
                    &json!({ "agent": "programmer", "fileName": file_name, "content": "" }),
                )
                .await;
            assert!(result.is_err(), "accepted {file_name:?}");
        }
    }
}
