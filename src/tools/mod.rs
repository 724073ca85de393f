//! Tool stubs available to agents
//!
//! A tool describes its parameters as a JSON schema and is executed only
//! after the parameters validate against it. The built-in tools simulate
//! side effects: they log what they would do and echo a result.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, Instrument};

pub mod builtin;

/// Tool interface
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name, description and parameter schema
    fn describe(&self) -> ToolDescription;

    /// Run with parameters that have already passed schema validation
    async fn execute(&self, parameters: &Value) -> Result<Value, ToolError>;
}

#[derive(Debug, Clone)]
pub struct ToolDescription {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Registry of tools, keyed by name
pub struct ToolSystem {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolSystem {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// A tool system holding every built-in stub
    pub fn with_builtins() -> Self {
        let mut system = Self::new();
        system.register(Box::new(builtin::ActivityLogTool::new()));
        system.register(Box::new(builtin::SaveFileTool::new()));
        system
    }

    /// Add a tool, replacing any tool with the same name
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.describe().name;
        self.tools.insert(name, tool);
    }

    /// Get tool description
    pub fn describe_tool(&self, tool_name: &str) -> Option<ToolDescription> {
        self.tools.get(tool_name).map(|tool| tool.describe())
    }

    /// Execute tool with validated parameters
    pub async fn execute_tool(
        &self,
        tool_name: &str,
        parameters: &Value,
    ) -> Result<Value, ToolError> {
        let tool = self
            .tools
            .get(tool_name)
            .ok_or_else(|| ToolError::UnknownTool(tool_name.to_string()))?;

        Self::validate_parameters(&tool.describe(), parameters)?;

        let span = crate::tool_span!(tool = %tool_name);
        let result = tool.execute(parameters).instrument(span).await;
        debug!(tool = %tool_name, ok = result.is_ok(), "Tool executed");
        result
    }

    fn validate_parameters(
        description: &ToolDescription,
        parameters: &Value,
    ) -> Result<(), ToolError> {
        let validator = jsonschema::validator_for(&description.parameters)
            .map_err(|e| ToolError::SchemaError(format!("Schema compilation error: {e}")))?;

        validator.validate(parameters).map_err(|errors| {
            let error_messages: Vec<String> = errors
                .map(|e| format!("At '{}': {}", e.instance_path, e))
                .collect();
            ToolError::ValidationError(error_messages.join("; "))
        })
    }

    /// Names of registered tools, sorted
    pub fn list_tools(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for ToolSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Parameter validation failed: {0}")]
    ValidationError(String),
    #[error("Schema error: {0}")]
    SchemaError(String),
    #[error("Tool execution failed: {0}")]
    ExecutionError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct UppercaseTool;

    #[async_trait]
    impl Tool for UppercaseTool {
        fn describe(&self) -> ToolDescription {
            ToolDescription {
                name: "uppercase".to_string(),
                description: "Uppercases text".to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": { "text": { "type": "string" } },
                    "required": ["text"],
                    "additionalProperties": false
                }),
            }
        }

        async fn execute(&self, parameters: &Value) -> Result<Value, ToolError> {
            let text = parameters["text"].as_str().unwrap_or_default();
            Ok(json!({ "text": text.to_uppercase() }))
        }
    }

    #[tokio::test]
    async fn test_tool_system_creation() {
        let tool_system = ToolSystem::new();
        assert!(tool_system.list_tools().is_empty());
    }

    #[tokio::test]
    async fn test_builtins_registered() {
        let tool_system = ToolSystem::with_builtins();
        assert_eq!(tool_system.list_tools(), vec!["log_activity", "save_file"]);
    }

    #[tokio::test]
    async fn test_register_and_execute() {
        let mut tool_system = ToolSystem::new();
        tool_system.register(Box::new(UppercaseTool));

        let result = tool_system
            .execute_tool("uppercase", &json!({ "text": "flag" }))
            .await
            .unwrap();
        assert_eq!(result, json!({ "text": "FLAG" }));
    }

    #[tokio::test]
    async fn test_tool_execution_unknown_tool() {
        let tool_system = ToolSystem::new();
        let result = tool_system.execute_tool("nonexistent", &json!({})).await;
        assert!(matches!(result, Err(ToolError::UnknownTool(_))));
    }

    #[tokio::test]
    async fn test_parameters_validated_before_execution() {
        let mut tool_system = ToolSystem::new();
        tool_system.register(Box::new(UppercaseTool));

        let result = tool_system
            .execute_tool("uppercase", &json!({ "text": 42 }))
            .await;
        match result {
            Err(ToolError::ValidationError(message)) => assert!(message.contains("/text")),
            other => panic!("expected validation error, got {other:?}"),
        }

        let result = tool_system
            .execute_tool("uppercase", &json!({ "text": "a", "extra": true }))
            .await;
        assert!(matches!(result, Err(ToolError::ValidationError(_))));
    }

    #[test]
    fn test_describe_tool() {
        let tool_system = ToolSystem::with_builtins();
        let description = tool_system.describe_tool("save_file").unwrap();
        assert_eq!(description.name, "save_file");
        assert!(tool_system.describe_tool("missing").is_none());
    }
}
