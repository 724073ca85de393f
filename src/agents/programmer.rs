//! Programmer agent
//!
//! A prompt agent bracketed by the tool stubs: the task is logged before the
//! LLM call, and the first fenced code block of the answer is "saved". The
//! mock log id and file path are appended to the response.

use crate::agents::input::PromptFields;
use crate::agents::prompt_agent::PromptAgent;
use crate::agents::response::{first_code_block, CodeBlock};
use crate::agents::schema::{AgentOutput, TaskReport};
use crate::agents::{AgentDescriptor, AgentHandler};
use crate::error::{HubError, HubResult};
use crate::tools::ToolSystem;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

/// Storage directory name used with the tool stubs
const STORAGE_AGENT: &str = "programmer";

pub struct ProgrammerAgent {
    inner: PromptAgent<TaskReport>,
    tools: Arc<ToolSystem>,
}

impl ProgrammerAgent {
    pub fn new(inner: PromptAgent<TaskReport>, tools: Arc<ToolSystem>) -> Self {
        Self { inner, tools }
    }

    async fn log_activity(&self, fields: &PromptFields) -> HubResult<String> {
        let task = fields
            .get("taskDescription")
            .map(String::as_str)
            .unwrap_or_default();
        let result = self
            .tools
            .execute_tool(
                "log_activity",
                &json!({
                    "agent": STORAGE_AGENT,
                    "activitySummary": summarize(task),
                    "details": task,
                }),
            )
            .await?;

        result["logId"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| HubError::internal("log_activity returned no logId"))
    }

    async fn save_code(&self, block: &CodeBlock) -> HubResult<String> {
        let result = self
            .tools
            .execute_tool(
                "save_file",
                &json!({
                    "agent": STORAGE_AGENT,
                    "fileName": file_name_for(&block.language),
                    "content": block.code,
                }),
            )
            .await?;

        result["filePath"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| HubError::internal("save_file returned no filePath"))
    }
}

/// First line of the task, capped at 80 characters
fn summarize(task: &str) -> String {
    let first_line = task.lines().next().unwrap_or_default().trim();
    let mut summary: String = first_line.chars().take(80).collect();
    if first_line.chars().count() > 80 {
        summary.push_str("...");
    }
    if summary.is_empty() {
        summary.push_str("Programming task");
    }
    summary
}

/// File name for a fenced block's language tag
pub fn file_name_for(language: &str) -> String {
    let extension = match language {
        "python" | "py" => "py",
        "rust" | "rs" => return "main.rs".to_string(),
        "javascript" | "js" => "js",
        "typescript" | "ts" => "ts",
        "tsx" => return "component.tsx".to_string(),
        "go" | "golang" => "go",
        "c" => "c",
        "cpp" | "c++" => "cpp",
        "java" => return "Main.java".to_string(),
        "bash" | "sh" | "shell" => "sh",
        "powershell" | "ps1" => "ps1",
        "sql" => "sql",
        "html" => "html",
        _ => "txt",
    };
    format!("solution.{extension}")
}

#[async_trait]
impl AgentHandler for ProgrammerAgent {
    fn descriptor(&self) -> &AgentDescriptor {
        self.inner.descriptor()
    }

    async fn invoke(&self, task: &str) -> HubResult<AgentOutput> {
        let fields = self.inner.parse_input(task)?;

        let log_id = self.log_activity(&fields).await?;
        debug!(log_id = %log_id, "Programmer activity logged");

        let mut report = self.inner.complete(&fields).await?;

        if let Some(block) = first_code_block(&report.response) {
            match self.save_code(&block).await {
                Ok(path) => report
                    .response
                    .push_str(&format!("\n\nSaved as {path} (simulated).")),
                Err(e) => warn!(error = %e, "Could not save generated code"),
            }
        }
        report
            .response
            .push_str(&format!(" (Activity logged: {log_id})"));

        Ok(report.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_for_language() {
        assert_eq!(file_name_for("python"), "solution.py");
        assert_eq!(file_name_for("rust"), "main.rs");
        assert_eq!(file_name_for("tsx"), "component.tsx");
        assert_eq!(file_name_for(""), "solution.txt");
        assert_eq!(file_name_for("brainfuck"), "solution.txt");
    }

    #[test]
    fn test_summarize_uses_first_line() {
        assert_eq!(summarize("Write a port scanner\nin python"), "Write a port scanner");
        assert_eq!(summarize(""), "Programming task");

        let long = "x".repeat(100);
        let summary = summarize(&long);
        assert_eq!(summary.len(), 83);
        assert!(summary.ends_with("..."));
    }
}
