//! Agents and the handler contract
//!
//! An agent is a descriptor plus a handler. Every built-in agent is a
//! [`PromptAgent`] (one prompt template, one output schema) except the
//! programmer, which wraps a prompt agent with the activity/file tool stubs.

pub mod catalog;
pub mod input;
pub mod programmer;
pub mod prompt_agent;
pub mod prompts;
pub mod response;
pub mod schema;
pub mod template;

pub use catalog::builtin_agents;
pub use input::{InputShape, Marker, PromptFields};
pub use programmer::ProgrammerAgent;
pub use prompt_agent::PromptAgent;
pub use schema::{
    AgentOutput, AgentSchema, CritiqueReport, EducationReport, FlagAssessment, GeneralAnswer,
    PrioritizedVulnerability, ReconSummary, StrategicAdvice, TaskReport, TechniqueRecommendation,
    VulnerabilityPrioritization,
};
pub use template::PromptTemplate;

use crate::config::LlmSection;
use crate::error::HubResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Static description of an agent, shown in listings and error hints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDescriptor {
    /// Unique key (e.g. `reconAgent`)
    pub id: String,
    /// Display name
    pub name: String,
    /// Mention tag including the leading `@`
    pub tag: String,
    pub description: String,
    /// Expected input format, without the tag (e.g. `<Nmap scan output>`)
    pub input_hint: Option<String>,
}

impl AgentDescriptor {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        tag: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tag: tag.into(),
            description: description.into(),
            input_hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.input_hint = Some(hint.into());
        self
    }

    /// `@tag <hint>`, or just the tag when there is no hint
    pub fn usage(&self) -> String {
        match &self.input_hint {
            Some(hint) => format!("{} {}", self.tag, hint),
            None => self.tag.clone(),
        }
    }
}

/// A handler that turns a task string into an agent output
#[async_trait]
pub trait AgentHandler: Send + Sync {
    fn descriptor(&self) -> &AgentDescriptor;

    /// Run the task once. No retries; validation failures must be returned
    /// before any backend call is made.
    async fn invoke(&self, task: &str) -> HubResult<AgentOutput>;
}

/// Model parameters shared by every prompt agent
#[derive(Debug, Clone, PartialEq)]
pub struct LlmSettings {
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl From<&LlmSection> for LlmSettings {
    fn from(section: &LlmSection) -> Self {
        Self {
            model: section.model.clone(),
            temperature: section.temperature,
            max_tokens: section.max_tokens,
        }
    }
}
