//! Agent registry
//!
//! Maps mention tags to agent handlers. Built once at startup and shared
//! read-only behind an `Arc` afterwards, so lookups need no locking.

use crate::agents::{builtin_agents, AgentDescriptor, AgentHandler, LlmSettings};
use crate::llm::provider::LlmProvider;
use crate::routing::mention::is_valid_tag;
use crate::tools::ToolSystem;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Mention tag {0} is already registered")]
    DuplicateTag(String),
    #[error("Agent id {0} is already registered")]
    DuplicateId(String),
    #[error("Invalid mention tag {0:?}: expected @ followed by letters, digits or underscores")]
    InvalidTag(String),
}

/// Registered agents, keyed by mention tag
#[derive(Default)]
pub struct AgentRegistry {
    agents: HashMap<String, Arc<dyn AgentHandler>>,
    /// Tags in registration order
    order: Vec<String>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in catalog
    pub fn builtin(
        llm: Arc<dyn LlmProvider>,
        settings: LlmSettings,
        tools: Arc<ToolSystem>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for agent in builtin_agents(llm, settings, tools) {
            registry.register(agent)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, handler: Arc<dyn AgentHandler>) -> Result<(), RegistryError> {
        let descriptor = handler.descriptor();

        if !is_valid_tag(&descriptor.tag) {
            return Err(RegistryError::InvalidTag(descriptor.tag.clone()));
        }
        if self.agents.contains_key(&descriptor.tag) {
            return Err(RegistryError::DuplicateTag(descriptor.tag.clone()));
        }
        if self
            .agents
            .values()
            .any(|existing| existing.descriptor().id == descriptor.id)
        {
            return Err(RegistryError::DuplicateId(descriptor.id.clone()));
        }

        debug!(tag = %descriptor.tag, id = %descriptor.id, "Registered agent");
        let tag = descriptor.tag.clone();
        self.order.push(tag.clone());
        self.agents.insert(tag, handler);
        Ok(())
    }

    /// Exact, case-sensitive lookup by mention tag
    pub fn lookup(&self, tag: &str) -> Option<Arc<dyn AgentHandler>> {
        self.agents.get(tag).cloned()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.agents.contains_key(tag)
    }

    /// Descriptors in registration order
    pub fn agents(&self) -> Vec<&AgentDescriptor> {
        self.order
            .iter()
            .filter_map(|tag| self.agents.get(tag))
            .map(|handler| handler.descriptor())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
