//! Mock implementations for testing
//!
//! Provides a mock LlmProvider and a mock AgentHandler so routing, agents and
//! the controller can be exercised without a hosted model.

use crate::agents::schema::{AgentOutput, GeneralAnswer};
use crate::agents::{AgentDescriptor, AgentHandler};
use crate::error::{HubError, HubResult};
use crate::llm::provider::{
    CompletionRequest, CompletionResponse, FinishReason, LlmError, LlmProvider, TokenUsage,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Mock LLM provider for testing
///
/// Responses are served in order and cycle once exhausted. Every request is
/// recorded so tests can assert on prompts and parameters.
#[derive(Debug, Default)]
pub struct MockLlmProvider {
    pub responses: Vec<String>,
    current_response: AtomicUsize,
    requests: Mutex<Vec<CompletionRequest>>,
    should_fail: bool,
    empty_content: bool,
    delay: Option<Duration>,
}

impl MockLlmProvider {
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses,
            ..Default::default()
        }
    }

    pub fn single_response(response: impl Into<String>) -> Self {
        Self::new(vec![response.into()])
    }

    /// Every call fails with a request error
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Every call succeeds with no content
    pub fn with_empty_content(mut self) -> Self {
        self.empty_content = true;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.requests()
            .last()
            .and_then(|request| request.messages.last().map(|m| m.content.clone()))
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.should_fail {
            return Err(LlmError::RequestFailed("Mock LLM failure".to_string()));
        }

        let content = if self.empty_content {
            None
        } else if self.responses.is_empty() {
            Some("Mock response".to_string())
        } else {
            let index = self.current_response.fetch_add(1, Ordering::SeqCst);
            Some(self.responses[index % self.responses.len()].clone())
        };

        Ok(CompletionResponse {
            content,
            model: "mock-model".to_string(),
            usage: TokenUsage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            },
            finish_reason: FinishReason::Stop,
            metadata: HashMap::new(),
        })
    }
}

/// Mock agent for testing
///
/// By default echoes its task back as a [`GeneralAnswer`].
#[derive(Debug)]
pub struct MockAgent {
    descriptor: AgentDescriptor,
    delay: Option<Duration>,
    should_fail: bool,
    require_input: bool,
    tasks: Mutex<Vec<String>>,
}

impl MockAgent {
    pub fn echo(id: impl Into<String>, tag: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            descriptor: AgentDescriptor::new(id.clone(), id, tag, "Mock agent"),
            delay: None,
            should_fail: false,
            require_input: false,
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// An agent whose every invocation is a backend failure
    pub fn failing(id: impl Into<String>, tag: impl Into<String>) -> Self {
        let mut agent = Self::echo(id, tag);
        agent.should_fail = true;
        agent
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.descriptor.name = name.into();
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.descriptor.input_hint = Some(hint.into());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Reject blank tasks the way real agents do
    pub fn requiring_input(mut self) -> Self {
        self.require_input = true;
        self
    }

    pub fn invocations(&self) -> usize {
        self.tasks.lock().map(|t| t.len()).unwrap_or(0)
    }

    pub fn tasks(&self) -> Vec<String> {
        self.tasks.lock().map(|t| t.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl AgentHandler for MockAgent {
    fn descriptor(&self) -> &AgentDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, task: &str) -> HubResult<AgentOutput> {
        if self.require_input && task.trim().is_empty() {
            return Err(HubError::missing_input(
                "Task",
                self.descriptor.usage(),
            ));
        }

        if let Ok(mut tasks) = self.tasks.lock() {
            tasks.push(task.to_string());
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.should_fail {
            return Err(LlmError::ApiError("Mock backend failure".to_string()).into());
        }

        Ok(AgentOutput::Answer(GeneralAnswer {
            answer: task.to_string(),
        }))
    }
}
