//! Single-prompt agent
//!
//! Parses the task into prompt fields, renders the template, asks the LLM
//! for JSON matching `O`'s schema and validates what comes back.

use crate::agents::input::{InputShape, PromptFields};
use crate::agents::response::extract_json;
use crate::agents::schema::{AgentOutput, AgentSchema};
use crate::agents::template::PromptTemplate;
use crate::agents::{AgentDescriptor, AgentHandler, LlmSettings};
use crate::error::{HubError, HubResult};
use crate::llm::provider::{
    CompletionRequest, JsonSchemaDefinition, LlmProvider, Message, ResponseFormat,
};
use async_trait::async_trait;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Builds an acknowledgement when the LLM returns no content
pub type FallbackFn<O> = fn(&PromptFields) -> O;

pub struct PromptAgent<O: AgentSchema> {
    descriptor: AgentDescriptor,
    shape: InputShape,
    template: PromptTemplate,
    llm: Arc<dyn LlmProvider>,
    settings: LlmSettings,
    fallback: Option<FallbackFn<O>>,
    _output: PhantomData<fn() -> O>,
}

impl<O: AgentSchema> PromptAgent<O> {
    pub fn new(
        descriptor: AgentDescriptor,
        shape: InputShape,
        template: PromptTemplate,
        llm: Arc<dyn LlmProvider>,
        settings: LlmSettings,
    ) -> Self {
        Self {
            descriptor,
            shape,
            template,
            llm,
            settings,
            fallback: None,
            _output: PhantomData,
        }
    }

    pub fn with_fallback(mut self, fallback: FallbackFn<O>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }

    pub fn shape(&self) -> &InputShape {
        &self.shape
    }

    /// Validate `task` and split it into prompt fields. Never touches the LLM.
    pub fn parse_input(&self, task: &str) -> HubResult<PromptFields> {
        self.shape.parse(task, &self.descriptor.usage())
    }

    /// Render, call the LLM once and validate its answer
    pub async fn complete(&self, fields: &PromptFields) -> HubResult<O> {
        let schema = <O as AgentSchema>::json_schema();
        let prompt = self.template.render(fields);

        let mut request = CompletionRequest::new(
            self.settings.model.clone(),
            vec![
                Message::system(format!(
                    "You are the {} of an AI agents hub. Respond only with a JSON object that \
                     matches the `{}` schema. Do not add commentary outside the JSON.",
                    self.descriptor.name,
                    O::NAME
                )),
                Message::user(prompt),
            ],
        );
        request.temperature = self.settings.temperature;
        request.max_tokens = self.settings.max_tokens;
        request.response_format = Some(ResponseFormat::JsonSchema {
            json_schema: JsonSchemaDefinition {
                name: O::NAME.to_string(),
                strict: Some(false),
                schema: schema.clone(),
            },
        });
        request
            .metadata
            .insert("agent".to_string(), self.descriptor.id.clone());

        debug!(
            agent = %self.descriptor.tag,
            provider = self.llm.name(),
            model = %self.settings.model,
            "Sending completion request"
        );
        let response = self.llm.complete(request).await?;

        let content = response
            .content
            .filter(|text| !text.trim().is_empty());
        let Some(content) = content else {
            return match self.fallback {
                Some(fallback) => {
                    warn!(agent = %self.descriptor.tag, "LLM returned no content, using acknowledgement");
                    Ok(fallback(fields))
                }
                None => Err(HubError::invalid_output("the model returned no content")),
            };
        };

        let output = parse_output::<O>(&content, &schema)?;
        info!(agent = %self.descriptor.tag, tokens = response.usage.total_tokens, "Agent answered");
        Ok(output)
    }

    pub async fn run(&self, task: &str) -> HubResult<O> {
        let fields = self.parse_input(task)?;
        self.complete(&fields).await
    }
}

/// Extract, validate and deserialize an LLM answer
pub fn parse_output<O: AgentSchema>(content: &str, schema: &Value) -> HubResult<O> {
    let value = extract_json(content)
        .ok_or_else(|| HubError::invalid_output("response did not contain a JSON object"))?;

    let validator = jsonschema::validator_for(schema)
        .map_err(|e| HubError::internal(format!("Schema compilation error: {e}")))?;
    validator.validate(&value).map_err(|errors| {
        let error_messages: Vec<String> = errors
            .map(|e| format!("At '{}': {}", e.instance_path, e))
            .collect();
        HubError::invalid_output(error_messages.join("; "))
    })?;

    serde_json::from_value(value).map_err(|e| HubError::invalid_output(e.to_string()))
}

#[async_trait]
impl<O: AgentSchema> AgentHandler for PromptAgent<O> {
    fn descriptor(&self) -> &AgentDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, task: &str) -> HubResult<AgentOutput> {
        self.run(task).await.map(Into::into)
    }
}
