//! Google Gemini backend (Generative Language API)
//!
//! Uses `models/{model}:generateContent`. Structured output is requested with
//! `responseMimeType = application/json` plus a `responseSchema`, which Gemini
//! only accepts as an OpenAPI subset, so JSON-Schema-only keywords are stripped
//! before sending.

use crate::llm::provider::{
    CompletionRequest, CompletionResponse, FinishReason, LlmError, LlmProvider, MessageRole,
    ResponseFormat, TokenUsage,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Keywords Gemini's schema subset rejects
const UNSUPPORTED_SCHEMA_FIELDS: &[&str] = &[
    "$schema",
    "title",
    "definitions",
    "default",
    "additionalProperties",
];

/// Gemini provider configuration
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Gemini provider implementation
pub struct GeminiProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiProvider {
    pub fn new(config: GeminiConfig) -> Result<Self, LlmError> {
        if config.api_key.is_empty() {
            return Err(LlmError::NotConfigured(
                "Gemini API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::NetworkError(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn build_request(request: &CompletionRequest) -> GenerateContentRequest {
        let mut system_parts = Vec::new();
        let mut contents = Vec::new();

        for message in &request.messages {
            let part = Part {
                text: message.content.clone(),
            };
            match message.role {
                MessageRole::System => system_parts.push(part),
                MessageRole::User => contents.push(Content {
                    role: Some("user".to_string()),
                    parts: vec![part],
                }),
                MessageRole::Assistant => contents.push(Content {
                    role: Some("model".to_string()),
                    parts: vec![part],
                }),
            }
        }

        let (response_mime_type, response_schema) = match &request.response_format {
            Some(ResponseFormat::Json) => (Some("application/json".to_string()), None),
            Some(ResponseFormat::JsonSchema { json_schema }) => {
                let mut schema = json_schema.schema.clone();
                strip_unsupported_schema_fields(&mut schema);
                (Some("application/json".to_string()), Some(schema))
            }
            Some(ResponseFormat::Text) | None => (None, None),
        };

        GenerateContentRequest {
            contents,
            system_instruction: (!system_parts.is_empty()).then(|| Content {
                role: None,
                parts: system_parts,
            }),
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
                response_mime_type,
                response_schema,
            },
        }
    }

    fn convert_finish_reason(reason: Option<&str>) -> FinishReason {
        match reason {
            Some("STOP") => FinishReason::Stop,
            Some("MAX_TOKENS") => FinishReason::Length,
            Some("SAFETY") | Some("RECITATION") | Some("BLOCKLIST") => FinishReason::ContentFilter,
            _ => FinishReason::Error,
        }
    }

    fn parse_response(
        response: GenerateContentResponse,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, LlmError> {
        let candidate = response.candidates.into_iter().next().ok_or_else(|| {
            LlmError::InvalidResponse("No candidates returned from Gemini".to_string())
        })?;

        let text: String = candidate
            .content
            .map(|content| content.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        let usage = response
            .usage_metadata
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_token_count,
                completion_tokens: u.candidates_token_count,
                total_tokens: u.total_token_count,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            content: (!text.is_empty()).then_some(text),
            model: response
                .model_version
                .unwrap_or_else(|| request.model.clone()),
            usage,
            finish_reason: Self::convert_finish_reason(candidate.finish_reason.as_deref()),
            metadata: request.metadata.clone(),
        })
    }
}

/// Recursively remove schema keywords outside Gemini's supported subset
fn strip_unsupported_schema_fields(value: &mut serde_json::Value) {
    if let Some(obj) = value.as_object_mut() {
        for field in UNSUPPORTED_SCHEMA_FIELDS {
            obj.remove(*field);
        }
        for (key, nested) in obj.iter_mut() {
            // Keys of `properties` are field names, not keywords
            if key == "properties" {
                if let Some(properties) = nested.as_object_mut() {
                    properties
                        .values_mut()
                        .for_each(strip_unsupported_schema_fields);
                    continue;
                }
            }
            strip_unsupported_schema_fields(nested);
        }
    } else if let Some(items) = value.as_array_mut() {
        for nested in items.iter_mut() {
            strip_unsupported_schema_fields(nested);
        }
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = Self::build_request(&request);
        debug!(
            model = %request.model,
            contents = body.contents.len(),
            "Sending Gemini generateContent request"
        );

        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.config.base_url, request.model
            ))
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<GeminiErrorBody>(&error_text)
                .map(|b| b.error.message)
                .unwrap_or(error_text);
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    LlmError::AuthenticationFailed(format!("Gemini rejected credentials: {status}"))
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    LlmError::RateLimitExceeded(format!("Gemini quota exceeded: {detail}"))
                }
                _ => LlmError::ApiError(format!("Gemini API error: {status} - {detail}")),
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let completion = Self::parse_response(parsed, &request)?;
        debug!(
            total_tokens = completion.usage.total_tokens,
            finish_reason = ?completion.finish_reason,
            "Gemini completion finished"
        );
        Ok(completion)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::provider::{JsonSchemaDefinition, Message};
    use serde_json::json;

    #[test]
    fn test_provider_requires_api_key() {
        assert!(matches!(
            GeminiProvider::new(GeminiConfig::default()),
            Err(LlmError::NotConfigured(_))
        ));
    }

    #[test]
    fn test_debug_masks_api_key() {
        let config = GeminiConfig {
            api_key: "AIza-very-secret".to_string(),
            ..Default::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("very-secret"));
    }

    #[test]
    fn test_system_messages_become_system_instruction() {
        let request = CompletionRequest::new(
            "gemini-2.0-flash",
            vec![Message::system("You are the Recon Agent."), Message::user("scan")],
        );

        let json = serde_json::to_value(GeminiProvider::build_request(&request)).unwrap();
        assert_eq!(
            json["systemInstruction"]["parts"][0]["text"],
            "You are the Recon Agent."
        );
        assert!(json["systemInstruction"].get("role").is_none());
        assert_eq!(json["contents"].as_array().unwrap().len(), 1);
        assert_eq!(json["contents"][0]["role"], "user");
        assert!(json["generationConfig"].get("responseMimeType").is_none());
    }

    #[test]
    fn test_schema_is_sanitized_for_gemini() {
        let mut request = CompletionRequest::new("gemini-2.0-flash", vec![Message::user("x")]);
        request.response_format = Some(ResponseFormat::JsonSchema {
            json_schema: JsonSchemaDefinition {
                name: "ReconSummary".to_string(),
                strict: None,
                schema: json!({
                    "$schema": "http://json-schema.org/draft-07/schema#",
                    "title": "ReconSummary",
                    "type": "object",
                    "required": ["summary"],
                    "properties": {"summary": {"type": "string", "default": ""}}
                }),
            },
        });

        let json = serde_json::to_value(GeminiProvider::build_request(&request)).unwrap();
        let schema = &json["generationConfig"]["responseSchema"];
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert!(schema.get("$schema").is_none());
        assert!(schema.get("title").is_none());
        assert!(schema["properties"]["summary"].get("default").is_none());
        assert_eq!(schema["required"][0], "summary");
    }

    #[test]
    fn test_parse_response_concatenates_parts() {
        let raw = json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "{\"summary\":"}, {"text": "\"ok\"}"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 4, "totalTokenCount": 16},
            "modelVersion": "gemini-2.0-flash-001"
        });
        let parsed: GenerateContentResponse = serde_json::from_value(raw).unwrap();
        let request = CompletionRequest::new("gemini-2.0-flash", vec![]);

        let response = GeminiProvider::parse_response(parsed, &request).unwrap();
        assert_eq!(response.content.as_deref(), Some("{\"summary\":\"ok\"}"));
        assert_eq!(response.model, "gemini-2.0-flash-001");
        assert_eq!(response.usage.total_tokens, 16);
        assert_eq!(response.finish_reason, FinishReason::Stop);
    }

    #[test]
    fn test_parse_response_without_candidates_fails() {
        let parsed: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        let request = CompletionRequest::new("gemini-2.0-flash", vec![]);
        assert!(matches!(
            GeminiProvider::parse_response(parsed, &request),
            Err(LlmError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_safety_finish_reason_maps_to_content_filter() {
        assert_eq!(
            GeminiProvider::convert_finish_reason(Some("SAFETY")),
            FinishReason::ContentFilter
        );
        assert_eq!(
            GeminiProvider::convert_finish_reason(Some("MAX_TOKENS")),
            FinishReason::Length
        );
    }
}
