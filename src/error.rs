//! Error types for the agents hub
//!
//! Every failure a handler can produce maps onto one of three user-facing
//! categories: input validation, backend failure, or internal fault. Routing
//! misses are not errors and never reach this module.

use crate::config::ConfigError;
use crate::llm::provider::LlmError;
use crate::tools::ToolError;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Main error type for hub operations
#[derive(Debug, Error)]
pub enum HubError {
    #[error("{field} is required. Usage: {hint}")]
    MissingInput { field: String, hint: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("LLM provider error: {0}")]
    Llm(#[from] LlmError),

    #[error("Invalid agent output: {message}")]
    InvalidOutput { message: String },

    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Registry error: {0}")]
    Registry(#[from] crate::registry::RegistryError),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Which of the user-facing error categories an error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The task was missing or malformed; no backend call was made
    Validation,
    /// The LLM call failed or returned something unusable
    Backend,
    /// Anything else
    Internal,
}

impl HubError {
    /// Create missing input error
    pub fn missing_input<F: Into<String>, H: Into<String>>(field: F, hint: H) -> Self {
        Self::MissingInput {
            field: field.into(),
            hint: hint.into(),
        }
    }

    /// Create invalid input error
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create invalid output error
    pub fn invalid_output<S: Into<String>>(message: S) -> Self {
        Self::InvalidOutput {
            message: message.into(),
        }
    }

    /// Create internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            HubError::MissingInput { .. } | HubError::InvalidInput { .. } => ErrorKind::Validation,
            HubError::Llm(_) | HubError::InvalidOutput { .. } | HubError::Tool(_) => {
                ErrorKind::Backend
            }
            HubError::Config(_) | HubError::Registry(_) | HubError::Internal { .. } => {
                ErrorKind::Internal
            }
        }
    }

    /// Message safe to put in front of a user
    pub fn user_message(&self) -> String {
        sanitize_error_message(&self.to_string())
    }
}

static SECRET_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(password|token|key|secret)[=:]\s*\S+").expect("secret pattern is valid")
});

static SENSITIVE_PATH_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/[a-zA-Z0-9._/-]+/(secrets?|\.ssh|\.aws|\.config)/[a-zA-Z0-9._/-]+")
        .expect("path pattern is valid")
});

const MAX_MESSAGE_LEN: usize = 500;
const TRUNCATE_SUFFIX: &str = "...[truncated]";

/// Mask credentials and sensitive paths, and cap the length of error text
pub fn sanitize_error_message(message: &str) -> String {
    let masked = SECRET_PATTERN.replace_all(message, "${1}=***");
    let mut sanitized = SENSITIVE_PATH_PATTERN
        .replace_all(&masked, "/***REDACTED***/")
        .into_owned();

    if sanitized.len() > MAX_MESSAGE_LEN {
        let mut cut = MAX_MESSAGE_LEN - TRUNCATE_SUFFIX.len();
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        sanitized.truncate(cut);
        sanitized.push_str(TRUNCATE_SUFFIX);
    }

    sanitized
}

/// Result type for hub operations
pub type HubResult<T> = Result<T, HubError>;
