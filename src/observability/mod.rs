//! Observability
//!
//! Structured logging setup and the span macros used around routing, agent
//! invocations and tool calls.

pub mod logging;

pub use logging::{init_default_logging, init_logging, level_from_verbosity, LogFormat};

// Span macros for structured logging
pub use logging::{agent_span, route_span, tool_span};
