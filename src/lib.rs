//! AI Agents Hub
//!
//! A mention-based task router for a team of LLM-backed agents. A chat line
//! such as `@recon <nmap output>` is routed to the agent registered under
//! `@recon`, which validates its input, fills its prompt template, asks the
//! configured LLM for a structured answer and returns it for the transcript.
//!
//! # Overview
//!
//! - [`routing`]: mention parsing and the router's fallback policy
//! - [`registry`]: agents keyed by mention tag
//! - [`agents`]: the handler contract, the built-in catalog and the shared
//!   prompt-agent pipeline
//! - [`controller`]: transcript, single-flight processing state and notifications
//! - [`llm`]: provider trait plus Gemini and OpenAI backends
//! - [`tools`]: schema-validated tool stubs
//!
//! # Quick Start
//!
//! ```rust
//! use agents_hub::controller::{ChatController, TurnOutcome};
//! use agents_hub::registry::AgentRegistry;
//! use agents_hub::routing::{FallbackPolicy, MessageRouter};
//! use agents_hub::testing::MockAgent;
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let mut registry = AgentRegistry::new();
//! registry.register(Arc::new(MockAgent::echo("reconAgent", "@recon"))).unwrap();
//!
//! let router = MessageRouter::new(Arc::new(registry), FallbackPolicy::Reject);
//! let controller = ChatController::new(router, "AI Agents Hub").unwrap();
//!
//! let outcome = controller.submit("@recon 22/tcp open ssh").await;
//! assert_eq!(outcome, TurnOutcome::Completed { tag: "@recon".to_string() });
//! # });
//! ```

pub mod agents;
pub mod config;
pub mod controller;
pub mod error;
pub mod llm;
pub mod observability;
pub mod registry;
pub mod render;
pub mod routing;
pub mod testing;
pub mod tools;
pub mod transcript;

pub use agents::{AgentDescriptor, AgentHandler, AgentOutput, LlmSettings};
pub use config::{ConfigError, FallbackMode, HubConfig};
pub use controller::{ChatController, Notification, ProcessingState, TurnOutcome};
pub use error::{ErrorKind, HubError, HubResult};
pub use registry::{AgentRegistry, RegistryError};
pub use routing::{FallbackPolicy, MessageRouter, RouteDecision};
pub use tools::{Tool, ToolDescription, ToolError, ToolSystem};
pub use transcript::{ChatMessage, MessageContent, Sender, Transcript};
