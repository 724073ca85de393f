//! Message router
//!
//! Turns a raw chat line into a routing decision. The router only decides;
//! invoking the handler and recording the outcome is the controller's job.
//!
//! ```rust
//! use agents_hub::registry::AgentRegistry;
//! use agents_hub::routing::{FallbackPolicy, MessageRouter, RouteDecision};
//! use agents_hub::testing::MockAgent;
//! use std::sync::Arc;
//!
//! let mut registry = AgentRegistry::new();
//! registry.register(Arc::new(MockAgent::echo("recon", "@recon"))).unwrap();
//! let router = MessageRouter::new(Arc::new(registry), FallbackPolicy::Reject);
//!
//! assert_eq!(
//!     router.route("@recon 10.0.0.0/24"),
//!     RouteDecision::Agent { tag: "@recon".to_string(), task: "10.0.0.0/24".to_string() }
//! );
//! ```

use crate::config::{FallbackMode, HubSection};
use crate::registry::AgentRegistry;
use crate::routing::mention::parse_mention;
use std::sync::Arc;
use tracing::debug;

/// Usage hint shown when input has no mention and the policy rejects it
pub const MENTION_USAGE_HINT: &str =
    "To task an agent, start your message with their @mention tag (e.g., @recon).";

/// What to do with input that does not start with an `@tag`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Report a usage hint; call nothing
    Reject,
    /// Forward the whole input to the agent with this tag
    DefaultAgent(String),
}

impl From<&HubSection> for FallbackPolicy {
    fn from(section: &HubSection) -> Self {
        match section.fallback {
            FallbackMode::Reject => FallbackPolicy::Reject,
            FallbackMode::DefaultAgent => FallbackPolicy::DefaultAgent(section.default_agent.clone()),
        }
    }
}

/// Outcome of routing one line of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Nothing but whitespace was submitted
    Empty,
    /// Dispatch `task` to the agent registered under `tag`
    Agent { tag: String, task: String },
    /// A mention was present but no agent has that tag
    UnknownAgent { tag: String },
    /// No mention, and the fallback policy rejects un-mentioned input
    NoMention,
}

/// Routes raw chat input to registered agents
#[derive(Clone)]
pub struct MessageRouter {
    registry: Arc<AgentRegistry>,
    fallback: FallbackPolicy,
}

impl MessageRouter {
    pub fn new(registry: Arc<AgentRegistry>, fallback: FallbackPolicy) -> Self {
        Self { registry, fallback }
    }

    pub fn registry(&self) -> &Arc<AgentRegistry> {
        &self.registry
    }

    pub fn fallback(&self) -> &FallbackPolicy {
        &self.fallback
    }

    /// Decide where `raw` should go
    pub fn route(&self, raw: &str) -> RouteDecision {
        let input = raw.trim();
        if input.is_empty() {
            return RouteDecision::Empty;
        }

        let decision = match parse_mention(input) {
            Some(mention) if self.registry.contains(mention.tag) => RouteDecision::Agent {
                tag: mention.tag.to_string(),
                task: mention.task.to_string(),
            },
            Some(mention) => RouteDecision::UnknownAgent {
                tag: mention.tag.to_string(),
            },
            None => match &self.fallback {
                FallbackPolicy::Reject => RouteDecision::NoMention,
                FallbackPolicy::DefaultAgent(tag) => RouteDecision::Agent {
                    tag: tag.clone(),
                    task: input.to_string(),
                },
            },
        };

        debug!(?decision, "Routed input");
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockAgent;

    fn test_registry() -> Arc<AgentRegistry> {
        let mut registry = AgentRegistry::new();
        registry
            .register(Arc::new(MockAgent::echo("reconAgent", "@recon")))
            .unwrap();
        registry
            .register(Arc::new(MockAgent::echo("technicalDirector", "@director")))
            .unwrap();
        Arc::new(registry)
    }

    fn default_agent_router() -> MessageRouter {
        MessageRouter::new(
            test_registry(),
            FallbackPolicy::DefaultAgent("@director".to_string()),
        )
    }

    #[test]
    fn test_route_to_registered_agent() {
        let router = default_agent_router();
        assert_eq!(
            router.route("@recon abc"),
            RouteDecision::Agent {
                tag: "@recon".to_string(),
                task: "abc".to_string()
            }
        );
    }

    #[test]
    fn test_route_with_empty_task() {
        let router = default_agent_router();
        assert_eq!(
            router.route("  @recon   "),
            RouteDecision::Agent {
                tag: "@recon".to_string(),
                task: String::new()
            }
        );
    }

    #[test]
    fn test_unknown_tag_is_not_forwarded() {
        let router = default_agent_router();
        assert_eq!(
            router.route("@doesnotexist abc"),
            RouteDecision::UnknownAgent {
                tag: "@doesnotexist".to_string()
            }
        );
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let router = default_agent_router();
        assert!(matches!(
            router.route("@Recon abc"),
            RouteDecision::UnknownAgent { .. }
        ));
    }

    #[test]
    fn test_no_mention_goes_to_default_agent() {
        let router = default_agent_router();
        assert_eq!(
            router.route("  hello  "),
            RouteDecision::Agent {
                tag: "@director".to_string(),
                task: "hello".to_string()
            }
        );
    }

    #[test]
    fn test_no_mention_rejected_under_reject_policy() {
        let router = MessageRouter::new(test_registry(), FallbackPolicy::Reject);
        assert_eq!(router.route("hello"), RouteDecision::NoMention);
    }

    #[test]
    fn test_whitespace_input_is_empty() {
        let router = default_agent_router();
        assert_eq!(router.route(""), RouteDecision::Empty);
        assert_eq!(router.route(" \n\t "), RouteDecision::Empty);
    }

    #[test]
    fn test_policy_from_hub_section() {
        let mut section = HubSection::default();
        assert_eq!(
            FallbackPolicy::from(&section),
            FallbackPolicy::DefaultAgent("@director".to_string())
        );

        section.fallback = FallbackMode::Reject;
        assert_eq!(FallbackPolicy::from(&section), FallbackPolicy::Reject);
    }
}
