//! Registry and router working together over the built-in catalog

use agents_hub::agents::LlmSettings;
use agents_hub::registry::{AgentRegistry, RegistryError};
use agents_hub::render::agent_list;
use agents_hub::routing::{FallbackPolicy, MessageRouter, RouteDecision};
use agents_hub::testing::{MockAgent, MockLlmProvider};
use agents_hub::tools::ToolSystem;
use proptest::prelude::*;
use std::sync::Arc;

fn builtin_registry() -> Arc<AgentRegistry> {
    Arc::new(
        AgentRegistry::builtin(
            Arc::new(MockLlmProvider::default()),
            LlmSettings {
                model: "mock-model".to_string(),
                temperature: None,
                max_tokens: None,
            },
            Arc::new(ToolSystem::with_builtins()),
        )
        .unwrap(),
    )
}

#[test]
fn test_builtin_catalog_is_fully_registered() {
    let registry = builtin_registry();
    assert_eq!(registry.len(), 15);
    for tag in ["@director", "@recon", "@vuln", "@flag", "@learn", "@programmer", "@comms"] {
        assert!(registry.contains(tag), "{tag} missing");
    }
    assert!(!registry.contains("@Director"));
}

#[test]
fn test_builtin_agents_listing_has_hints() {
    let registry = builtin_registry();
    let listing = agent_list(&registry.agents());
    assert!(listing.contains("Hint: @recon <Nmap scan output>"));
    assert!(listing.contains("Hint: @critic <item to review> [Focus: <aspect>]"));
    assert_eq!(listing.matches("Hint:").count(), 15);
}

#[test]
fn test_registering_a_builtin_tag_twice_fails() {
    let mut registry = AgentRegistry::builtin(
        Arc::new(MockLlmProvider::default()),
        LlmSettings {
            model: "mock-model".to_string(),
            temperature: None,
            max_tokens: None,
        },
        Arc::new(ToolSystem::with_builtins()),
    )
    .unwrap();

    let result = registry.register(Arc::new(MockAgent::echo("reconClone", "@recon")));
    assert_eq!(result, Err(RegistryError::DuplicateTag("@recon".to_string())));
    assert_eq!(registry.len(), 15);
}

#[test]
fn test_every_builtin_tag_routes_to_itself() {
    let registry = builtin_registry();
    let router = MessageRouter::new(registry.clone(), FallbackPolicy::Reject);

    for descriptor in registry.agents() {
        let decision = router.route(&format!("{} some task", descriptor.tag));
        assert_eq!(
            decision,
            RouteDecision::Agent {
                tag: descriptor.tag.clone(),
                task: "some task".to_string()
            }
        );
    }
}

proptest! {
    #[test]
    fn unknown_tags_are_never_forwarded(name in "[a-z]{3,12}", task in "[a-z ]{0,20}") {
        let registry = builtin_registry();
        let tag = format!("@x{name}");
        prop_assume!(!registry.contains(&tag));

        let router = MessageRouter::new(
            registry,
            FallbackPolicy::DefaultAgent("@director".to_string()),
        );
        prop_assert_eq!(
            router.route(&format!("{tag} {task}")),
            RouteDecision::UnknownAgent { tag }
        );
    }

    #[test]
    fn unmentioned_input_reaches_default_agent_verbatim(input in "[a-zA-Z][a-zA-Z0-9 ]{0,40}") {
        let router = MessageRouter::new(
            builtin_registry(),
            FallbackPolicy::DefaultAgent("@director".to_string()),
        );
        prop_assert_eq!(
            router.route(&input),
            RouteDecision::Agent {
                tag: "@director".to_string(),
                task: input.trim().to_string()
            }
        );
    }
}
