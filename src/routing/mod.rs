//! Mention-based routing
//!
//! `mention` splits a leading `@tag` from the task text; `router` maps a whole
//! input line onto a [`RouteDecision`] using the registry and the configured
//! fallback policy.

pub mod mention;
pub mod router;

pub use mention::{is_valid_tag, parse_mention, Mention};
pub use router::{FallbackPolicy, MessageRouter, RouteDecision, MENTION_USAGE_HINT};
