//! LLM provider abstraction layer
//!
//! A provider-agnostic completion interface plus the hosted backends the hub
//! can be configured with.

pub mod provider;
pub mod providers;

pub use provider::*;
pub use providers::*;
