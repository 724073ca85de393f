//! Testing utilities and mock implementations
//!
//! Mocks for exercising the hub without a hosted LLM.

pub mod mocks;

pub use mocks::*;
