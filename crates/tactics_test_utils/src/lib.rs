//! # Tactics Test Utilities
//!
//! Shared testing utilities for all crates:
//! - Replay determinism harness
//! - Battle and board fixtures
//! - Property-based testing strategies

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod determinism;
pub mod fixtures;

/// Re-export proptest for convenience.
pub use proptest;
