//! Headless battle driver for automated play and CI verification.
//!
//! This crate drives a [`tactics_core::battle::Battle`] via JSON commands
//! on stdin, with responses on stdout. This enables:
//!
//! - **Scripted play**: A bot or test harness can play without a renderer
//! - **CI verification**: Automated checks of rules and determinism
//! - **Tooling**: One-off path queries against a scenario
//!
//! # Protocol
//!
//! Communication uses JSON lines (one JSON object per line):
//!
//! - **stdin**: Commands from controller (pick_pawn, pick_cell, etc.)
//! - **stdout**: Responses (JSON)
//! - **stderr**: Debug logs (human-readable)
//!
//! See [`protocol`] module for the full command/response specification.
//!
//! # Example
//!
//! ```bash
//! # Run interactively with the built-in skirmish
//! echo '{"cmd":"query"}' | cargo run -p tactics_headless
//!
//! # Run a scenario file
//! cargo run -p tactics_headless -- run --scenario scenarios/skirmish.ron
//!
//! # Query a path
//! cargo run -p tactics_headless -- path --from 1,2 --to 7,6
//! ```

pub mod protocol;
pub mod runner;
pub mod scenario;

pub use protocol::{Command, Response};
pub use runner::HeadlessRunner;
pub use scenario::{PawnPlacement, Scenario, ScenarioError};
