//! # Tactics Core
//!
//! Rules engine for turn-based tactical battles on a square grid.
//!
//! This crate contains **only** rules logic:
//! - No rendering
//! - No input devices (pointer positions arrive as world coordinates)
//! - No process-wide state (rules are injected into each [`battle::Battle`])
//! - Fixed-point world math
//!
//! ## Crate Structure
//!
//! - [`grid`] - Cell layout and world/grid conversion
//! - [`pathfinding`] - Eight-way A* with octile costs
//! - [`occupancy`] - Which pawn stands where
//! - [`turn`] - Movement budgets and action slots
//! - [`ability`] - Ability configuration, legality and execution
//! - [`targeting`] - Selection state for a pending ability
//! - [`battle`] - The orchestrator tying everything together

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod ability;
pub mod battle;
pub mod config;
pub mod error;
pub mod grid;
pub mod math;
pub mod occupancy;
pub mod pathfinding;
pub mod targeting;
pub mod turn;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::ability::{
        Ability, AbilityKind, AbilityRef, AbilityRejection, TargetMode,
    };
    pub use crate::battle::{
        Battle, BattleEvent, Interaction, PawnSnapshot, PawnSpec, ResolutionPhase,
        ResolutionReport,
    };
    pub use crate::config::{GridConfig, RulesConfig};
    pub use crate::error::{GameError, Result};
    pub use crate::grid::{Cell, Grid, GridCoord};
    pub use crate::math::{Fixed, Vec2Fixed};
    pub use crate::occupancy::{OccupancyTracker, OccupancyView};
    pub use crate::pathfinding::{find_path, reachable_cells, PathResult};
    pub use crate::targeting::{SelectionState, TargetingContext};
    pub use crate::turn::{ActionCapabilities, ActionCost, PawnId, Team, TurnTracker};
}
