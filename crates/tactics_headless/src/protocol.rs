//! JSON protocol for headless battle control.
//!
//! The runner communicates via JSON lines (one JSON object per line):
//!
//! **Input (stdin):** Player inputs and queries
//! **Output (stdout):** Responses, one per input
//!
//! # Protocol Flow
//!
//! 1. Runner starts, outputs `{"type":"ready",...}`
//! 2. Controller sends commands as JSON lines
//! 3. Runner answers every command with exactly one response
//! 4. On `quit` (or end of input), outputs `{"type":"bye"}`
//!
//! # Example Session
//!
//! ```text
//! <- {"type":"ready","version":"1.0","width":10,"height":8,"pawns":[1,2]}
//! -> {"cmd":"pick_pawn","pawn_id":1}
//! <- {"type":"interaction","cmd":"pick_pawn","outcome":{"Inspected":1},"events":[...]}
//! -> {"cmd":"select_ability","index":0}
//! <- {"type":"interaction","cmd":"select_ability","outcome":{"AbilitySelected":{...}},"events":[...]}
//! -> {"cmd":"hover","x":3,"y":2}
//! <- {"type":"hovered","cell":{"x":3,"y":2},"preview":{...}}
//! -> {"cmd":"pick_cell","x":3,"y":2}
//! <- {"type":"interaction","cmd":"pick_cell","outcome":{"Resolved":{...}},"events":[...]}
//! ```

use serde::{Deserialize, Serialize};
use tactics_core::battle::{BattleEvent, Interaction, PawnSnapshot, ResolutionPhase};
use tactics_core::grid::GridCoord;
use tactics_core::pathfinding::PathResult;
use tactics_core::targeting::SelectionState;
use tactics_core::turn::{PawnId, Team};

/// Protocol version reported in the ready message.
pub const PROTOCOL_VERSION: &str = "1.0";

// ============================================================================
// Input Commands (Controller -> Runner)
// ============================================================================

/// Commands that can be sent to the headless runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    /// Report the full battle state.
    Query,

    /// Move the pointer to a world-space position.
    Pointer { x: f64, y: f64 },

    /// Hover a grid cell.
    Hover { x: i32, y: i32 },

    /// Pick a grid cell.
    PickCell { x: i32, y: i32 },

    /// Pick a pawn.
    PickPawn { pawn_id: PawnId },

    /// Pick an ability slot of the inspected pawn.
    SelectAbility { index: usize },

    /// Cancel the pending ability or the inspection.
    Cancel,

    /// Start one pawn's turn.
    StartTurn { pawn_id: PawnId },

    /// Start the turn of every pawn on a team.
    BeginTeamTurn { team: Team },

    /// Display data of one pawn.
    Snapshot { pawn_id: PawnId },

    /// Cheapest path between two cells.
    Path { from: GridCoord, to: GridCoord },

    /// Cells a pawn can reach this turn.
    Range { pawn_id: PawnId },

    /// Report the state hash (for determinism verification).
    Hash,

    /// Stop the runner.
    Quit,
}

// ============================================================================
// Output Responses (Runner -> Controller)
// ============================================================================

/// Responses sent from the headless runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    /// Runner is ready to accept commands.
    Ready {
        version: String,
        width: u32,
        height: u32,
        pawns: Vec<PawnId>,
    },

    /// Acknowledgment of a command.
    Ack { cmd: String },

    /// Error processing a command.
    Error {
        message: String,
        cmd: Option<String>,
    },

    /// Outcome of a player input, with the events it produced.
    Interaction {
        cmd: String,
        outcome: Interaction,
        events: Vec<BattleEvent>,
    },

    /// Hover moved.
    Hovered {
        cell: Option<GridCoord>,
        preview: PathResult,
    },

    /// Full battle state.
    State(BattleState),

    /// One pawn's display data.
    Snapshot { pawn: PawnSnapshot },

    /// Path query result.
    Path { path: PathResult },

    /// Reachable cells of a pawn.
    Range {
        pawn_id: PawnId,
        cells: Vec<RangeCell>,
    },

    /// State hash for determinism verification.
    StateHash { hash: u64 },

    /// Goodbye message before shutdown.
    Bye,
}

// ============================================================================
// State Types
// ============================================================================

/// Battle state as reported by `query`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleState {
    pub phase: ResolutionPhase,
    pub selection: SelectionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inspected: Option<PawnId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovered: Option<GridCoord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<GridCoord>,
    pub preview: PathResult,
    pub pawns: Vec<PawnSnapshot>,
    pub hash: u64,
}

/// One reachable cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeCell {
    pub x: i32,
    pub y: i32,
    pub cost: u32,
}

// ============================================================================
// Helpers
// ============================================================================

impl Response {
    /// Create an acknowledgment.
    pub fn ack(cmd: &str) -> Self {
        Self::Ack {
            cmd: cmd.to_string(),
        }
    }

    /// Create an error response.
    pub fn error(message: impl Into<String>, cmd: Option<&str>) -> Self {
        Self::Error {
            message: message.into(),
            cmd: cmd.map(String::from),
        }
    }

    /// Serialize to JSON line (with newline).
    pub fn to_json_line(&self) -> String {
        let mut json = serde_json::to_string(self).unwrap_or_else(|e| {
            format!(
                r#"{{"type":"error","message":"Serialization failed: {}"}}"#,
                e
            )
        });
        json.push('\n');
        json
    }
}

impl Command {
    /// Parse from a JSON line.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Get command name for acknowledgment.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Pointer { .. } => "pointer",
            Self::Hover { .. } => "hover",
            Self::PickCell { .. } => "pick_cell",
            Self::PickPawn { .. } => "pick_pawn",
            Self::SelectAbility { .. } => "select_ability",
            Self::Cancel => "cancel",
            Self::StartTurn { .. } => "start_turn",
            Self::BeginTeamTurn { .. } => "begin_team_turn",
            Self::Snapshot { .. } => "snapshot",
            Self::Path { .. } => "path",
            Self::Range { .. } => "range",
            Self::Hash => "hash",
            Self::Quit => "quit",
        }
    }
}

/// Parse a cell written as `X,Y`.
pub fn parse_cell(text: &str) -> Result<GridCoord, String> {
    let (x, y) = text
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{text}'"))?;
    let x = x
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("invalid x in '{text}': {e}"))?;
    let y = y
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("invalid y in '{text}': {e}"))?;
    Ok(GridCoord::new(x, y))
}
