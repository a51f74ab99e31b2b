//! Determinism testing utilities.
//!
//! Replays a script of player inputs against freshly built battles and
//! compares [`Battle::state_hash`] between runs.
//!
//! Sources of non-determinism this guards against:
//!
//! - **Hash map iteration order**: pawns are always visited in id order.
//! - **Path tie-breaking**: equal-cost paths must be chosen the same way
//!   on every run.
//! - **Floating-point math**: world coordinates use fixed-point.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use tactics_core::battle::{Battle, Interaction};
use tactics_core::grid::GridCoord;
use tactics_core::turn::{PawnId, Team};
use tracing::debug;

/// One scripted player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayInput {
    /// Pick a pawn.
    PickPawn(PawnId),
    /// Pick an ability slot of the inspected pawn.
    SelectAbility(usize),
    /// Hover a cell.
    Hover(GridCoord),
    /// Pick a cell.
    PickCell(GridCoord),
    /// Cancel.
    Cancel,
    /// Start every turn of a team.
    BeginTeamTurn(Team),
}

/// Feed one input to `battle`.
pub fn apply_input(battle: &mut Battle, input: ReplayInput) -> Interaction {
    match input {
        ReplayInput::PickPawn(pawn) => battle.on_pawn_picked(pawn),
        ReplayInput::SelectAbility(index) => battle.select_ability(index),
        ReplayInput::Hover(cell) => {
            battle.hover_cell(Some(cell));
            Interaction::Ignored
        }
        ReplayInput::PickCell(cell) => battle.on_cell_picked(cell),
        ReplayInput::Cancel => battle.cancel(),
        ReplayInput::BeginTeamTurn(team) => {
            battle.begin_team_turn(team);
            Interaction::Ignored
        }
    }
}

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Final hash of each run.
    pub hashes: Vec<u64>,
    /// Number of inputs replayed per run.
    pub inputs: usize,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for a deterministic battle).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that every run ended in the same state.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Battle is non-deterministic!\n\
                 Runs: {}\n\
                 Inputs: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.inputs,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Replay `script` against `runs` fresh battles and compare final hashes.
pub fn verify_determinism<F>(runs: usize, setup: F, script: &[ReplayInput]) -> DeterminismResult
where
    F: Fn() -> Battle,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut battle = setup();
        for &input in script {
            apply_input(&mut battle, input);
        }
        hashes.push(battle.state_hash());
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        inputs: script.len(),
    }
}

/// Replay `script` on two battles side by side and return the index of the
/// first input after which their hashes differ.
///
/// Returns `Some(0)` if the battles already differ before any input.
pub fn find_first_divergence<F>(setup: F, script: &[ReplayInput]) -> Option<usize>
where
    F: Fn() -> Battle,
{
    let mut first = setup();
    let mut second = setup();

    if first.state_hash() != second.state_hash() {
        return Some(0);
    }

    for (index, &input) in script.iter().enumerate() {
        let a = apply_input(&mut first, input);
        let b = apply_input(&mut second, input);

        if a != b || first.state_hash() != second.state_hash() {
            debug!(index, ?input, "Replays diverged");
            return Some(index + 1);
        }
    }

    None
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for boards and input scripts.
pub mod strategies {
    use proptest::prelude::*;
    use tactics_core::grid::GridCoord;
    use tactics_core::turn::Team;

    use super::ReplayInput;

    /// Grid dimensions from 1 to `max` cells per side.
    pub fn arb_dims(max: u32) -> impl Strategy<Value = (u32, u32)> {
        (1..=max, 1..=max)
    }

    /// A coordinate inside a `width` x `height` grid.
    pub fn arb_coord_in(width: u32, height: u32) -> impl Strategy<Value = GridCoord> {
        let w = i32::try_from(width).unwrap_or(i32::MAX);
        let h = i32::try_from(height).unwrap_or(i32::MAX);
        (0..w, 0..h).prop_map(|(x, y)| GridCoord::new(x, y))
    }

    /// Grid dimensions together with a coordinate inside them.
    pub fn arb_grid_and_coord(max: u32) -> impl Strategy<Value = ((u32, u32), GridCoord)> {
        arb_dims(max).prop_flat_map(|(w, h)| (Just((w, h)), arb_coord_in(w, h)))
    }

    /// Up to `max_count` blocked cells inside the grid.
    pub fn arb_blocked(width: u32, height: u32, max_count: usize) -> impl Strategy<Value = Vec<GridCoord>> {
        proptest::collection::vec(arb_coord_in(width, height), 0..max_count)
    }

    /// Any team.
    pub fn arb_team() -> impl Strategy<Value = Team> {
        prop_oneof![Just(Team::Neutral), Just(Team::Red), Just(Team::Blue)]
    }

    /// One player input on a `width` x `height` board with pawn ids up to `max_pawn`.
    pub fn arb_input(width: u32, height: u32, max_pawn: u32) -> impl Strategy<Value = ReplayInput> {
        prop_oneof![
            (1..=max_pawn).prop_map(ReplayInput::PickPawn),
            (0usize..3).prop_map(ReplayInput::SelectAbility),
            arb_coord_in(width, height).prop_map(ReplayInput::Hover),
            arb_coord_in(width, height).prop_map(ReplayInput::PickCell),
            Just(ReplayInput::Cancel),
            arb_team().prop_map(ReplayInput::BeginTeamTurn),
        ]
    }

    /// A script of up to `max_len` inputs.
    pub fn arb_script(
        width: u32,
        height: u32,
        max_pawn: u32,
        max_len: usize,
    ) -> impl Strategy<Value = Vec<ReplayInput>> {
        proptest::collection::vec(arb_input(width, height, max_pawn), 0..max_len)
    }
}
