//! Test fixtures and helpers.
//!
//! Pre-built boards and battles for consistent testing.

use std::collections::BTreeSet;

use fixed::types::I32F32;
use tactics_core::battle::{Battle, PawnSpec};
use tactics_core::config::{GridConfig, RulesConfig};
use tactics_core::grid::{Grid, GridCoord};
use tactics_core::math::Vec2Fixed;
use tactics_core::turn::{PawnId, Team};

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> I32F32 {
    I32F32::from_num(n)
}

/// Create a fixed-point number from a float (for tests only).
#[must_use]
pub fn fixed_f(n: f64) -> I32F32 {
    I32F32::from_num(n)
}

/// World point from floats.
#[must_use]
pub fn point(x: f64, y: f64) -> Vec2Fixed {
    Vec2Fixed::new(fixed_f(x), fixed_f(y))
}

/// Shorthand for a grid coordinate.
#[must_use]
pub const fn at(x: i32, y: i32) -> GridCoord {
    GridCoord::new(x, y)
}

/// Rules for a `width` x `height` grid of unit cells at the origin.
#[must_use]
pub fn rules(width: u32, height: u32) -> RulesConfig {
    RulesConfig {
        grid: GridConfig {
            width,
            height,
            ..GridConfig::default()
        },
        ..RulesConfig::default()
    }
}

/// Unit-cell grid.
#[must_use]
pub fn open_grid(width: u32, height: u32) -> Grid {
    Grid::new(width, height, fixed(1))
}

/// Blocked-cell set usable as an occupancy view.
#[must_use]
pub fn blocked(cells: &[(i32, i32)]) -> BTreeSet<GridCoord> {
    cells.iter().map(|&(x, y)| at(x, y)).collect()
}

/// Battle with one default pawn per `(team, x, y)` entry, spawned in order.
///
/// # Panics
///
/// Panics if a placement is invalid.
#[must_use]
pub fn battle_with(width: u32, height: u32, pawns: &[(Team, i32, i32)]) -> (Battle, Vec<PawnId>) {
    let mut battle = Battle::new(rules(width, height)).expect("fixture rules are valid");
    let ids = pawns
        .iter()
        .map(|&(team, x, y)| {
            battle
                .spawn_pawn(PawnSpec::new(team), at(x, y))
                .expect("fixture placement is valid")
        })
        .collect();
    (battle, ids)
}

/// 8x8 battle: two red pawns on the left, two blue pawns on the right.
#[must_use]
pub fn duel() -> (Battle, Vec<PawnId>) {
    battle_with(
        8,
        8,
        &[
            (Team::Red, 0, 2),
            (Team::Red, 0, 5),
            (Team::Blue, 7, 2),
            (Team::Blue, 7, 5),
        ],
    )
}
