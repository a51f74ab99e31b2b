//! Target selection state for a pending ability.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ability::{AbilityRef, TargetMode};
use crate::grid::{Grid, GridCoord};
use crate::occupancy::OccupancyTracker;
use crate::pathfinding::{find_path, PathResult};
use crate::turn::{PawnId, Team};

/// What the player is currently allowed to pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SelectionState {
    /// Nothing can be picked.
    Nothing,
    /// Pawns of a team other than the source's.
    EnemyPawns,
    /// Pawns of the source's team.
    TeamPawns,
    /// Any pawn.
    #[default]
    AllPawns,
    /// Grid cells.
    Grid,
}

impl SelectionState {
    /// Cells may be picked.
    #[must_use]
    pub const fn can_select_grid(self) -> bool {
        matches!(self, Self::Grid)
    }

    /// Pawns may be picked.
    #[must_use]
    pub const fn can_select_pawns(self) -> bool {
        matches!(self, Self::EnemyPawns | Self::TeamPawns | Self::AllPawns)
    }

    /// Whether a pawn of `pawn_team` may be picked, given the team of the
    /// pawn using the ability (if one is pending).
    #[must_use]
    pub fn admits_pawn(self, source_team: Option<Team>, pawn_team: Team) -> bool {
        match self {
            Self::AllPawns => true,
            Self::EnemyPawns => source_team.is_some_and(|team| team != pawn_team),
            Self::TeamPawns => source_team.is_some_and(|team| team == pawn_team),
            Self::Nothing | Self::Grid => false,
        }
    }
}

/// Targeting data for the ability being resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetingContext {
    active: bool,
    ability: Option<AbilityRef>,
    source: Option<PawnId>,
    hovered: Option<GridCoord>,
    selected: Option<GridCoord>,
    preview: PathResult,
    state: SelectionState,
}

impl Default for TargetingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetingContext {
    /// Cleared context in the browsing state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            active: false,
            ability: None,
            source: None,
            hovered: None,
            selected: None,
            preview: PathResult::default(),
            state: SelectionState::AllPawns,
        }
    }

    /// Drop every reference and return to browsing all pawns.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Start targeting for `ability`, used by `source`.
    pub fn begin(&mut self, ability: AbilityRef, source: PawnId, mode: TargetMode) {
        *self = Self {
            active: true,
            ability: Some(ability),
            source: Some(source),
            state: mode.selection_state(),
            ..Self::new()
        };
        debug!(pawn = source, index = ability.index, state = ?self.state, "Targeting started");
    }

    /// Force the selection state, e.g. to block input while another team acts.
    pub fn set_state(&mut self, state: SelectionState) {
        self.state = state;
    }

    /// Update the hovered cell and refresh the preview path.
    pub fn hover(&mut self, coord: Option<GridCoord>, grid: &Grid, occupancy: &OccupancyTracker) {
        self.hovered = coord.filter(|&c| grid.is_within_bounds(c));
        self.refresh_preview(self.hovered, grid, occupancy);
    }

    /// Record a picked cell and refresh the preview path towards it.
    pub fn select_cell(&mut self, coord: GridCoord, grid: &Grid, occupancy: &OccupancyTracker) {
        self.selected = Some(coord).filter(|&c| grid.is_within_bounds(c));
        self.refresh_preview(self.selected, grid, occupancy);
    }

    fn refresh_preview(
        &mut self,
        target: Option<GridCoord>,
        grid: &Grid,
        occupancy: &OccupancyTracker,
    ) {
        let from = self.source.and_then(|pawn| occupancy.position_of(pawn));
        self.preview = match (self.state, from, target) {
            (SelectionState::Grid, Some(from), Some(to)) => find_path(grid, occupancy, from, to),
            _ => PathResult::default(),
        };
    }

    /// An ability is pending.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Pending ability.
    #[must_use]
    pub const fn ability(&self) -> Option<AbilityRef> {
        self.ability
    }

    /// Pawn using the pending ability.
    #[must_use]
    pub const fn source(&self) -> Option<PawnId> {
        self.source
    }

    /// Cell under the pointer.
    #[must_use]
    pub const fn hovered(&self) -> Option<GridCoord> {
        self.hovered
    }

    /// Last picked cell.
    #[must_use]
    pub const fn selected(&self) -> Option<GridCoord> {
        self.selected
    }

    /// Path from the source pawn to the hovered or picked cell.
    #[must_use]
    pub const fn preview(&self) -> &PathResult {
        &self.preview
    }

    /// Current selection state.
    #[must_use]
    pub const fn state(&self) -> SelectionState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Fixed;

    fn board() -> (Grid, OccupancyTracker) {
        let mut occupancy = OccupancyTracker::new();
        occupancy.place(1, GridCoord::new(0, 0));
        occupancy.place(2, GridCoord::new(2, 0));
        (Grid::new(4, 4, Fixed::ONE), occupancy)
    }

    fn move_ref() -> AbilityRef {
        AbilityRef { pawn: 1, index: 0 }
    }

    #[test]
    fn test_new_context_browses_all_pawns() {
        let ctx = TargetingContext::new();
        assert!(!ctx.is_active());
        assert_eq!(ctx.state(), SelectionState::AllPawns);
        assert!(!ctx.preview().is_valid());
    }

    #[test]
    fn test_state_permissions() {
        assert!(SelectionState::Grid.can_select_grid());
        assert!(!SelectionState::Grid.can_select_pawns());
        assert!(!SelectionState::Nothing.can_select_grid());
        assert!(!SelectionState::Nothing.can_select_pawns());
        for state in [
            SelectionState::EnemyPawns,
            SelectionState::TeamPawns,
            SelectionState::AllPawns,
        ] {
            assert!(state.can_select_pawns());
            assert!(!state.can_select_grid());
        }
    }

    #[test]
    fn test_admits_pawn() {
        let red = Some(Team::Red);
        assert!(SelectionState::EnemyPawns.admits_pawn(red, Team::Blue));
        assert!(SelectionState::EnemyPawns.admits_pawn(red, Team::Neutral));
        assert!(!SelectionState::EnemyPawns.admits_pawn(red, Team::Red));
        assert!(SelectionState::TeamPawns.admits_pawn(red, Team::Red));
        assert!(!SelectionState::TeamPawns.admits_pawn(red, Team::Blue));
        assert!(SelectionState::AllPawns.admits_pawn(None, Team::Blue));
        assert!(!SelectionState::Nothing.admits_pawn(red, Team::Red));
    }

    #[test]
    fn test_hover_computes_preview_in_grid_state() {
        let (grid, occupancy) = board();
        let mut ctx = TargetingContext::new();
        ctx.begin(move_ref(), 1, TargetMode::GridCell);
        ctx.hover(Some(GridCoord::new(1, 1)), &grid, &occupancy);

        assert_eq!(ctx.hovered(), Some(GridCoord::new(1, 1)));
        assert!(ctx.preview().connects(GridCoord::new(0, 0), GridCoord::new(1, 1)));
        assert_eq!(ctx.preview().cost(), 14);
    }

    #[test]
    fn test_hover_outside_grid_clears_preview() {
        let (grid, occupancy) = board();
        let mut ctx = TargetingContext::new();
        ctx.begin(move_ref(), 1, TargetMode::GridCell);
        ctx.hover(Some(GridCoord::new(1, 1)), &grid, &occupancy);
        ctx.hover(Some(GridCoord::new(9, 9)), &grid, &occupancy);

        assert_eq!(ctx.hovered(), None);
        assert!(!ctx.preview().is_valid());
    }

    #[test]
    fn test_hover_without_grid_state_has_no_preview() {
        let (grid, occupancy) = board();
        let mut ctx = TargetingContext::new();
        ctx.hover(Some(GridCoord::new(1, 1)), &grid, &occupancy);
        assert!(!ctx.preview().is_valid());

        ctx.begin(move_ref(), 1, TargetMode::EnemyPawn);
        ctx.hover(Some(GridCoord::new(1, 1)), &grid, &occupancy);
        assert!(!ctx.preview().is_valid());
    }

    #[test]
    fn test_hover_on_occupied_cell_gives_invalid_preview() {
        let (grid, occupancy) = board();
        let mut ctx = TargetingContext::new();
        ctx.begin(move_ref(), 1, TargetMode::GridCell);
        ctx.hover(Some(GridCoord::new(2, 0)), &grid, &occupancy);
        assert!(!ctx.preview().is_valid());
    }

    #[test]
    fn test_select_cell_refreshes_preview() {
        let (grid, occupancy) = board();
        let mut ctx = TargetingContext::new();
        ctx.begin(move_ref(), 1, TargetMode::GridCell);
        ctx.select_cell(GridCoord::new(0, 3), &grid, &occupancy);

        assert_eq!(ctx.selected(), Some(GridCoord::new(0, 3)));
        assert!(ctx.preview().connects(GridCoord::new(0, 0), GridCoord::new(0, 3)));
    }

    #[test]
    fn test_clear_resets_everything() {
        let (grid, occupancy) = board();
        let mut ctx = TargetingContext::new();
        ctx.begin(move_ref(), 1, TargetMode::GridCell);
        ctx.hover(Some(GridCoord::new(1, 1)), &grid, &occupancy);
        ctx.clear();
        assert_eq!(ctx, TargetingContext::new());
    }
}
