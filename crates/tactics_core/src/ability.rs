//! Abilities: static configuration, legality checks and execution.
//!
//! An ability is checked against an [`AbilityContext`] and, if legal,
//! produces an [`AbilityPlan`]. Only a plan can be executed, and a plan
//! can only be obtained from [`Ability::check`], so nothing runs against
//! targeting data that was never validated.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::grid::{Grid, GridCoord};
use crate::occupancy::OccupancyTracker;
use crate::pathfinding::{find_path, PathResult};
use crate::targeting::SelectionState;
use crate::turn::{ActionCost, PawnId, TurnTracker};

/// How an ability picks its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetMode {
    /// Targets the pawn using it.
    SelfOnly,
    /// Targets a pawn of another team.
    EnemyPawn,
    /// Targets a pawn of the same team.
    TeamPawn,
    /// Targets any pawn.
    AnyPawn,
    /// Targets a grid cell.
    GridCell,
}

impl TargetMode {
    /// Selection state to enter while this ability waits for a target.
    #[must_use]
    pub const fn selection_state(self) -> SelectionState {
        match self {
            Self::SelfOnly | Self::TeamPawn => SelectionState::TeamPawns,
            Self::EnemyPawn => SelectionState::EnemyPawns,
            Self::AnyPawn => SelectionState::AllPawns,
            Self::GridCell => SelectionState::Grid,
        }
    }

    /// True if the target is a pawn rather than a cell.
    #[must_use]
    pub const fn targets_pawn(self) -> bool {
        !matches!(self, Self::GridCell)
    }
}

/// What an ability does once it passes its check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityKind {
    /// Walk to the target cell along the cheapest path, paying its cost
    /// from the movement budget.
    Move,
    /// Placeholder with no effect; never passes its check.
    Inert,
}

/// Static ability configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    /// Display name.
    pub name: String,
    /// Behavior.
    pub kind: AbilityKind,
    /// Target selection mode.
    pub target_mode: TargetMode,
    /// Turn economy cost.
    #[serde(default)]
    pub cost: ActionCost,
    /// Whether pawn-targeted modes may pick the owner itself.
    #[serde(default)]
    pub can_target_self: bool,
    /// Owning pawn. Set when the ability is attached to a pawn.
    #[serde(skip)]
    owner: Option<PawnId>,
}

impl Ability {
    /// Create an ability.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        kind: AbilityKind,
        target_mode: TargetMode,
        cost: ActionCost,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            target_mode,
            cost,
            can_target_self: false,
            owner: None,
        }
    }

    /// The standard grid-targeted, free move.
    #[must_use]
    pub fn movement() -> Self {
        Self::new("Move", AbilityKind::Move, TargetMode::GridCell, ActionCost::Free)
    }

    /// An ability slot that does nothing.
    #[must_use]
    pub fn inert(name: impl Into<String>) -> Self {
        Self::new(name, AbilityKind::Inert, TargetMode::SelfOnly, ActionCost::Free)
    }

    /// Allow or forbid picking the owner as the target.
    #[must_use]
    pub fn with_can_target_self(mut self, allowed: bool) -> Self {
        self.can_target_self = allowed;
        self
    }

    /// Owning pawn, once attached.
    #[must_use]
    pub const fn owner(&self) -> Option<PawnId> {
        self.owner
    }

    pub(crate) fn attach_to(&mut self, pawn: PawnId) {
        self.owner = Some(pawn);
    }
}

/// Non-owning handle to an ability: the owning pawn and its slot index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbilityRef {
    /// Owning pawn.
    pub pawn: PawnId,
    /// Index into the pawn's ability list.
    pub index: usize,
}

/// Why an ability could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum AbilityRejection {
    /// Resolution was requested with no ability pending.
    #[error("No ability selected")]
    NoAbilitySelected,
    /// The source pawn does not exist.
    #[error("Source pawn {0} does not exist")]
    SourceMissing(PawnId),
    /// The source pawn is not on the grid.
    #[error("Source pawn {0} is not on the grid")]
    SourceNotPlaced(PawnId),
    /// The turn economy cannot pay the cost.
    #[error("{0:?} is not available this turn")]
    CostUnavailable(ActionCost),
    /// The ability needs a target that was not supplied.
    #[error("A target is required")]
    TargetRequired,
    /// The supplied pawn is not a legal target.
    #[error("Pawn {0} is not a legal target")]
    TargetNotAllowed(PawnId),
    /// No movement budget left.
    #[error("No movement left")]
    NoMovementLeft,
    /// No route to the destination.
    #[error("No path to {0}")]
    NoPath(GridCoord),
    /// The route costs more than the remaining budget.
    #[error("Path costs {cost} but only {remaining} movement remains")]
    PathTooExpensive {
        /// Path cost.
        cost: u32,
        /// Remaining movement.
        remaining: u32,
    },
    /// The ability has no effect and can never be used.
    #[error("Ability has no effect")]
    Inert,
}

/// Everything an ability may read while checking legality.
#[derive(Debug, Clone, Copy)]
pub struct AbilityContext<'a> {
    /// Battle grid.
    pub grid: &'a Grid,
    /// Current placements.
    pub occupancy: &'a OccupancyTracker,
    /// Current turn budgets.
    pub turns: &'a TurnTracker,
    /// Pawn using the ability.
    pub source: PawnId,
    /// Chosen target pawn, if any.
    pub target_pawn: Option<PawnId>,
    /// Chosen target cell, if any.
    pub target_cell: Option<GridCoord>,
    /// Path shown to the player while targeting.
    pub preview: Option<&'a PathResult>,
}

/// A checked, ready-to-execute ability use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbilityPlan(PlannedEffect);

#[derive(Debug, Clone, PartialEq, Eq)]
enum PlannedEffect {
    Move(PathResult),
}

impl AbilityPlan {
    /// The path a move will follow.
    #[must_use]
    pub fn path(&self) -> Option<&PathResult> {
        match &self.0 {
            PlannedEffect::Move(path) => Some(path),
        }
    }
}

/// What an executed ability changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityEffect {
    /// A pawn walked along a path.
    Moved {
        /// Moving pawn.
        pawn: PawnId,
        /// Cell left.
        from: GridCoord,
        /// Cell reached.
        to: GridCoord,
        /// Movement spent.
        cost: u32,
        /// Cells walked through, ending at `to`.
        steps: Vec<GridCoord>,
    },
}

impl Ability {
    /// Check whether this ability may be used in `ctx`.
    pub fn check(&self, ctx: &AbilityContext<'_>) -> Result<AbilityPlan, AbilityRejection> {
        let resources = ctx
            .turns
            .resources(ctx.source)
            .ok_or(AbilityRejection::SourceMissing(ctx.source))?;

        if !resources.can_perform(self.cost) {
            return Err(AbilityRejection::CostUnavailable(self.cost));
        }

        self.check_target(ctx)?;

        match self.kind {
            AbilityKind::Move => check_move(ctx),
            AbilityKind::Inert => Err(AbilityRejection::Inert),
        }
    }

    fn check_target(&self, ctx: &AbilityContext<'_>) -> Result<(), AbilityRejection> {
        if self.target_mode == TargetMode::GridCell {
            return match ctx.target_cell {
                Some(_) => Ok(()),
                None => Err(AbilityRejection::TargetRequired),
            };
        }

        let target = ctx.target_pawn.ok_or(AbilityRejection::TargetRequired)?;
        let is_self = target == ctx.source;

        if self.target_mode == TargetMode::SelfOnly {
            return if is_self {
                Ok(())
            } else {
                Err(AbilityRejection::TargetNotAllowed(target))
            };
        }

        if is_self && !self.can_target_self {
            return Err(AbilityRejection::TargetNotAllowed(target));
        }

        let source_team = ctx.turns.resources(ctx.source).map(|res| res.team());
        let target_team = ctx
            .turns
            .resources(target)
            .map(|res| res.team())
            .ok_or(AbilityRejection::TargetNotAllowed(target))?;

        let team_ok = match self.target_mode {
            TargetMode::EnemyPawn => source_team != Some(target_team),
            TargetMode::TeamPawn => source_team == Some(target_team),
            TargetMode::AnyPawn | TargetMode::SelfOnly | TargetMode::GridCell => true,
        };

        if team_ok || is_self {
            Ok(())
        } else {
            Err(AbilityRejection::TargetNotAllowed(target))
        }
    }

    /// Apply a plan produced by [`check`](Self::check) on this ability.
    ///
    /// Does not pay the ability's action cost; the caller does that.
    ///
    /// # Panics
    ///
    /// Panics if the plan was not produced by this ability's check or if
    /// the board changed between check and execution.
    pub(crate) fn execute(
        &self,
        plan: AbilityPlan,
        source: PawnId,
        occupancy: &mut OccupancyTracker,
        turns: &mut TurnTracker,
    ) -> AbilityEffect {
        match (self.kind, plan.0) {
            (AbilityKind::Move, PlannedEffect::Move(path)) => {
                let cost = path.cost();
                let to = path.end();

                if let Err(err) = turns.spend_movement(source, cost) {
                    panic!("checked move lost its source pawn: {err}");
                }
                let from = match occupancy.move_pawn(source, to) {
                    Ok(from) => from,
                    Err(err) => panic!("checked move became illegal: {err}"),
                };

                AbilityEffect::Moved {
                    pawn: source,
                    from,
                    to,
                    cost,
                    steps: path.steps().to_vec(),
                }
            }
            (AbilityKind::Inert, _) => unreachable!("inert abilities never pass their check"),
        }
    }
}

fn check_move(ctx: &AbilityContext<'_>) -> Result<AbilityPlan, AbilityRejection> {
    let from = ctx
        .occupancy
        .position_of(ctx.source)
        .ok_or(AbilityRejection::SourceNotPlaced(ctx.source))?;
    let to = ctx.target_cell.ok_or(AbilityRejection::TargetRequired)?;

    let remaining = ctx
        .turns
        .resources(ctx.source)
        .map_or(0, |res| res.remaining_movement());
    if remaining == 0 {
        return Err(AbilityRejection::NoMovementLeft);
    }

    let path = match ctx.preview.filter(|preview| preview.connects(from, to)) {
        Some(preview) => {
            debug!(pawn = ctx.source, %to, "Reusing preview path");
            preview.clone()
        }
        None => find_path(ctx.grid, ctx.occupancy, from, to),
    };

    if !path.is_valid() {
        return Err(AbilityRejection::NoPath(to));
    }
    if path.cost() > remaining {
        return Err(AbilityRejection::PathTooExpensive {
            cost: path.cost(),
            remaining,
        });
    }

    Ok(AbilityPlan(PlannedEffect::Move(path)))
}
