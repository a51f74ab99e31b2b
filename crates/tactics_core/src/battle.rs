//! Ability resolution orchestrator.
//!
//! [`Battle`] owns the grid, pawn placements, turn budgets, abilities and
//! the targeting context. Every input goes through it and runs to
//! completion before the next one: gating, then pathfinding, then
//! mutation.
//!
//! # Flow
//!
//! 1. The player picks a pawn while idle: it becomes the inspected pawn.
//! 2. The player picks one of its abilities: the battle enters
//!    [`ResolutionPhase::AbilitySelected`] and the selection state
//!    switches to what the ability targets.
//! 3. The player picks a target: the ability's legality check runs. A
//!    rejection changes nothing and keeps the ability pending. Success
//!    executes it, clears targeting and returns to idle.
//!
//! # Example
//!
//! ```
//! use tactics_core::battle::{Battle, Interaction, PawnSpec};
//! use tactics_core::config::RulesConfig;
//! use tactics_core::grid::GridCoord;
//! use tactics_core::turn::Team;
//!
//! let mut battle = Battle::new(RulesConfig::default()).unwrap();
//! let pawn = battle
//!     .spawn_pawn(PawnSpec::new(Team::Red), GridCoord::new(0, 0))
//!     .unwrap();
//!
//! battle.on_pawn_picked(pawn);
//! battle.select_ability(0);
//! let result = battle.on_cell_picked(GridCoord::new(2, 1));
//!
//! assert!(matches!(result, Interaction::Resolved(_)));
//! assert_eq!(battle.occupancy().position_of(pawn), Some(GridCoord::new(2, 1)));
//! ```

use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::ability::{
    Ability, AbilityContext, AbilityEffect, AbilityRef, AbilityRejection, TargetMode,
};
use crate::config::RulesConfig;
use crate::error::{GameError, Result};
use crate::grid::{Grid, GridCoord};
use crate::math::Vec2Fixed;
use crate::occupancy::OccupancyTracker;
use crate::pathfinding::{find_path, reachable_cells, PathResult};
use crate::targeting::{SelectionState, TargetingContext};
use crate::turn::{ActionCapabilities, ActionCost, PawnId, PawnResources, Team, TurnTracker};

/// Where the battle is in resolving an ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ResolutionPhase {
    /// No ability pending.
    #[default]
    Idle,
    /// An ability waits for its target.
    AbilitySelected,
}

/// Parameters for spawning a pawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PawnSpec {
    /// Team affiliation.
    pub team: Team,
    /// Movement budget; the rules default when absent.
    #[serde(default)]
    pub movement: Option<u32>,
    /// Action slots the pawn has.
    #[serde(default)]
    pub capabilities: ActionCapabilities,
    /// Abilities in slot order.
    #[serde(default = "default_abilities")]
    pub abilities: Vec<Ability>,
}

fn default_abilities() -> Vec<Ability> {
    vec![Ability::movement()]
}

impl PawnSpec {
    /// A fully capable pawn with the standard move ability.
    #[must_use]
    pub fn new(team: Team) -> Self {
        Self {
            team,
            movement: None,
            capabilities: ActionCapabilities::ALL,
            abilities: default_abilities(),
        }
    }

    /// Override the movement budget.
    #[must_use]
    pub fn with_movement(mut self, movement: u32) -> Self {
        self.movement = Some(movement);
        self
    }

    /// Override the action slots.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: ActionCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Append an ability.
    #[must_use]
    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.abilities.push(ability);
        self
    }
}

/// Result of a successfully executed ability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionReport {
    /// The ability used.
    pub ability: AbilityRef,
    /// Its name.
    pub name: String,
    /// Cost paid from the turn economy.
    pub cost: ActionCost,
    /// Target pawn, for pawn-targeted abilities.
    pub target_pawn: Option<PawnId>,
    /// Target cell, for grid-targeted abilities.
    pub target_cell: Option<GridCoord>,
    /// What changed.
    pub effect: AbilityEffect,
}

/// Outcome of a player input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interaction {
    /// The input was not allowed in the current state; nothing changed.
    Ignored,
    /// A pawn became the inspected pawn.
    Inspected(PawnId),
    /// An ability is now waiting for its target.
    AbilitySelected(AbilityRef),
    /// The pending ability refused the target; it stays pending.
    Rejected(AbilityRejection),
    /// The pending ability executed.
    Resolved(ResolutionReport),
    /// A pending ability or inspection was dropped.
    Cancelled,
}

/// Something that happened in the battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleEvent {
    /// A pawn entered the grid.
    PawnSpawned {
        /// New pawn.
        pawn: PawnId,
        /// Its cell.
        at: GridCoord,
    },
    /// A pawn left the battle.
    PawnRemoved(PawnId),
    /// A pawn became the inspected pawn.
    PawnInspected(PawnId),
    /// The inspected pawn was cleared.
    InspectionCleared,
    /// An ability started targeting.
    AbilitySelected(AbilityRef),
    /// The pending ability refused a target.
    ResolutionRejected {
        /// Pending ability.
        ability: AbilityRef,
        /// Why it refused.
        reason: AbilityRejection,
    },
    /// An ability executed.
    AbilityExecuted(ResolutionReport),
    /// A pawn changed cell.
    PawnMoved {
        /// Moving pawn.
        pawn: PawnId,
        /// Cell left.
        from: GridCoord,
        /// Cell reached.
        to: GridCoord,
        /// Movement spent.
        cost: u32,
    },
    /// The pending ability was cancelled.
    ResolutionCancelled(AbilityRef),
    /// A pawn's turn started.
    TurnStarted(PawnId),
    /// Selection was locked.
    SelectionSuspended,
    /// Selection was unlocked.
    SelectionResumed,
}

/// Summary of one ability slot for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilitySummary {
    /// Slot index.
    pub index: usize,
    /// Name.
    pub name: String,
    /// Targeting mode.
    pub target_mode: TargetMode,
    /// Turn economy cost.
    pub cost: ActionCost,
    /// The cost can be paid right now.
    pub affordable: bool,
}

/// Display data for one pawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PawnSnapshot {
    /// Pawn id.
    pub id: PawnId,
    /// Team.
    pub team: Team,
    /// Current cell.
    pub position: Option<GridCoord>,
    /// Movement at turn start.
    pub max_movement: u32,
    /// Movement left.
    pub remaining_movement: u32,
    /// Action slot available.
    pub can_take_action: bool,
    /// Bonus action slot available.
    pub can_take_bonus_action: bool,
    /// Reaction slot available.
    pub can_take_reaction: bool,
    /// Belongs to the player team, so its abilities can be selected.
    pub controllable: bool,
    /// Ability slots.
    pub abilities: Vec<AbilitySummary>,
}

/// A single tactical battle.
#[derive(Debug, Clone)]
pub struct Battle {
    config: RulesConfig,
    grid: Grid,
    occupancy: OccupancyTracker,
    turns: TurnTracker,
    abilities: BTreeMap<PawnId, Vec<Ability>>,
    targeting: TargetingContext,
    phase: ResolutionPhase,
    inspected: Option<PawnId>,
    next_pawn_id: PawnId,
    events: Vec<BattleEvent>,
}

impl Battle {
    /// Create an empty battle.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidConfig`] if the rules are unusable.
    pub fn new(config: RulesConfig) -> Result<Self> {
        config.validate()?;
        let grid = Grid::from_config(&config.grid)?;
        Ok(Self {
            config,
            grid,
            occupancy: OccupancyTracker::new(),
            turns: TurnTracker::new(),
            abilities: BTreeMap::new(),
            targeting: TargetingContext::new(),
            phase: ResolutionPhase::Idle,
            inspected: None,
            next_pawn_id: 1,
            events: Vec::new(),
        })
    }

    /// Rules in force.
    #[must_use]
    pub const fn config(&self) -> &RulesConfig {
        &self.config
    }

    /// Battle grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Pawn placements.
    #[must_use]
    pub const fn occupancy(&self) -> &OccupancyTracker {
        &self.occupancy
    }

    /// Turn budgets.
    #[must_use]
    pub const fn turns(&self) -> &TurnTracker {
        &self.turns
    }

    /// Targeting data of the pending ability.
    #[must_use]
    pub const fn targeting(&self) -> &TargetingContext {
        &self.targeting
    }

    /// Resolution phase.
    #[must_use]
    pub const fn phase(&self) -> ResolutionPhase {
        self.phase
    }

    /// Pawn whose details are shown.
    #[must_use]
    pub const fn inspected_pawn(&self) -> Option<PawnId> {
        self.inspected
    }

    /// Abilities of `pawn`, in slot order.
    #[must_use]
    pub fn abilities_of(&self, pawn: PawnId) -> &[Ability] {
        self.abilities.get(&pawn).map_or(&[][..], Vec::as_slice)
    }

    /// Every pawn id, ascending.
    #[must_use]
    pub fn pawn_ids(&self) -> Vec<PawnId> {
        self.turns.iter().map(|(id, _)| id).collect()
    }

    /// Put a new pawn on `at`.
    ///
    /// # Errors
    ///
    /// Fails if `at` is outside the grid or already occupied.
    pub fn spawn_pawn(&mut self, spec: PawnSpec, at: GridCoord) -> Result<PawnId> {
        if !self.grid.is_within_bounds(at) {
            return Err(GameError::OutOfBounds(at));
        }
        if let Some(occupant) = self.occupancy.occupant_at(at) {
            return Err(GameError::CellOccupied { coord: at, occupant });
        }

        let pawn = self.next_pawn_id;
        self.next_pawn_id += 1;

        let movement = spec.movement.unwrap_or(self.config.default_movement);
        self.turns.register(
            pawn,
            PawnResources::new(spec.team, movement, spec.capabilities),
        );

        let mut abilities = spec.abilities;
        for ability in &mut abilities {
            ability.attach_to(pawn);
        }
        self.abilities.insert(pawn, abilities);
        self.occupancy.place(pawn, at);

        debug!(pawn, team = spec.team.display_name(), %at, "Pawn spawned");
        self.events.push(BattleEvent::PawnSpawned { pawn, at });
        self.refresh_preview();
        Ok(pawn)
    }

    /// Take a pawn out of the battle.
    ///
    /// A pending ability used by the pawn is cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PawnNotFound`] for unknown pawns.
    pub fn remove_pawn(&mut self, pawn: PawnId) -> Result<()> {
        if self.turns.remove(pawn).is_none() {
            return Err(GameError::PawnNotFound(pawn));
        }
        if self.targeting.source() == Some(pawn) {
            self.cancel();
        }
        if self.inspected == Some(pawn) {
            self.inspected = None;
        }
        self.occupancy.remove(pawn);
        self.abilities.remove(&pawn);

        debug!(pawn, "Pawn removed");
        self.events.push(BattleEvent::PawnRemoved(pawn));
        self.refresh_preview();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Pointer input
    // ------------------------------------------------------------------

    /// Cell under a world-space point.
    #[must_use]
    pub fn resolve_pointer_to_cell(&self, point: Vec2Fixed) -> Option<GridCoord> {
        self.grid.world_to_coordinate(point)
    }

    /// Move the hover to the cell under `point`.
    pub fn hover_pointer(&mut self, point: Vec2Fixed) -> Option<GridCoord> {
        let cell = self.resolve_pointer_to_cell(point);
        self.hover_cell(cell);
        cell
    }

    /// Move the hover to `cell` and refresh the preview path.
    pub fn hover_cell(&mut self, cell: Option<GridCoord>) {
        self.targeting.hover(cell, &self.grid, &self.occupancy);
    }

    /// The player picked a cell.
    pub fn on_cell_picked(&mut self, coord: GridCoord) -> Interaction {
        if !self.targeting.state().can_select_grid() || !self.grid.is_within_bounds(coord) {
            debug!(%coord, state = ?self.targeting.state(), "Cell pick ignored");
            return Interaction::Ignored;
        }

        self.targeting
            .select_cell(coord, &self.grid, &self.occupancy);
        self.resolve_interaction(None, Some(coord))
    }

    /// The player picked a pawn.
    pub fn on_pawn_picked(&mut self, pawn: PawnId) -> Interaction {
        let state = self.targeting.state();
        let Some(team) = self.turns.resources(pawn).map(PawnResources::team) else {
            return Interaction::Ignored;
        };
        let source_team = self
            .targeting
            .source()
            .and_then(|source| self.turns.resources(source))
            .map(PawnResources::team);

        if !state.can_select_pawns() || !state.admits_pawn(source_team, team) {
            debug!(pawn, ?state, "Pawn pick ignored");
            return Interaction::Ignored;
        }

        self.select_pawn(pawn)
    }

    // ------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------

    /// Inspect `pawn` when idle, or use it as the target of the pending
    /// pawn-targeted ability.
    ///
    /// Unlike [`on_pawn_picked`](Self::on_pawn_picked) this skips the
    /// selection state gate; the ability's own check still applies.
    pub fn select_pawn(&mut self, pawn: PawnId) -> Interaction {
        if self.turns.resources(pawn).is_none() {
            return Interaction::Ignored;
        }

        match self.phase {
            ResolutionPhase::Idle => {
                self.inspected = Some(pawn);
                debug!(pawn, "Pawn inspected");
                self.events.push(BattleEvent::PawnInspected(pawn));
                Interaction::Inspected(pawn)
            }
            ResolutionPhase::AbilitySelected => {
                let targets_pawn = self
                    .pending_ability()
                    .is_some_and(|ability| ability.target_mode.targets_pawn());
                if targets_pawn {
                    self.resolve_interaction(Some(pawn), None)
                } else {
                    Interaction::Ignored
                }
            }
        }
    }

    /// Start targeting with slot `index` of the inspected pawn.
    ///
    /// Ignored while selection is suspended, without an inspected pawn,
    /// for pawns outside the player team, or for a missing slot. Picking
    /// another ability while one is pending replaces it.
    pub fn select_ability(&mut self, index: usize) -> Interaction {
        if self.targeting.state() == SelectionState::Nothing {
            return Interaction::Ignored;
        }
        let Some(pawn) = self.inspected else {
            return Interaction::Ignored;
        };
        let controllable = self
            .turns
            .resources(pawn)
            .is_some_and(|res| res.team() == self.config.player_team);
        if !controllable {
            debug!(pawn, "Abilities of non-player pawns cannot be selected");
            return Interaction::Ignored;
        }
        let Some(mode) = self
            .abilities
            .get(&pawn)
            .and_then(|list| list.get(index))
            .map(|ability| ability.target_mode)
        else {
            return Interaction::Ignored;
        };

        let ability = AbilityRef { pawn, index };
        self.targeting.begin(ability, pawn, mode);
        self.phase = ResolutionPhase::AbilitySelected;
        self.events.push(BattleEvent::AbilitySelected(ability));
        Interaction::AbilitySelected(ability)
    }

    /// Check and, if legal, execute the pending ability.
    ///
    /// A rejection leaves placements and turn budgets untouched and the
    /// ability pending; it still records a
    /// [`BattleEvent::ResolutionRejected`]. Success returns the battle to
    /// idle.
    ///
    /// # Errors
    ///
    /// Returns the ability's [`AbilityRejection`], or
    /// [`AbilityRejection::NoAbilitySelected`] when idle.
    ///
    /// # Panics
    ///
    /// Panics if execution leaves two pawns on one cell.
    pub fn resolve(
        &mut self,
        target_pawn: Option<PawnId>,
        target_cell: Option<GridCoord>,
    ) -> std::result::Result<ResolutionReport, AbilityRejection> {
        let ability_ref = match (self.phase, self.targeting.ability()) {
            (ResolutionPhase::AbilitySelected, Some(ability_ref)) => ability_ref,
            _ => return Err(AbilityRejection::NoAbilitySelected),
        };
        let source = ability_ref.pawn;
        let ability = self
            .abilities
            .get(&source)
            .and_then(|list| list.get(ability_ref.index))
            .cloned()
            .ok_or(AbilityRejection::SourceMissing(source))?;

        let ctx = AbilityContext {
            grid: &self.grid,
            occupancy: &self.occupancy,
            turns: &self.turns,
            source,
            target_pawn,
            target_cell,
            preview: Some(self.targeting.preview()),
        };

        let plan = match ability.check(&ctx) {
            Ok(plan) => plan,
            Err(reason) => {
                debug!(pawn = source, ability = %ability.name, %reason, "Ability rejected");
                self.events.push(BattleEvent::ResolutionRejected {
                    ability: ability_ref,
                    reason: reason.clone(),
                });
                return Err(reason);
            }
        };

        let effect = ability.execute(plan, source, &mut self.occupancy, &mut self.turns);
        if let Err(err) = self.turns.consume(source, ability.cost) {
            panic!("executed ability lost its source: {err}");
        }
        self.check_placements();

        let report = ResolutionReport {
            ability: ability_ref,
            name: ability.name.clone(),
            cost: ability.cost,
            target_pawn,
            target_cell,
            effect,
        };

        info!(pawn = source, ability = %ability.name, "Ability executed");
        match &report.effect {
            AbilityEffect::Moved {
                pawn, from, to, cost, ..
            } => self.events.push(BattleEvent::PawnMoved {
                pawn: *pawn,
                from: *from,
                to: *to,
                cost: *cost,
            }),
        }
        self.events.push(BattleEvent::AbilityExecuted(report.clone()));

        self.targeting.clear();
        self.phase = ResolutionPhase::Idle;
        Ok(report)
    }

    fn resolve_interaction(
        &mut self,
        target_pawn: Option<PawnId>,
        target_cell: Option<GridCoord>,
    ) -> Interaction {
        match self.resolve(target_pawn, target_cell) {
            Ok(report) => Interaction::Resolved(report),
            Err(reason) => Interaction::Rejected(reason),
        }
    }

    /// Drop the pending ability, or the inspected pawn when idle.
    pub fn cancel(&mut self) -> Interaction {
        match self.phase {
            ResolutionPhase::AbilitySelected => {
                let ability = self.targeting.ability();
                self.targeting.clear();
                self.phase = ResolutionPhase::Idle;
                if let Some(ability) = ability {
                    debug!(pawn = ability.pawn, index = ability.index, "Resolution cancelled");
                    self.events.push(BattleEvent::ResolutionCancelled(ability));
                }
                Interaction::Cancelled
            }
            ResolutionPhase::Idle => {
                if self.inspected.take().is_some() {
                    self.events.push(BattleEvent::InspectionCleared);
                    Interaction::Cancelled
                } else {
                    Interaction::Ignored
                }
            }
        }
    }

    fn pending_ability(&self) -> Option<&Ability> {
        let ability = self.targeting.ability()?;
        self.abilities.get(&ability.pawn)?.get(ability.index)
    }

    fn refresh_preview(&mut self) {
        let hovered = self.targeting.hovered();
        self.targeting.hover(hovered, &self.grid, &self.occupancy);
    }

    fn check_placements(&self) {
        if cfg!(any(debug_assertions, feature = "debug-validation")) {
            if let Some(cell) = self.occupancy.find_shared_cell() {
                panic!("two pawns share cell {cell}");
            }
        }
    }

    // ------------------------------------------------------------------
    // Turns
    // ------------------------------------------------------------------

    /// Start `pawn`'s turn.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PawnNotFound`] for unknown pawns.
    pub fn start_turn(&mut self, pawn: PawnId) -> Result<()> {
        self.turns.start_turn(pawn)?;
        self.events.push(BattleEvent::TurnStarted(pawn));
        Ok(())
    }

    /// Start the turn of every pawn on `team`. Returns those pawns.
    pub fn begin_team_turn(&mut self, team: Team) -> Vec<PawnId> {
        let pawns = self.turns.pawns_of_team(team);
        for &pawn in &pawns {
            if self.turns.start_turn(pawn).is_ok() {
                self.events.push(BattleEvent::TurnStarted(pawn));
            }
        }
        info!(team = team.display_name(), pawns = pawns.len(), "Team turn started");
        pawns
    }

    /// Lock selection. Any pending ability is cancelled.
    pub fn suspend_selection(&mut self) {
        if self.phase == ResolutionPhase::AbilitySelected {
            self.cancel();
        }
        self.targeting.set_state(SelectionState::Nothing);
        self.events.push(BattleEvent::SelectionSuspended);
    }

    /// Unlock selection after [`suspend_selection`](Self::suspend_selection).
    pub fn resume_selection(&mut self) {
        if self.targeting.state() == SelectionState::Nothing {
            self.targeting.set_state(SelectionState::AllPawns);
            self.events.push(BattleEvent::SelectionResumed);
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Current selection state.
    #[must_use]
    pub const fn selection_state(&self) -> SelectionState {
        self.targeting.state()
    }

    /// Cells can be picked now.
    #[must_use]
    pub const fn can_select_grid(&self) -> bool {
        self.targeting.state().can_select_grid()
    }

    /// Pawns can be picked now.
    #[must_use]
    pub const fn can_select_pawns(&self) -> bool {
        self.targeting.state().can_select_pawns()
    }

    /// Cell under the pointer.
    #[must_use]
    pub const fn hovered_cell(&self) -> Option<GridCoord> {
        self.targeting.hovered()
    }

    /// Last picked cell.
    #[must_use]
    pub const fn selected_cell(&self) -> Option<GridCoord> {
        self.targeting.selected()
    }

    /// Path preview for the pending move.
    #[must_use]
    pub const fn preview_path(&self) -> &PathResult {
        self.targeting.preview()
    }

    /// Cheapest path between two cells given current placements.
    #[must_use]
    pub fn path_between(&self, from: GridCoord, to: GridCoord) -> PathResult {
        find_path(&self.grid, &self.occupancy, from, to)
    }

    /// Cells `pawn` can reach with its remaining movement, with their costs.
    #[must_use]
    pub fn movement_range(&self, pawn: PawnId) -> BTreeMap<GridCoord, u32> {
        let (Some(from), Some(res)) = (self.occupancy.position_of(pawn), self.turns.resources(pawn))
        else {
            return BTreeMap::new();
        };
        reachable_cells(&self.grid, &self.occupancy, from, res.remaining_movement())
    }

    /// Display data for `pawn`.
    #[must_use]
    pub fn pawn_snapshot(&self, pawn: PawnId) -> Option<PawnSnapshot> {
        let res = self.turns.resources(pawn)?;
        let abilities = self
            .abilities_of(pawn)
            .iter()
            .enumerate()
            .map(|(index, ability)| AbilitySummary {
                index,
                name: ability.name.clone(),
                target_mode: ability.target_mode,
                cost: ability.cost,
                affordable: res.can_perform(ability.cost),
            })
            .collect();

        Some(PawnSnapshot {
            id: pawn,
            team: res.team(),
            position: self.occupancy.position_of(pawn),
            max_movement: res.max_movement(),
            remaining_movement: res.remaining_movement(),
            can_take_action: res.can_take_action(),
            can_take_bonus_action: res.can_take_bonus_action(),
            can_take_reaction: res.can_take_reaction(),
            controllable: res.team() == self.config.player_team,
            abilities,
        })
    }

    /// Take every event recorded since the last call.
    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    /// Hash of placements and turn budgets.
    ///
    /// Two battles fed the same inputs produce the same hash.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();

        self.occupancy.len().hash(&mut hasher);
        for (pawn, coord) in self.occupancy.iter() {
            pawn.hash(&mut hasher);
            coord.hash(&mut hasher);
        }

        for (pawn, res) in self.turns.iter() {
            pawn.hash(&mut hasher);
            res.hash(&mut hasher);
        }

        hasher.finish()
    }
}
