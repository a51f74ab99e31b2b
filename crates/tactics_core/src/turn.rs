//! Per-turn resource economy.
//!
//! Every pawn carries a movement budget and three one-shot action slots
//! (action, bonus action, reaction). All of them refill when the pawn's
//! turn starts, but a slot the pawn is not capable of never refills.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{GameError, Result};

/// Unique identifier for pawns.
pub type PawnId = u32;

/// Team affiliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Team {
    /// Belongs to nobody; hostile to both teams for targeting purposes.
    Neutral,
    /// Red team.
    Red,
    /// Blue team.
    Blue,
}

impl Team {
    /// Display name for this team.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Neutral => "Neutral",
            Self::Red => "Red",
            Self::Blue => "Blue",
        }
    }
}

/// What an ability consumes from the turn economy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ActionCost {
    /// Costs nothing.
    #[default]
    Free,
    /// Consumes the action.
    Action,
    /// Consumes the bonus action.
    BonusAction,
    /// Consumes the reaction.
    Reaction,
    /// Reserved for rules that do not exist yet; never affordable.
    Special,
}

/// Which action slots a pawn has at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionCapabilities {
    /// Pawn can take actions.
    pub action: bool,
    /// Pawn can take bonus actions.
    pub bonus_action: bool,
    /// Pawn can take reactions.
    pub reaction: bool,
}

impl Default for ActionCapabilities {
    fn default() -> Self {
        Self::ALL
    }
}

impl ActionCapabilities {
    /// Capable of every action slot.
    pub const ALL: Self = Self {
        action: true,
        bonus_action: true,
        reaction: true,
    };

    /// Capable of no action slot.
    pub const NONE: Self = Self {
        action: false,
        bonus_action: false,
        reaction: false,
    };
}

/// Turn budget of a single pawn.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PawnResources {
    team: Team,
    max_movement: u32,
    remaining_movement: u32,
    capabilities: ActionCapabilities,
    action_used: bool,
    bonus_action_used: bool,
    reaction_used: bool,
}

impl PawnResources {
    /// Fresh budget: full movement, every capable slot available.
    ///
    /// Slots the pawn is not capable of start (and stay) used.
    #[must_use]
    pub fn new(team: Team, max_movement: u32, capabilities: ActionCapabilities) -> Self {
        Self {
            team,
            max_movement,
            remaining_movement: max_movement,
            capabilities,
            action_used: !capabilities.action,
            bonus_action_used: !capabilities.bonus_action,
            reaction_used: !capabilities.reaction,
        }
    }

    /// Team affiliation.
    #[must_use]
    pub const fn team(&self) -> Team {
        self.team
    }

    /// Movement budget at the start of each turn.
    #[must_use]
    pub const fn max_movement(&self) -> u32 {
        self.max_movement
    }

    /// Movement left this turn.
    #[must_use]
    pub const fn remaining_movement(&self) -> u32 {
        self.remaining_movement
    }

    /// Declared action slots.
    #[must_use]
    pub const fn capabilities(&self) -> ActionCapabilities {
        self.capabilities
    }

    /// Action slot still available.
    #[must_use]
    pub const fn can_take_action(&self) -> bool {
        !self.action_used
    }

    /// Bonus action slot still available.
    #[must_use]
    pub const fn can_take_bonus_action(&self) -> bool {
        !self.bonus_action_used
    }

    /// Reaction slot still available.
    #[must_use]
    pub const fn can_take_reaction(&self) -> bool {
        !self.reaction_used
    }

    /// Refill movement and every slot the pawn is capable of.
    pub fn start_turn(&mut self) {
        self.remaining_movement = self.max_movement;
        if self.capabilities.action {
            self.action_used = false;
        }
        if self.capabilities.bonus_action {
            self.bonus_action_used = false;
        }
        if self.capabilities.reaction {
            self.reaction_used = false;
        }
    }

    /// Whether `cost` can be paid right now.
    #[must_use]
    pub const fn can_perform(&self, cost: ActionCost) -> bool {
        match cost {
            ActionCost::Free => true,
            ActionCost::Action => !self.action_used,
            ActionCost::BonusAction => !self.bonus_action_used,
            ActionCost::Reaction => !self.reaction_used,
            ActionCost::Special => false,
        }
    }

    /// Mark the slot behind `cost` as used. Free and Special consume nothing.
    pub fn consume(&mut self, cost: ActionCost) {
        match cost {
            ActionCost::Free | ActionCost::Special => {}
            ActionCost::Action => self.action_used = true,
            ActionCost::BonusAction => self.bonus_action_used = true,
            ActionCost::Reaction => self.reaction_used = true,
        }
    }

    /// Spend movement, clamped at zero. Returns the amount actually spent.
    pub fn spend_movement(&mut self, amount: u32) -> u32 {
        let spent = amount.min(self.remaining_movement);
        self.remaining_movement -= spent;
        spent
    }
}

/// Owns the turn budgets of every pawn in a battle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TurnTracker {
    pawns: BTreeMap<PawnId, PawnResources>,
}

impl TurnTracker {
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a pawn's budget.
    pub fn register(&mut self, pawn: PawnId, resources: PawnResources) {
        self.pawns.insert(pawn, resources);
    }

    /// Forget a pawn.
    pub fn remove(&mut self, pawn: PawnId) -> Option<PawnResources> {
        self.pawns.remove(&pawn)
    }

    /// Budget of a pawn.
    #[must_use]
    pub fn resources(&self, pawn: PawnId) -> Option<&PawnResources> {
        self.pawns.get(&pawn)
    }

    /// Iterate budgets in pawn-id order.
    pub fn iter(&self) -> impl Iterator<Item = (PawnId, &PawnResources)> {
        self.pawns.iter().map(|(&id, res)| (id, res))
    }

    /// Pawns on `team`, in id order.
    #[must_use]
    pub fn pawns_of_team(&self, team: Team) -> Vec<PawnId> {
        self.iter()
            .filter(|(_, res)| res.team() == team)
            .map(|(id, _)| id)
            .collect()
    }

    fn get_mut(&mut self, pawn: PawnId) -> Result<&mut PawnResources> {
        self.pawns
            .get_mut(&pawn)
            .ok_or(GameError::PawnNotFound(pawn))
    }

    /// Start `pawn`'s turn.
    pub fn start_turn(&mut self, pawn: PawnId) -> Result<()> {
        let resources = self.get_mut(pawn)?;
        resources.start_turn();
        info!(
            pawn,
            movement = resources.remaining_movement(),
            "Turn started"
        );
        Ok(())
    }

    /// Whether `pawn` can pay `cost`. Unknown pawns can pay nothing.
    #[must_use]
    pub fn can_perform_action(&self, pawn: PawnId, cost: ActionCost) -> bool {
        self.resources(pawn).is_some_and(|res| res.can_perform(cost))
    }

    /// Spend movement for `pawn`, clamped at zero.
    pub fn spend_movement(&mut self, pawn: PawnId, amount: u32) -> Result<u32> {
        Ok(self.get_mut(pawn)?.spend_movement(amount))
    }

    /// Mark the slot behind `cost` used for `pawn`.
    pub fn consume(&mut self, pawn: PawnId, cost: ActionCost) -> Result<()> {
        self.get_mut(pawn)?.consume(cost);
        Ok(())
    }
}
