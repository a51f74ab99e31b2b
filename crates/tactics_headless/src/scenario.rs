//! Scenario loading and configuration.
//!
//! Scenarios define the rules and the starting pawns of a battle.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tactics_core::ability::{Ability, AbilityKind, TargetMode};
use tactics_core::battle::{Battle, PawnSpec};
use tactics_core::config::{GridConfig, RulesConfig};
use tactics_core::error::GameError;
use tactics_core::grid::GridCoord;
use tactics_core::math::Fixed;
use tactics_core::turn::{ActionCapabilities, ActionCost, Team};
use thiserror::Error;

/// Error type for scenario operations.
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// File not found.
    #[error("Scenario file not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("Failed to read scenario file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("Failed to parse scenario: {0}")]
    ParseError(#[from] ron::error::SpannedError),
    /// Rules or placements are invalid.
    #[error("Invalid scenario: {0}")]
    Invalid(#[from] GameError),
}

/// A pawn and where it starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PawnPlacement {
    /// Starting cell.
    pub position: GridCoord,
    /// Pawn parameters.
    pub pawn: PawnSpec,
}

impl PawnPlacement {
    /// Place `pawn` at `(x, y)`.
    #[must_use]
    pub fn new(x: i32, y: i32, pawn: PawnSpec) -> Self {
        Self {
            position: GridCoord::new(x, y),
            pawn,
        }
    }
}

/// A complete scenario configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Battle rules.
    #[serde(default)]
    pub rules: RulesConfig,
    /// Starting pawns; ids are assigned in this order starting at 1.
    #[serde(default)]
    pub pawns: Vec<PawnPlacement>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::skirmish()
    }
}

impl Scenario {
    /// Load a scenario from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScenarioError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Load from a RON string (useful for embedded scenarios).
    pub fn from_ron_str(ron: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = ron::from_str(ron)?;
        Ok(scenario)
    }

    /// Build the battle this scenario describes.
    pub fn build(&self) -> Result<Battle, ScenarioError> {
        let mut battle = Battle::new(self.rules.clone())?;
        for placement in &self.pawns {
            battle.spawn_pawn(placement.pawn.clone(), placement.position)?;
        }
        tracing::info!(
            scenario = %self.name,
            pawns = self.pawns.len(),
            "Scenario built"
        );
        Ok(battle)
    }

    /// Three red pawns against three blue pawns with a neutral in the middle.
    #[must_use]
    pub fn skirmish() -> Self {
        let strike = Ability::new(
            "Strike",
            AbilityKind::Inert,
            TargetMode::EnemyPawn,
            ActionCost::Action,
        );
        let brace = Ability::new(
            "Brace",
            AbilityKind::Inert,
            TargetMode::SelfOnly,
            ActionCost::Reaction,
        );
        let soldier = |team| {
            PawnSpec::new(team)
                .with_ability(strike.clone())
                .with_ability(brace.clone())
        };
        let scout = |team| PawnSpec::new(team).with_movement(100);

        Self {
            name: "Skirmish".to_string(),
            description: "Three against three across an open field".to_string(),
            rules: RulesConfig {
                grid: GridConfig {
                    width: 10,
                    height: 8,
                    cell_size: Fixed::ONE,
                    ..GridConfig::default()
                },
                ..RulesConfig::default()
            },
            pawns: vec![
                PawnPlacement::new(1, 2, soldier(Team::Red)),
                PawnPlacement::new(1, 5, soldier(Team::Red)),
                PawnPlacement::new(0, 3, scout(Team::Red)),
                PawnPlacement::new(8, 2, soldier(Team::Blue)),
                PawnPlacement::new(8, 5, soldier(Team::Blue)),
                PawnPlacement::new(9, 4, scout(Team::Blue)),
                PawnPlacement::new(
                    5,
                    4,
                    PawnSpec::new(Team::Neutral)
                        .with_movement(0)
                        .with_capabilities(ActionCapabilities::NONE),
                ),
            ],
        }
    }
}
