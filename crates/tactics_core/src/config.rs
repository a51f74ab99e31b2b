//! Rules configuration injected into a [`Battle`](crate::battle::Battle).
//!
//! Configuration is plain data, loaded from RON and validated once at
//! construction. Nothing here is global; every battle owns its copy.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::math::{fixed_serde, Fixed, Vec2Fixed};
use crate::turn::Team;

/// Movement budget given to pawns that do not specify one.
///
/// Seven orthogonal steps at 10 cost units each.
pub const DEFAULT_MOVEMENT: u32 = 70;

/// Grid dimensions and placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Width in cells.
    pub width: u32,
    /// Height in cells.
    pub height: u32,
    /// Edge length of one cell in world units.
    #[serde(with = "fixed_serde")]
    pub cell_size: Fixed,
    /// World position of the `(0, 0)` grid corner.
    #[serde(default)]
    pub origin: Vec2Fixed,
}

impl GridConfig {
    /// Check that the grid can be built.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GameError::InvalidConfig(format!(
                "grid dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.cell_size <= Fixed::ZERO {
            return Err(GameError::InvalidConfig(format!(
                "cell size must be positive, got {}",
                self.cell_size
            )));
        }
        for (axis, cells, origin) in [
            ("x", self.width, self.origin.x),
            ("y", self.height, self.origin.y),
        ] {
            let far_edge = Fixed::checked_from_num(cells)
                .and_then(|cells| cells.checked_mul(self.cell_size))
                .and_then(|extent| extent.checked_add(origin));
            if far_edge.is_none() {
                return Err(GameError::InvalidConfig(format!(
                    "grid extent along {axis} ({cells} cells of {}) from origin {origin} \
                     exceeds the world coordinate range",
                    self.cell_size
                )));
            }
        }
        Ok(())
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            cell_size: Fixed::ONE,
            origin: Vec2Fixed::ZERO,
        }
    }
}

/// Complete rules configuration for one battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Grid layout.
    #[serde(default)]
    pub grid: GridConfig,
    /// Team controlled by the local player; only its pawns may use abilities.
    #[serde(default = "default_player_team")]
    pub player_team: Team,
    /// Movement budget for pawns that do not declare their own.
    #[serde(default = "default_movement")]
    pub default_movement: u32,
}

fn default_player_team() -> Team {
    Team::Red
}

fn default_movement() -> u32 {
    DEFAULT_MOVEMENT
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            player_team: default_player_team(),
            default_movement: DEFAULT_MOVEMENT,
        }
    }
}

impl RulesConfig {
    /// Parse from a RON string.
    pub fn from_ron_str(ron: &str) -> Result<Self> {
        let config: Self = ron::from_str(ron)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<()> {
        self.grid.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = RulesConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grid.width, 20);
        assert_eq!(config.default_movement, DEFAULT_MOVEMENT);
    }

    #[test]
    fn test_parse_ron() {
        let config = RulesConfig::from_ron_str(
            r"(
                grid: (width: 8, height: 6, cell_size: 2.0, origin: (x: 1.0, y: 0.5)),
                player_team: Blue,
            )",
        )
        .unwrap();
        assert_eq!(config.grid.width, 8);
        assert_eq!(config.grid.height, 6);
        assert_eq!(config.grid.cell_size, Fixed::from_num(2));
        assert_eq!(config.grid.origin.y, Fixed::from_num(0.5));
        assert_eq!(config.player_team, Team::Blue);
        assert_eq!(config.default_movement, DEFAULT_MOVEMENT);
    }

    #[test]
    fn test_rejects_zero_cell_size() {
        let result =
            RulesConfig::from_ron_str("(grid: (width: 4, height: 4, cell_size: 0.0))");
        assert!(matches!(result, Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_empty_grid() {
        let result =
            RulesConfig::from_ron_str("(grid: (width: 0, height: 4, cell_size: 1.0))");
        assert!(matches!(result, Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_extent_beyond_world_range() {
        let result =
            RulesConfig::from_ron_str("(grid: (width: 10, height: 10, cell_size: 1000000000.0))");
        assert!(matches!(result, Err(GameError::InvalidConfig(_))));

        let result = RulesConfig::from_ron_str(
            "(grid: (width: 4, height: 4, cell_size: 1.0, origin: (x: 0.0, y: 2147483646.0)))",
        );
        assert!(matches!(result, Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn test_accepts_far_origin_that_fits() {
        let result = RulesConfig::from_ron_str(
            "(grid: (width: 4, height: 4, cell_size: 1.0, origin: (x: -2000000000.0, y: 0.0)))",
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_parse_error_is_reported() {
        let result = RulesConfig::from_ron_str("(grid: oops)");
        assert!(matches!(result, Err(GameError::ConfigParse(_))));
    }
}
