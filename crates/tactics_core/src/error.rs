//! Error types for setup and configuration of the rules core.
//!
//! Expected gameplay failures (a forbidden pick, a move the pawn cannot
//! afford, a route that does not exist) are not errors: they travel as
//! `Option`, [`PathResult`](crate::pathfinding::PathResult) or
//! [`AbilityRejection`](crate::ability::AbilityRejection) values.

use thiserror::Error;

use crate::grid::GridCoord;
use crate::turn::PawnId;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for battle setup and configuration.
#[derive(Debug, Error)]
pub enum GameError {
    /// No pawn with this identifier exists.
    #[error("Pawn not found: {0}")]
    PawnNotFound(PawnId),

    /// Coordinate lies outside the grid.
    #[error("Coordinate {0} is outside the grid")]
    OutOfBounds(GridCoord),

    /// Another pawn already stands on the coordinate.
    #[error("Cell {coord} is already occupied by pawn {occupant}")]
    CellOccupied {
        /// Requested cell.
        coord: GridCoord,
        /// Pawn currently standing there.
        occupant: PawnId,
    },

    /// Configuration values are unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to parse a RON configuration document.
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] ron::error::SpannedError),

    /// Failed to read a configuration file.
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
}
