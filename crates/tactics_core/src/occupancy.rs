//! Pawn placement on the grid.
//!
//! The tracker maps each pawn to exactly one coordinate. It does not by
//! itself forbid two pawns sharing a cell; [`OccupancyTracker::move_pawn`]
//! refuses moves onto another pawn and the battle checks placements.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::GridCoord;
use crate::turn::PawnId;

/// Read-only view of which cells are blocked by pawns.
///
/// The pathfinder only needs this query, so callers may hand it a
/// snapshot or a hypothetical layout instead of the live tracker.
pub trait OccupancyView {
    /// True if some pawn stands on `coord`.
    fn is_occupied(&self, coord: GridCoord) -> bool;
}

/// Reasons a move was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OccupancyError {
    /// The pawn has never been placed.
    #[error("Pawn {0} has no placement")]
    NotPlaced(PawnId),
    /// A different pawn already stands on the destination.
    #[error("Cell {coord} is occupied by pawn {occupant}")]
    Occupied {
        /// Requested destination.
        coord: GridCoord,
        /// Pawn standing there.
        occupant: PawnId,
    },
}

/// Pawn to coordinate map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyTracker {
    positions: BTreeMap<PawnId, GridCoord>,
}

impl OccupancyTracker {
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `pawn` on `coord`, replacing any previous placement.
    pub fn place(&mut self, pawn: PawnId, coord: GridCoord) {
        self.positions.insert(pawn, coord);
    }

    /// Take `pawn` off the grid.
    pub fn remove(&mut self, pawn: PawnId) -> Option<GridCoord> {
        self.positions.remove(&pawn)
    }

    /// Where `pawn` stands.
    #[must_use]
    pub fn position_of(&self, pawn: PawnId) -> Option<GridCoord> {
        self.positions.get(&pawn).copied()
    }

    /// The pawn standing on `coord`, lowest id first if several do.
    #[must_use]
    pub fn occupant_at(&self, coord: GridCoord) -> Option<PawnId> {
        self.positions
            .iter()
            .find(|(_, &pos)| pos == coord)
            .map(|(&id, _)| id)
    }

    /// True if some pawn stands on `coord`.
    #[must_use]
    pub fn is_occupied(&self, coord: GridCoord) -> bool {
        self.positions.values().any(|&pos| pos == coord)
    }

    /// Move `pawn` to `to`. Returns the coordinate it left.
    ///
    /// Fails without touching the map if the pawn is unplaced or another
    /// pawn stands on `to`.
    pub fn move_pawn(&mut self, pawn: PawnId, to: GridCoord) -> Result<GridCoord, OccupancyError> {
        let from = self
            .position_of(pawn)
            .ok_or(OccupancyError::NotPlaced(pawn))?;

        if let Some(occupant) = self.occupant_at(to).filter(|&id| id != pawn) {
            return Err(OccupancyError::Occupied { coord: to, occupant });
        }

        self.positions.insert(pawn, to);
        Ok(from)
    }

    /// Placements in pawn-id order.
    pub fn iter(&self) -> impl Iterator<Item = (PawnId, GridCoord)> + '_ {
        self.positions.iter().map(|(&id, &pos)| (id, pos))
    }

    /// Number of placed pawns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// True if no pawn is placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// First coordinate held by more than one pawn, if any.
    #[must_use]
    pub fn find_shared_cell(&self) -> Option<GridCoord> {
        let mut seen = std::collections::BTreeSet::new();
        self.positions.values().copied().find(|&pos| !seen.insert(pos))
    }
}

impl OccupancyView for OccupancyTracker {
    fn is_occupied(&self, coord: GridCoord) -> bool {
        OccupancyTracker::is_occupied(self, coord)
    }
}

impl OccupancyView for std::collections::HashSet<GridCoord> {
    fn is_occupied(&self, coord: GridCoord) -> bool {
        self.contains(&coord)
    }
}

impl OccupancyView for std::collections::BTreeSet<GridCoord> {
    fn is_occupied(&self, coord: GridCoord) -> bool {
        self.contains(&coord)
    }
}
