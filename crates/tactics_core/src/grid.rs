//! Grid topology and world/grid conversion.
//!
//! The grid is a fixed `width x height` table of [`Cell`]s built once and
//! never resized. Every coordinate in `[0, width) x [0, height)` has exactly
//! one cell; cells are immutable values.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::GridConfig;
use crate::error::{GameError, Result};
use crate::math::{Fixed, Vec2Fixed};

/// Integer grid coordinate.
///
/// Signed so that neighbor arithmetic can step off the edge of the grid;
/// use [`Grid::is_within_bounds`] before indexing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct GridCoord {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl GridCoord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Coordinate shifted by `(dx, dy)`.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// True if `other` is one of the four diagonal neighbors.
    #[must_use]
    pub fn is_diagonal_to(self, other: Self) -> bool {
        self.x.abs_diff(other.x) == 1 && self.y.abs_diff(other.y) == 1
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    coord: GridCoord,
    center: Vec2Fixed,
    local_center: Vec2Fixed,
}

impl Cell {
    /// Coordinate of this cell.
    #[must_use]
    pub const fn coord(&self) -> GridCoord {
        self.coord
    }

    /// Center of the cell in world space.
    #[must_use]
    pub const fn center(&self) -> Vec2Fixed {
        self.center
    }

    /// Center of the cell relative to the grid origin.
    ///
    /// Use this when positioning things that are themselves children of
    /// the grid.
    #[must_use]
    pub const fn local_center(&self) -> Vec2Fixed {
        self.local_center
    }
}

/// Fixed-size rectangular grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    width: u32,
    height: u32,
    #[serde(with = "crate::math::fixed_serde")]
    cell_size: Fixed,
    origin: Vec2Fixed,
    /// Cell data stored in row-major order.
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a grid anchored at the world origin.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `height` is zero, or if `cell_size` is not positive.
    #[must_use]
    pub fn new(width: u32, height: u32, cell_size: Fixed) -> Self {
        Self::with_origin(width, height, cell_size, Vec2Fixed::ZERO)
    }

    /// Create a grid whose `(0, 0)` corner sits at `origin` in world space.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `height` is zero, if `cell_size` is not positive,
    /// or if a cell center does not fit in [`Fixed`]. Use
    /// [`from_config`](Self::from_config) for untrusted dimensions.
    #[must_use]
    pub fn with_origin(width: u32, height: u32, cell_size: Fixed, origin: Vec2Fixed) -> Self {
        assert!(width > 0, "Grid width must be positive");
        assert!(height > 0, "Grid height must be positive");
        assert!(cell_size > Fixed::ZERO, "Grid cell_size must be positive");

        let mut grid = Self {
            width,
            height,
            cell_size,
            origin,
            cells: Vec::with_capacity((width as usize) * (height as usize)),
        };

        for y in 0..height {
            for x in 0..width {
                let coord = GridCoord::new(x as i32, y as i32);
                let local_center = grid.coordinate_to_local(coord);
                grid.cells.push(Cell {
                    coord,
                    center: origin + local_center,
                    local_center,
                });
            }
        }

        grid
    }

    /// Build a grid from validated configuration.
    pub fn from_config(config: &GridConfig) -> Result<Self> {
        config.validate()?;
        if i32::try_from(config.width).is_err() || i32::try_from(config.height).is_err() {
            return Err(GameError::InvalidConfig(format!(
                "grid {}x{} exceeds the coordinate range",
                config.width, config.height
            )));
        }
        Ok(Self::with_origin(
            config.width,
            config.height,
            config.cell_size,
            config.origin,
        ))
    }

    /// Grid width in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Cell size in world units.
    #[must_use]
    pub const fn cell_size(&self) -> Fixed {
        self.cell_size
    }

    /// World position of the `(0, 0)` grid corner.
    #[must_use]
    pub const fn origin(&self) -> Vec2Fixed {
        self.origin
    }

    /// Check if a coordinate is within grid bounds.
    #[must_use]
    pub fn is_within_bounds(&self, coord: GridCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as u32) < self.width
            && (coord.y as u32) < self.height
    }

    #[inline]
    fn index(&self, coord: GridCoord) -> usize {
        (coord.y as usize) * (self.width as usize) + (coord.x as usize)
    }

    /// Cell at `coord`, or `None` if out of bounds.
    #[must_use]
    pub fn cell(&self, coord: GridCoord) -> Option<&Cell> {
        if self.is_within_bounds(coord) {
            Some(&self.cells[self.index(coord)])
        } else {
            None
        }
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Convert a grid coordinate to the world position of its cell center.
    #[must_use]
    pub fn coordinate_to_world(&self, coord: GridCoord) -> Vec2Fixed {
        self.origin + self.coordinate_to_local(coord)
    }

    fn coordinate_to_local(&self, coord: GridCoord) -> Vec2Fixed {
        let half = self.cell_size / Fixed::from_num(2);
        Vec2Fixed::new(
            Fixed::from_num(coord.x) * self.cell_size + half,
            Fixed::from_num(coord.y) * self.cell_size + half,
        )
    }

    /// Convert a world position to the grid coordinate containing it.
    ///
    /// Each axis is floored independently. Returns `None` if the position
    /// is outside the grid.
    #[must_use]
    pub fn world_to_coordinate(&self, point: Vec2Fixed) -> Option<GridCoord> {
        let x = Self::floor_axis(point.x.checked_sub(self.origin.x)?, self.cell_size)?;
        let y = Self::floor_axis(point.y.checked_sub(self.origin.y)?, self.cell_size)?;

        if x >= 0 && x < i64::from(self.width) && y >= 0 && y < i64::from(self.height) {
            Some(GridCoord::new(x as i32, y as i32))
        } else {
            None
        }
    }

    fn floor_axis(value: Fixed, cell_size: Fixed) -> Option<i64> {
        value
            .checked_div(cell_size)
            .map(|cells| cells.floor().to_num::<i64>())
    }
}

impl Default for Grid {
    /// 20x20 grid with unit cells.
    fn default() -> Self {
        Self::new(20, 20, Fixed::ONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(n: i32) -> Fixed {
        Fixed::from_num(n)
    }

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(10, 8, fixed(2));
        assert_eq!(grid.width(), 10);
        assert_eq!(grid.height(), 8);
        assert_eq!(grid.cell_size(), fixed(2));
        assert_eq!(grid.cells().count(), 80);
    }

    #[test]
    fn test_one_cell_per_coordinate() {
        let grid = Grid::new(4, 3, fixed(1));
        let mut coords: Vec<_> = grid.cells().map(Cell::coord).collect();
        coords.sort_unstable();
        coords.dedup();
        assert_eq!(coords.len(), 12);
        for cell in grid.cells() {
            assert!(grid.is_within_bounds(cell.coord()));
            assert_eq!(grid.cell(cell.coord()), Some(cell));
        }
    }

    #[test]
    #[should_panic(expected = "width must be positive")]
    fn test_zero_width_panics() {
        let _ = Grid::new(0, 5, fixed(1));
    }

    #[test]
    fn test_world_to_coordinate() {
        let grid = Grid::new(10, 10, fixed(2));

        assert_eq!(
            grid.world_to_coordinate(Vec2Fixed::from_ints(1, 1)),
            Some(GridCoord::new(0, 0))
        );
        assert_eq!(
            grid.world_to_coordinate(Vec2Fixed::from_ints(3, 3)),
            Some(GridCoord::new(1, 1))
        );
        assert_eq!(
            grid.world_to_coordinate(Vec2Fixed::from_ints(19, 19)),
            Some(GridCoord::new(9, 9))
        );
        assert_eq!(grid.world_to_coordinate(Vec2Fixed::from_ints(20, 20)), None);
        assert_eq!(grid.world_to_coordinate(Vec2Fixed::from_ints(-1, 0)), None);
    }

    #[test]
    fn test_fractional_negative_is_out_of_bounds() {
        let grid = Grid::new(5, 5, fixed(1));
        let point = Vec2Fixed::new(Fixed::from_num(-0.25), Fixed::from_num(0.5));
        assert_eq!(grid.world_to_coordinate(point), None);
    }

    #[test]
    fn test_coordinate_to_world_is_cell_center() {
        let grid = Grid::new(10, 10, fixed(2));
        assert_eq!(
            grid.coordinate_to_world(GridCoord::new(0, 0)),
            Vec2Fixed::from_ints(1, 1)
        );
        assert_eq!(
            grid.coordinate_to_world(GridCoord::new(1, 1)),
            Vec2Fixed::from_ints(3, 3)
        );
    }

    #[test]
    fn test_origin_offset() {
        let grid = Grid::with_origin(4, 4, fixed(1), Vec2Fixed::from_ints(10, -5));
        let center = grid.coordinate_to_world(GridCoord::new(0, 0));
        assert_eq!(
            center,
            Vec2Fixed::new(Fixed::from_num(10.5), Fixed::from_num(-4.5))
        );
        assert_eq!(
            grid.cell(GridCoord::new(0, 0)).map(Cell::local_center),
            Some(Vec2Fixed::new(Fixed::from_num(0.5), Fixed::from_num(0.5)))
        );
        assert_eq!(
            grid.world_to_coordinate(Vec2Fixed::from_ints(13, -2)),
            Some(GridCoord::new(3, 3))
        );
        assert_eq!(grid.world_to_coordinate(Vec2Fixed::from_ints(9, -5)), None);
    }

    #[test]
    fn test_extreme_point_far_from_origin_is_outside() {
        let grid = Grid::with_origin(4, 4, fixed(1), Vec2Fixed::from_ints(-1_000_000_000, 0));
        let far = Vec2Fixed::new(Fixed::MAX, Fixed::ZERO);
        assert_eq!(grid.world_to_coordinate(far), None);
        assert_eq!(
            grid.world_to_coordinate(Vec2Fixed::from_ints(2_000_000_000, 0)),
            None
        );

        let grid = Grid::with_origin(4, 4, fixed(1), Vec2Fixed::from_ints(1_000_000_000, 0));
        assert_eq!(
            grid.world_to_coordinate(Vec2Fixed::new(Fixed::MIN, Fixed::ZERO)),
            None
        );
        assert_eq!(
            grid.world_to_coordinate(Vec2Fixed::from_ints(1_000_000_001, 2)),
            Some(GridCoord::new(1, 2))
        );
    }

    #[test]
    fn test_grid_round_trips_through_ron() {
        let grid = Grid::with_origin(3, 2, Fixed::from_num(1.5), Vec2Fixed::from_ints(2, -1));
        let text = ron::to_string(&grid).unwrap();
        let parsed: Grid = ron::from_str(&text).unwrap();
        assert_eq!(parsed.cell_size(), grid.cell_size());
        assert_eq!(parsed.origin(), grid.origin());
        assert_eq!(parsed.cells().count(), 6);
    }

    #[test]
    fn test_from_config_rejects_overflowing_extent() {
        let config = GridConfig {
            width: 10,
            height: 10,
            cell_size: Fixed::from_num(1_000_000_000),
            origin: Vec2Fixed::ZERO,
        };
        assert!(matches!(
            Grid::from_config(&config),
            Err(GameError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_bounds() {
        let grid = Grid::new(3, 2, fixed(1));
        assert!(grid.is_within_bounds(GridCoord::new(2, 1)));
        assert!(!grid.is_within_bounds(GridCoord::new(3, 1)));
        assert!(!grid.is_within_bounds(GridCoord::new(0, 2)));
        assert!(!grid.is_within_bounds(GridCoord::new(-1, 0)));
        assert!(grid.cell(GridCoord::new(0, -1)).is_none());
    }

    #[test]
    fn test_diagonal_detection() {
        let a = GridCoord::new(1, 1);
        assert!(a.is_diagonal_to(GridCoord::new(2, 2)));
        assert!(a.is_diagonal_to(GridCoord::new(0, 2)));
        assert!(!a.is_diagonal_to(GridCoord::new(1, 2)));
        assert!(!a.is_diagonal_to(GridCoord::new(3, 3)));
    }
}
