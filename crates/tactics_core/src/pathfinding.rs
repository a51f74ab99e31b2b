//! Grid-based pathfinding using the A* algorithm.
//!
//! Movement is 8-directional with integer octile costs: 10 per orthogonal
//! step and 14 per diagonal step, so no floating-point error accumulates
//! along long routes. Cells held by pawns are impassable, and a diagonal
//! step may not squeeze between two blocked orthogonal corners.
//!
//! Both queries here are pure: they read the grid and an occupancy view
//! and never mutate either.

use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, BinaryHeap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::grid::{Grid, GridCoord};
use crate::occupancy::OccupancyView;

/// Cost of one orthogonal step.
pub const ORTHOGONAL_COST: u32 = 10;

/// Cost of one diagonal step (integer approximation of 10 * sqrt(2)).
pub const DIAGONAL_COST: u32 = 14;

/// Direction offsets for 8-directional movement.
const DIRECTIONS: [(i32, i32); 8] = [
    (1, 0),   // East
    (1, 1),   // Southeast
    (0, 1),   // South
    (-1, 1),  // Southwest
    (-1, 0),  // West
    (-1, -1), // Northwest
    (0, -1),  // North
    (1, -1),  // Northeast
];

/// Outcome of a path query.
///
/// An invalid result always has no steps and zero cost. A query from a
/// cell to itself is valid with no steps and zero cost.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathResult {
    valid: bool,
    start: GridCoord,
    end: GridCoord,
    steps: Vec<GridCoord>,
    cost: u32,
}

impl PathResult {
    /// A failed query between `start` and `end`.
    #[must_use]
    pub const fn invalid(start: GridCoord, end: GridCoord) -> Self {
        Self {
            valid: false,
            start,
            end,
            steps: Vec::new(),
            cost: 0,
        }
    }

    /// The zero-length path from a cell to itself.
    #[must_use]
    pub const fn stationary(at: GridCoord) -> Self {
        Self {
            valid: true,
            start: at,
            end: at,
            steps: Vec::new(),
            cost: 0,
        }
    }

    /// Whether a route was found.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Requested start.
    #[must_use]
    pub const fn start(&self) -> GridCoord {
        self.start
    }

    /// Requested end.
    #[must_use]
    pub const fn end(&self) -> GridCoord {
        self.end
    }

    /// Cells visited after `start`, ending with `end`.
    #[must_use]
    pub fn steps(&self) -> &[GridCoord] {
        &self.steps
    }

    /// Total movement cost.
    #[must_use]
    pub const fn cost(&self) -> u32 {
        self.cost
    }

    /// True if this is a valid route from `start` to `end`.
    #[must_use]
    pub fn connects(&self, start: GridCoord, end: GridCoord) -> bool {
        self.valid && self.start == start && self.end == end
    }
}

impl Default for PathResult {
    fn default() -> Self {
        Self::invalid(GridCoord::default(), GridCoord::default())
    }
}

/// Cost of stepping between two adjacent cells, `None` if not adjacent.
#[must_use]
pub fn step_cost(from: GridCoord, to: GridCoord) -> Option<u32> {
    match (from.x.abs_diff(to.x), from.y.abs_diff(to.y)) {
        (1, 1) => Some(DIAGONAL_COST),
        (1, 0) | (0, 1) => Some(ORTHOGONAL_COST),
        _ => None,
    }
}

/// Octile distance heuristic matching the 10/14 step costs.
#[inline]
#[must_use]
pub fn octile_heuristic(from: GridCoord, to: GridCoord) -> u32 {
    let dx = from.x.abs_diff(to.x);
    let dy = from.y.abs_diff(to.y);
    let diagonal = dx.min(dy);
    let straight = dx.max(dy) - diagonal;
    DIAGONAL_COST * diagonal + ORTHOGONAL_COST * straight
}

/// A node in the A* open set priority queue.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct AStarNode {
    coord: GridCoord,
    f_score: u32,
    h_score: u32,
}

impl Ord for AStarNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: reverse every comparison so the lowest f
        // pops first, then the lowest h, then the lowest row-major coordinate.
        other
            .f_score
            .cmp(&self.f_score)
            .then_with(|| other.h_score.cmp(&self.h_score))
            .then_with(|| (other.coord.y, other.coord.x).cmp(&(self.coord.y, self.coord.x)))
    }
}

impl PartialOrd for AStarNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Check if a step is allowed: in bounds, unoccupied, and for diagonals
/// both orthogonal corner cells in bounds and unoccupied.
#[inline]
fn can_step<O: OccupancyView + ?Sized>(
    grid: &Grid,
    occupancy: &O,
    from: GridCoord,
    dx: i32,
    dy: i32,
) -> bool {
    let to = from.offset(dx, dy);
    if !grid.is_within_bounds(to) || occupancy.is_occupied(to) {
        return false;
    }
    if dx != 0 && dy != 0 {
        let horizontal = from.offset(dx, 0);
        let vertical = from.offset(0, dy);
        grid.is_within_bounds(horizontal)
            && grid.is_within_bounds(vertical)
            && !occupancy.is_occupied(horizontal)
            && !occupancy.is_occupied(vertical)
    } else {
        true
    }
}

#[inline]
fn direction_cost(dx: i32, dy: i32) -> u32 {
    if dx != 0 && dy != 0 {
        DIAGONAL_COST
    } else {
        ORTHOGONAL_COST
    }
}

/// Find the cheapest path from `start` to `end`.
///
/// Returns an invalid result if either endpoint is out of bounds or no
/// route exists. `end` itself must be unoccupied to be reachable; `start`
/// may be occupied (normally by the pawn that is moving).
pub fn find_path<O: OccupancyView + ?Sized>(
    grid: &Grid,
    occupancy: &O,
    start: GridCoord,
    end: GridCoord,
) -> PathResult {
    if !grid.is_within_bounds(start) || !grid.is_within_bounds(end) {
        debug!(%start, %end, "Path query outside grid");
        return PathResult::invalid(start, end);
    }

    if start == end {
        return PathResult::stationary(start);
    }

    let mut open_set: BinaryHeap<AStarNode> = BinaryHeap::new();
    let mut closed: HashSet<GridCoord> = HashSet::new();
    let mut came_from: HashMap<GridCoord, GridCoord> = HashMap::new();
    let mut g_score: HashMap<GridCoord, u32> = HashMap::new();

    let start_h = octile_heuristic(start, end);
    g_score.insert(start, 0);
    open_set.push(AStarNode {
        coord: start,
        f_score: start_h,
        h_score: start_h,
    });

    while let Some(current) = open_set.pop() {
        // Stale entry for a node already finalized with a better score.
        if closed.contains(&current.coord) {
            continue;
        }

        let Some(&current_g) = g_score.get(&current.coord) else {
            continue;
        };

        if current.coord == end {
            let path = reconstruct_path(&came_from, start, end, current_g);
            debug!(%start, %end, cost = path.cost(), steps = path.steps().len(), "Path found");
            return path;
        }

        closed.insert(current.coord);

        for &(dx, dy) in &DIRECTIONS {
            let neighbor = current.coord.offset(dx, dy);

            if closed.contains(&neighbor) {
                continue;
            }

            if !can_step(grid, occupancy, current.coord, dx, dy) {
                continue;
            }

            let tentative_g = current_g + direction_cost(dx, dy);
            let neighbor_g = g_score.get(&neighbor).copied().unwrap_or(u32::MAX);

            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.coord);
                g_score.insert(neighbor, tentative_g);

                let h = octile_heuristic(neighbor, end);
                open_set.push(AStarNode {
                    coord: neighbor,
                    f_score: tentative_g + h,
                    h_score: h,
                });
            }
        }
    }

    debug!(%start, %end, "No path");
    PathResult::invalid(start, end)
}

/// Walk parent links back from `end` and reverse.
fn reconstruct_path(
    came_from: &HashMap<GridCoord, GridCoord>,
    start: GridCoord,
    end: GridCoord,
    cost: u32,
) -> PathResult {
    let mut steps = Vec::new();
    let mut current = end;

    while current != start {
        steps.push(current);
        match came_from.get(&current) {
            Some(&prev) => current = prev,
            None => unreachable!("A* parent chain broken at {current}"),
        }
    }

    steps.reverse();
    PathResult {
        valid: true,
        start,
        end,
        steps,
        cost,
    }
}

/// Every cell reachable from `start` for at most `budget`, with its
/// cheapest cost.
///
/// Uses the same step rules as [`find_path`]. `start` is included at cost
/// zero; an out-of-bounds `start` yields an empty map.
pub fn reachable_cells<O: OccupancyView + ?Sized>(
    grid: &Grid,
    occupancy: &O,
    start: GridCoord,
    budget: u32,
) -> BTreeMap<GridCoord, u32> {
    let mut best: BTreeMap<GridCoord, u32> = BTreeMap::new();
    if !grid.is_within_bounds(start) {
        return best;
    }

    let mut frontier = BinaryHeap::new();
    best.insert(start, 0);
    frontier.push(Reverse((0u32, start)));

    while let Some(Reverse((cost, coord))) = frontier.pop() {
        if best.get(&coord).is_some_and(|&known| known < cost) {
            continue;
        }

        for &(dx, dy) in &DIRECTIONS {
            if !can_step(grid, occupancy, coord, dx, dy) {
                continue;
            }

            let next_cost = cost + direction_cost(dx, dy);
            if next_cost > budget {
                continue;
            }

            let neighbor = coord.offset(dx, dy);
            if best.get(&neighbor).map_or(true, |&known| next_cost < known) {
                best.insert(neighbor, next_cost);
                frontier.push(Reverse((next_cost, neighbor)));
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::math::Fixed;

    fn grid(width: u32, height: u32) -> Grid {
        Grid::new(width, height, Fixed::ONE)
    }

    fn at(x: i32, y: i32) -> GridCoord {
        GridCoord::new(x, y)
    }

    fn blocked(cells: &[(i32, i32)]) -> HashSet<GridCoord> {
        cells.iter().map(|&(x, y)| at(x, y)).collect()
    }

    fn summed_cost(path: &PathResult) -> u32 {
        let mut prev = path.start();
        let mut total = 0;
        for &step in path.steps() {
            total += step_cost(prev, step).expect("steps must be adjacent");
            prev = step;
        }
        total
    }

    #[test]
    fn test_octile_heuristic() {
        assert_eq!(octile_heuristic(at(0, 0), at(4, 4)), 56);
        assert_eq!(octile_heuristic(at(0, 0), at(3, 7)), 3 * 14 + 4 * 10);
        assert_eq!(octile_heuristic(at(5, 5), at(5, 5)), 0);
    }

    #[test]
    fn test_open_grid_diagonal() {
        let path = find_path(&grid(5, 5), &blocked(&[]), at(0, 0), at(4, 4));
        assert!(path.is_valid());
        assert_eq!(path.cost(), 56);
        assert_eq!(path.steps(), &[at(1, 1), at(2, 2), at(3, 3), at(4, 4)]);
    }

    #[test]
    fn test_straight_line() {
        let path = find_path(&grid(6, 1), &blocked(&[]), at(0, 0), at(5, 0));
        assert!(path.is_valid());
        assert_eq!(path.cost(), 50);
        assert_eq!(path.steps().len(), 5);
    }

    #[test]
    fn test_same_cell_is_stationary() {
        let occupied = blocked(&[(2, 2)]);
        let path = find_path(&grid(5, 5), &occupied, at(2, 2), at(2, 2));
        assert!(path.is_valid());
        assert!(path.steps().is_empty());
        assert_eq!(path.cost(), 0);
    }

    #[test]
    fn test_out_of_bounds_is_invalid() {
        let g = grid(5, 5);
        let path = find_path(&g, &blocked(&[]), at(0, 0), at(5, 0));
        assert!(!path.is_valid());
        assert!(path.steps().is_empty());
        assert_eq!(path.cost(), 0);

        let path = find_path(&g, &blocked(&[]), at(-1, 0), at(-1, 0));
        assert!(!path.is_valid());
    }

    #[test]
    fn test_corner_cutting_rejected() {
        // Occupant at (1, 0) forbids the direct diagonal (0,0) -> (1,1).
        let path = find_path(&grid(3, 3), &blocked(&[(1, 0)]), at(0, 0), at(1, 1));
        assert!(path.is_valid());
        assert_eq!(path.cost(), 20);
        assert_eq!(path.steps(), &[at(0, 1), at(1, 1)]);
    }

    #[test]
    fn test_corner_cutting_other_side() {
        let path = find_path(&grid(3, 3), &blocked(&[(0, 1)]), at(0, 0), at(1, 1));
        assert!(path.is_valid());
        assert_eq!(path.cost(), 20);
        assert_eq!(path.steps(), &[at(1, 0), at(1, 1)]);
    }

    #[test]
    fn test_diagonal_gap_is_sealed() {
        // Both corners blocked: (0,0) is boxed in on a 2x2 grid.
        let path = find_path(&grid(2, 2), &blocked(&[(1, 0), (0, 1)]), at(0, 0), at(1, 1));
        assert!(!path.is_valid());
        assert!(path.steps().is_empty());
        assert_eq!(path.cost(), 0);
    }

    #[test]
    fn test_occupied_goal_is_unreachable() {
        let path = find_path(&grid(5, 5), &blocked(&[(3, 3)]), at(0, 0), at(3, 3));
        assert!(!path.is_valid());
    }

    #[test]
    fn test_path_around_wall() {
        let wall: Vec<_> = (0..4).map(|y| (3, y)).collect();
        let occupied = blocked(&wall);
        let path = find_path(&grid(7, 5), &occupied, at(0, 0), at(6, 0));

        assert!(path.is_valid());
        assert_eq!(summed_cost(&path), path.cost());
        for step in path.steps() {
            assert!(!occupied.contains(step), "path crosses occupied {step}");
        }
        assert_eq!(path.steps().last(), Some(&at(6, 0)));
    }

    #[test]
    fn test_no_path_exists() {
        let wall: Vec<_> = (0..5).map(|y| (2, y)).collect();
        let path = find_path(&grid(5, 5), &blocked(&wall), at(0, 2), at(4, 2));
        assert!(!path.is_valid());
        assert_eq!(path.start(), at(0, 2));
        assert_eq!(path.end(), at(4, 2));
    }

    #[test]
    fn test_determinism() {
        let wall: Vec<_> = (2..8).map(|y| (5, y)).collect();
        let occupied = blocked(&wall);
        let g = grid(12, 12);

        let first = find_path(&g, &occupied, at(1, 5), at(10, 6));
        for _ in 0..5 {
            assert_eq!(find_path(&g, &occupied, at(1, 5), at(10, 6)), first);
        }
    }

    #[test]
    fn test_tie_break_prefers_closer_to_goal() {
        // Mixed route: 2 diagonal + 3 straight steps; lowest-h tie-breaking
        // keeps the path monotone towards the goal.
        let path = find_path(&grid(10, 10), &blocked(&[]), at(0, 0), at(5, 2));
        assert_eq!(path.cost(), 2 * 14 + 3 * 10);
        let mut prev = at(0, 0);
        for &step in path.steps() {
            assert!(step.x >= prev.x, "path doubles back at {step}");
            prev = step;
        }
    }

    #[test]
    fn test_connects() {
        let path = find_path(&grid(4, 4), &blocked(&[]), at(0, 0), at(2, 0));
        assert!(path.connects(at(0, 0), at(2, 0)));
        assert!(!path.connects(at(0, 0), at(3, 0)));
        assert!(!PathResult::invalid(at(0, 0), at(2, 0)).connects(at(0, 0), at(2, 0)));
    }

    #[test]
    fn test_step_cost() {
        assert_eq!(step_cost(at(0, 0), at(1, 0)), Some(10));
        assert_eq!(step_cost(at(0, 0), at(1, 1)), Some(14));
        assert_eq!(step_cost(at(0, 0), at(2, 0)), None);
        assert_eq!(step_cost(at(0, 0), at(0, 0)), None);
    }

    #[test]
    fn test_reachable_cells_budget() {
        let g = grid(5, 5);
        let reach = reachable_cells(&g, &blocked(&[]), at(2, 2), 10);
        // Start plus four orthogonal neighbors; diagonals cost 14.
        assert_eq!(reach.len(), 5);
        assert_eq!(reach.get(&at(2, 2)), Some(&0));
        assert_eq!(reach.get(&at(3, 2)), Some(&10));
        assert!(!reach.contains_key(&at(3, 3)));

        let reach = reachable_cells(&g, &blocked(&[]), at(2, 2), 14);
        assert_eq!(reach.len(), 9);
    }

    #[test]
    fn test_reachable_cells_match_find_path() {
        let occupied = blocked(&[(1, 1), (2, 1), (3, 3)]);
        let g = grid(6, 6);
        let reach = reachable_cells(&g, &occupied, at(0, 0), 60);

        for (&coord, &cost) in &reach {
            let path = find_path(&g, &occupied, at(0, 0), coord);
            assert!(path.is_valid());
            assert_eq!(path.cost(), cost, "cost mismatch at {coord}");
        }
        assert!(!reach.contains_key(&at(1, 1)));
    }

    #[test]
    fn test_reachable_cells_out_of_bounds_start() {
        assert!(reachable_cells(&grid(3, 3), &blocked(&[]), at(5, 5), 100).is_empty());
    }
}
