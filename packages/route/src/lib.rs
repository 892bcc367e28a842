#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Safest-path search over a risk grid.
//!
//! Cells are nodes of a 4-connected graph. Moving between adjacent cells
//! `a` and `b` costs `(risk(a) + risk(b)) / 2 + 1`, so every step has a
//! positive base cost and risky cells are expensive but never impassable.
//! [`find_safest_path`] runs Dijkstra's algorithm with a lazily pruned
//! binary heap and stops as soon as the destination is settled.

mod frontier;

use frontier::Frontier;
use safe_route_grid_models::{Cell, RiskGrid};
use serde::{Deserialize, Serialize};

/// Unit offsets to the four neighbours of a cell.
const DIRECTIONS: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Errors returned by [`find_safest_path`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// The start or end cell is outside the grid.
    #[error("Cell {cell} is outside the {width}x{height} grid")]
    OutOfBounds {
        /// The rejected cell.
        cell: Cell,
        /// Grid width.
        width: usize,
        /// Grid height.
        height: usize,
    },

    /// No finite-cost path connects start and end.
    #[error("No path from {start} to {end}")]
    Unreachable {
        /// Requested start.
        start: Cell,
        /// Requested end.
        end: Cell,
    },
}

/// An optimal path and its total cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathResult {
    /// Cells from start to end inclusive, each 4-adjacent to the next.
    pub path: Vec<Cell>,
    /// Sum of the traversed edge costs.
    pub cost: f64,
}

impl PathResult {
    /// First cell of the path.
    #[must_use]
    pub fn start(&self) -> Option<Cell> {
        self.path.first().copied()
    }

    /// Last cell of the path.
    #[must_use]
    pub fn end(&self) -> Option<Cell> {
        self.path.last().copied()
    }

    /// Number of moves, one less than the number of cells.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// Cost of moving between two adjacent cells with the given risks.
#[must_use]
pub fn edge_cost(risk_a: f64, risk_b: f64) -> f64 {
    f64::midpoint(risk_a, risk_b) + 1.0
}

/// In-bounds 4-neighbours of `cell`.
pub fn neighbors(grid: &RiskGrid, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
    DIRECTIONS
        .iter()
        .map(move |(dx, dy)| Cell::new(cell.x + dx, cell.y + dy))
        .filter(|c| grid.contains(*c))
}

/// Finds a minimum-cost path from `start` to `end`.
///
/// Among several equal-cost optimal paths, any one may be returned. The
/// result is deterministic for a given grid.
///
/// # Errors
///
/// * [`RouteError::OutOfBounds`] if `start` or `end` lies outside the grid.
///   This is checked before any search work.
/// * [`RouteError::Unreachable`] if no finite-cost path exists, which on a
///   rectangular grid only happens when infinite risk walls off `end`.
pub fn find_safest_path(grid: &RiskGrid, start: Cell, end: Cell) -> Result<PathResult, RouteError> {
    let start_index = checked_index(grid, start)?;
    let end_index = checked_index(grid, end)?;

    let mut dist: Vec<Option<f64>> = vec![None; grid.len()];
    let mut prev: Vec<Option<usize>> = vec![None; grid.len()];
    let mut frontier = Frontier::new();

    dist[start_index] = Some(0.0);
    frontier.push(start_index, 0.0);

    let mut settled = 0usize;

    while let Some((d, index)) = frontier.pop_min() {
        if dist[index].is_some_and(|best| d > best) {
            continue;
        }
        if index == end_index {
            break;
        }
        settled += 1;

        let risk = grid.at_index(index);
        for neighbor in neighbors(grid, grid.cell_at(index)) {
            let Some(n) = grid.index_of(neighbor) else {
                continue;
            };
            let candidate = d + edge_cost(risk, grid.at_index(n));
            if candidate < dist[n].unwrap_or(f64::INFINITY) {
                dist[n] = Some(candidate);
                prev[n] = Some(index);
                frontier.push(n, candidate);
            }
        }
    }

    let Some(cost) = dist[end_index] else {
        log::debug!("No path from {start} to {end} after settling {settled} cells");
        return Err(RouteError::Unreachable { start, end });
    };

    let mut path = vec![end];
    let mut current = end_index;
    while current != start_index {
        let Some(p) = prev[current] else {
            return Err(RouteError::Unreachable { start, end });
        };
        path.push(grid.cell_at(p));
        current = p;
    }
    path.reverse();

    log::debug!(
        "Found path {start} -> {end}: {} steps, cost {cost:.3}, {settled} cells settled",
        path.len() - 1
    );

    Ok(PathResult { path, cost })
}

fn checked_index(grid: &RiskGrid, cell: Cell) -> Result<usize, RouteError> {
    grid.index_of(cell).ok_or(RouteError::OutOfBounds {
        cell,
        width: grid.width(),
        height: grid.height(),
    })
}
