#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Grid cell and risk grid types.
//!
//! A [`RiskGrid`] is a dense `width × height` field of non-negative risk
//! scores addressed by [`Cell`] coordinates, `x` being the column and `y`
//! the row. The risk builder produces one and the route finder consumes it;
//! neither needs to know about the other.

use serde::{Deserialize, Serialize};

/// A grid coordinate. Serialized as a two-element `[x, y]` array.
///
/// Coordinates are signed so that out-of-range input (negative values
/// included) can be represented and rejected rather than wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "(i64, i64)", into = "(i64, i64)")]
pub struct Cell {
    /// Column.
    pub x: i64,
    /// Row.
    pub y: i64,
}

impl Cell {
    /// Creates a cell at column `x`, row `y`.
    #[must_use]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Whether `other` differs from this cell by exactly one unit along
    /// exactly one axis.
    #[must_use]
    pub const fn is_adjacent(self, other: Self) -> bool {
        (self.x - other.x).abs() + (self.y - other.y).abs() == 1
    }
}

impl From<(i64, i64)> for Cell {
    fn from((x, y): (i64, i64)) -> Self {
        Self { x, y }
    }
}

impl From<Cell> for (i64, i64) {
    fn from(cell: Cell) -> Self {
        (cell.x, cell.y)
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Errors raised when a grid is assembled from caller-supplied scores.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    /// No rows, or a first row with no columns.
    #[error("Grid must have at least one row and one column")]
    Empty,

    /// A row whose length differs from the first row.
    #[error("Row {row} has {actual} columns, expected {expected}")]
    Ragged {
        /// Index of the offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        actual: usize,
    },

    /// A negative or NaN score.
    #[error("Invalid risk score {value} at {cell}")]
    InvalidScore {
        /// Where the score was found.
        cell: Cell,
        /// The rejected value.
        value: f64,
    },

    /// A cell outside the grid.
    #[error("Cell {cell} is outside the {width}x{height} grid")]
    OutOfBounds {
        /// The rejected cell.
        cell: Cell,
        /// Grid width.
        width: usize,
        /// Grid height.
        height: usize,
    },
}

/// Dense row-major field of risk scores.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskGrid {
    width: usize,
    height: usize,
    cells: Vec<f64>,
}

impl RiskGrid {
    /// Creates an all-zero grid.
    #[must_use]
    pub fn zeroed(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0.0; width * height],
        }
    }

    /// Builds a grid from nested rows, `rows[y][x]`.
    ///
    /// # Errors
    ///
    /// * [`GridError::Empty`] if there are no rows or no columns
    /// * [`GridError::Ragged`] if rows differ in length
    /// * [`GridError::InvalidScore`] if any score is negative or NaN
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, GridError> {
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(GridError::Empty);
        }
        let height = rows.len();

        let mut cells = Vec::with_capacity(width * height);
        for (y, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(GridError::Ragged {
                    row: y,
                    expected: width,
                    actual: row.len(),
                });
            }
            cells.extend(row);
        }

        let grid = Self {
            width,
            height,
            cells,
        };
        if let Some((index, value)) = grid
            .cells
            .iter()
            .copied()
            .enumerate()
            .find(|(_, v)| !is_valid_score(*v))
        {
            return Err(GridError::InvalidScore {
                cell: grid.cell_at(index),
                value,
            });
        }

        Ok(grid)
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.width * self.height
    }

    /// Whether the grid has no cells at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `cell` lies inside `[0, width) × [0, height)`.
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        self.index_of(cell).is_some()
    }

    /// Flat row-major index of `cell`, or `None` if it is out of bounds.
    #[must_use]
    pub fn index_of(&self, cell: Cell) -> Option<usize> {
        let x = usize::try_from(cell.x).ok()?;
        let y = usize::try_from(cell.y).ok()?;
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// Inverse of [`Self::index_of`].
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn cell_at(&self, index: usize) -> Cell {
        Cell {
            x: (index % self.width) as i64,
            y: (index / self.width) as i64,
        }
    }

    /// Risk at `cell`, or `None` if it is out of bounds.
    #[must_use]
    pub fn get(&self, cell: Cell) -> Option<f64> {
        self.index_of(cell).map(|i| self.cells[i])
    }

    /// Risk at a flat index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[must_use]
    pub fn at_index(&self, index: usize) -> f64 {
        self.cells[index]
    }

    /// Overwrites the risk at `cell`.
    ///
    /// # Errors
    ///
    /// * [`GridError::OutOfBounds`] if `cell` is outside the grid
    /// * [`GridError::InvalidScore`] if `value` is negative or NaN
    pub fn set(&mut self, cell: Cell, value: f64) -> Result<(), GridError> {
        let index = self.checked_index(cell)?;
        if !is_valid_score(value) {
            return Err(GridError::InvalidScore { cell, value });
        }
        self.cells[index] = value;
        Ok(())
    }

    /// Adds `amount` to the risk at `cell`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] if `cell` is outside the grid.
    pub fn accumulate(&mut self, cell: Cell, amount: f64) -> Result<(), GridError> {
        let index = self.checked_index(cell)?;
        self.cells[index] += amount;
        Ok(())
    }

    /// Highest score in the grid, `0.0` for an empty grid.
    #[must_use]
    pub fn max_risk(&self) -> f64 {
        self.cells.iter().copied().fold(0.0, f64::max)
    }

    /// Iterates over every cell with its score, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, f64)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, v)| (self.cell_at(i), *v))
    }

    /// Nested `rows[y][x]` representation, as served over the API.
    #[must_use]
    pub fn rows(&self) -> Vec<Vec<f64>> {
        if self.width == 0 {
            return vec![Vec::new(); self.height];
        }
        self.cells.chunks(self.width).map(<[f64]>::to_vec).collect()
    }

    fn checked_index(&self, cell: Cell) -> Result<usize, GridError> {
        self.index_of(cell).ok_or(GridError::OutOfBounds {
            cell,
            width: self.width,
            height: self.height,
        })
    }
}

fn is_valid_score(value: f64) -> bool {
    !value.is_nan() && value >= 0.0
}
