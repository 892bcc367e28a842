//! Plain-text rendering of risk grids and paths.

use std::collections::BTreeSet;

use safe_route_grid_models::{Cell, RiskGrid};

/// Renders scores one row per line, `y = 0` first.
#[must_use]
pub fn grid_table(grid: &RiskGrid) -> String {
    grid.rows()
        .into_iter()
        .map(|row| {
            let line: Vec<String> = row.iter().map(|v| format!("{v:>7.2}")).collect();
            format!("{}\n", line.join(" "))
        })
        .collect()
}

/// Renders the grid as a character map with the path overlaid.
///
/// `S` and `E` mark the endpoints, `*` the rest of the path, `#` cells at or
/// above half the grid's maximum risk, `+` any other cell with risk, and
/// `.` cells with none.
#[must_use]
pub fn path_map(grid: &RiskGrid, path: &[Cell]) -> String {
    let on_path: BTreeSet<Cell> = path.iter().copied().collect();
    let start = path.first().copied();
    let end = path.last().copied();
    let threshold = grid.max_risk() / 2.0;

    let mut out = String::new();
    for (cell, risk) in grid.iter() {
        let c = if Some(cell) == start {
            'S'
        } else if Some(cell) == end {
            'E'
        } else if on_path.contains(&cell) {
            '*'
        } else if risk > 0.0 && risk >= threshold {
            '#'
        } else if risk > 0.0 {
            '+'
        } else {
            '.'
        };
        out.push(c);
        if usize::try_from(cell.x).is_ok_and(|x| x + 1 == grid.width()) {
            out.push('\n');
        } else {
            out.push(' ');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_one_line_per_row() {
        let grid = RiskGrid::from_rows(vec![vec![0.0, 1.5], vec![12.25, 0.0]]).unwrap();
        assert_eq!(grid_table(&grid), "   0.00    1.50\n  12.25    0.00\n");
    }

    #[test]
    fn map_marks_endpoints_path_and_hazards() {
        let grid = RiskGrid::from_rows(vec![
            vec![0.0, 0.0, 9.0],
            vec![0.0, 0.0, 0.0],
            vec![1.0, 0.0, 0.0],
        ])
        .unwrap();
        let path = [Cell::new(0, 0), Cell::new(0, 1), Cell::new(1, 1), Cell::new(2, 1)];

        assert_eq!(path_map(&grid, &path), "S . #\n* * E\n+ . .\n");
    }
}
