#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the safe-route server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the core grid and route types to allow independent evolution of the
//! API contract.

use safe_route_grid_models::{Cell, RiskGrid};
use safe_route_incident_models::{IncidentCategory, IncidentReport};
use safe_route_route::PathResult;
use serde::{Deserialize, Serialize};

/// Response from `GET /api/grid`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiGrid {
    /// Risk scores as `grid[y][x]`.
    pub grid: Vec<Vec<f64>>,
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
}

impl From<&RiskGrid> for ApiGrid {
    fn from(grid: &RiskGrid) -> Self {
        Self {
            grid: grid.rows(),
            width: grid.width(),
            height: grid.height(),
        }
    }
}

/// Response from `GET /api/route`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiRoute {
    /// Cells from start to end inclusive, as `[x, y]` pairs.
    pub path: Vec<Cell>,
    /// Total traversal cost.
    pub cost: f64,
}

impl From<PathResult> for ApiRoute {
    fn from(result: PathResult) -> Self {
        Self {
            path: result.path,
            cost: result.cost,
        }
    }
}

/// Query parameters for the route endpoint.
///
/// Kept as raw strings so that a missing or malformed coordinate produces
/// the API's own error body instead of the framework default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteQueryParams {
    /// Start column.
    pub sx: Option<String>,
    /// Start row.
    pub sy: Option<String>,
    /// End column.
    pub ex: Option<String>,
    /// End row.
    pub ey: Option<String>,
}

impl RouteQueryParams {
    /// Parses the start and end cells, or `None` if any coordinate is
    /// missing or not an integer.
    #[must_use]
    pub fn endpoints(&self) -> Option<(Cell, Cell)> {
        let parse = |v: &Option<String>| v.as_deref()?.trim().parse::<i64>().ok();
        Some((
            Cell::new(parse(&self.sx)?, parse(&self.sy)?),
            Cell::new(parse(&self.ex)?, parse(&self.ey)?),
        ))
    }
}

/// Response from `GET /api/reports`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiReports {
    /// Every stored report.
    pub reports: Vec<IncidentReport>,
}

/// A category and the weight currently applied to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCategory {
    /// Category name.
    pub name: IncidentCategory,
    /// Effective base weight.
    pub weight: f64,
}

/// Generic `{ "status": ... }` acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiStatus {
    /// Outcome, e.g. `"ok"` or `"cleared"`.
    pub status: String,
}

impl ApiStatus {
    /// Creates an acknowledgement with the given status text.
    #[must_use]
    pub fn new(status: &str) -> Self {
        Self {
            status: status.to_string(),
        }
    }
}

/// Error body returned with any non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable error message.
    pub error: String,
}

impl ApiError {
    /// Creates an error body with the given message.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(sx: &str, sy: &str, ex: &str, ey: &str) -> RouteQueryParams {
        RouteQueryParams {
            sx: Some(sx.to_string()),
            sy: Some(sy.to_string()),
            ex: Some(ex.to_string()),
            ey: Some(ey.to_string()),
        }
    }

    #[test]
    fn endpoints_parse_integers() {
        assert_eq!(
            params("0", "1", " 4 ", "-2").endpoints(),
            Some((Cell::new(0, 1), Cell::new(4, -2)))
        );
    }

    #[test]
    fn endpoints_reject_missing_or_malformed() {
        assert_eq!(RouteQueryParams::default().endpoints(), None);
        assert_eq!(params("0", "x", "1", "1").endpoints(), None);
        assert_eq!(params("0", "1.5", "1", "1").endpoints(), None);

        let mut partial = params("0", "0", "1", "1");
        partial.ey = None;
        assert_eq!(partial.endpoints(), None);
    }

    #[test]
    fn grid_response_is_row_major() {
        let grid = RiskGrid::from_rows(vec![vec![0.0, 1.0], vec![2.0, 3.0], vec![4.0, 5.0]]).unwrap();
        let json = serde_json::to_value(ApiGrid::from(&grid)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "grid": [[0.0, 1.0], [2.0, 3.0], [4.0, 5.0]],
                "width": 2,
                "height": 3,
            })
        );
    }
}
