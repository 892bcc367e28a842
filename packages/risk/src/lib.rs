#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Risk surface builder.
//!
//! Turns a snapshot of incident reports into a dense [`RiskGrid`]. Each
//! in-bounds report adds `weight(category) × severity × exp(-age / τ)` to
//! its cell; overlapping reports sum. Reports outside the grid are skipped
//! without error, so partially invalid data never makes the surface
//! unavailable.
//!
//! Building is a pure function of its inputs. `now` is passed in once so
//! every report in a computation decays against the same instant.

pub mod model;

pub use model::{DEFAULT_DECAY_SECONDS, RiskModel, RiskModelError};
pub use safe_route_grid_models::{Cell, RiskGrid};

use safe_route_incident_models::IncidentReport;

/// Default grid width.
pub const DEFAULT_GRID_WIDTH: usize = 10;

/// Default grid height.
pub const DEFAULT_GRID_HEIGHT: usize = 10;

/// Builds a risk grid with the reference [`RiskModel`].
#[must_use]
pub fn build_risk_grid<'a, I>(reports: I, width: usize, height: usize, now: i64) -> RiskGrid
where
    I: IntoIterator<Item = &'a IncidentReport>,
{
    RiskModel::default().build_grid(reports, width, height, now)
}

impl RiskModel {
    /// Builds a `width × height` risk grid from `reports`, decayed against
    /// `now` (Unix seconds).
    #[must_use]
    pub fn build_grid<'a, I>(&self, reports: I, width: usize, height: usize, now: i64) -> RiskGrid
    where
        I: IntoIterator<Item = &'a IncidentReport>,
    {
        let mut grid = RiskGrid::zeroed(width, height);
        let mut applied = 0usize;
        let mut skipped = 0usize;

        for report in reports {
            let cell = Cell::new(report.x, report.y);
            if grid
                .accumulate(cell, self.contribution(report, now))
                .is_ok()
            {
                applied += 1;
            } else {
                log::trace!("Skipping report {} at out-of-bounds cell {cell}", report.id);
                skipped += 1;
            }
        }

        log::debug!(
            "Built {width}x{height} risk grid from {applied} reports ({skipped} out of bounds)"
        );

        grid
    }
}

#[cfg(test)]
mod tests {
    use safe_route_incident_models::{IncidentCategory, Severity};

    use super::*;

    const NOW: i64 = 1_700_000_000;

    fn report(x: i64, y: i64, category: IncidentCategory, timestamp: i64) -> IncidentReport {
        IncidentReport {
            id: 0,
            x,
            y,
            category,
            severity: Severity::Mild,
            timestamp,
            notes: None,
        }
    }

    #[test]
    fn empty_snapshot_gives_all_zero_grid() {
        let grid = build_risk_grid(std::iter::empty(), 6, 4, NOW);
        assert_eq!(grid.width(), 6);
        assert_eq!(grid.height(), 4);
        assert_eq!(grid.rows(), vec![vec![0.0; 6]; 4]);
    }

    #[test]
    fn out_of_bounds_reports_do_not_change_the_grid() {
        let inside = vec![
            report(1, 1, IncidentCategory::Flood, NOW),
            report(4, 2, IncidentCategory::Accident, NOW - 3600),
        ];
        let baseline = build_risk_grid(&inside, 5, 3, NOW);

        for (x, y) in [(-1, 0), (0, -1), (5, 0), (0, 3), (100, 100), (i64::MIN, i64::MAX)] {
            let mut with_outlier = inside.clone();
            with_outlier.push(report(x, y, IncidentCategory::Harassment, NOW));
            assert_eq!(build_risk_grid(&with_outlier, 5, 3, NOW), baseline, "({x}, {y})");
        }
    }

    #[test]
    fn overlapping_reports_sum_in_one_cell() {
        let mut severe = report(2, 2, IncidentCategory::Pickpocket, NOW);
        severe.severity = Severity::Severe;
        let reports = vec![
            report(2, 2, IncidentCategory::Harassment, NOW),
            severe,
            report(2, 2, IncidentCategory::Other, NOW),
        ];

        let grid = build_risk_grid(&reports, 3, 3, NOW);
        let expected = 3.5 + 2.0 * 3.0 + 1.0;
        assert!((grid.get(Cell::new(2, 2)).unwrap() - expected).abs() < 1e-9);
        assert_eq!(grid.get(Cell::new(0, 0)), Some(0.0));
    }

    #[test]
    fn older_report_contributes_strictly_less() {
        let recent = build_risk_grid(
            &[report(0, 0, IncidentCategory::StrayDog, NOW - 60)],
            1,
            1,
            NOW,
        );
        let older = build_risk_grid(
            &[report(0, 0, IncidentCategory::StrayDog, NOW - 86_400)],
            1,
            1,
            NOW,
        );
        assert!(older.at_index(0) < recent.at_index(0));
        assert!(older.at_index(0) > 0.0);
    }

    #[test]
    fn future_dated_report_is_not_clamped() {
        let grid = build_risk_grid(
            &[report(0, 0, IncidentCategory::Other, NOW + 86_400)],
            1,
            1,
            NOW,
        );
        assert!(grid.at_index(0) > 1.0);
    }

    #[test]
    fn building_twice_is_identical() {
        let reports = vec![
            report(0, 0, IncidentCategory::Pothole, NOW - 10),
            report(3, 1, IncidentCategory::PoorLighting, NOW - 500_000),
            report(3, 1, IncidentCategory::Flood, NOW - 1),
        ];
        assert_eq!(
            build_risk_grid(&reports, 4, 4, NOW),
            build_risk_grid(&reports, 4, 4, NOW)
        );
    }

    #[test]
    fn tuned_model_applies_overrides() {
        let mut model = RiskModel::default();
        model.weights.insert(IncidentCategory::Pothole, 10.0);
        let grid = model.build_grid(&[report(0, 0, IncidentCategory::Pothole, NOW)], 1, 1, NOW);
        assert!((grid.at_index(0) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn all_scores_are_non_negative() {
        let reports: Vec<_> = IncidentCategory::all()
            .iter()
            .enumerate()
            .map(|(i, c)| report(i64::try_from(i % 3).unwrap(), 0, *c, NOW - 1_000_000))
            .collect();
        let grid = build_risk_grid(&reports, 3, 2, NOW);
        assert!(grid.iter().all(|(_, v)| v >= 0.0));
    }
}
