#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Append-only incident report store.
//!
//! Reports are only ever appended, read back as a full snapshot, or wiped
//! in bulk. Two implementations of [`ReportStore`] are provided:
//! [`MemoryReportStore`] for tests and ephemeral servers, and
//! [`JsonFileReportStore`], which mirrors every mutation to a JSON file.

mod file;

pub use file::JsonFileReportStore;

use std::sync::RwLock;

use safe_route_incident_models::{IncidentReport, NewIncidentReport};

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error reading or writing the backing file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file is not a valid report list.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A thread panicked while holding the store lock.
    #[error("Report store lock poisoned")]
    Poisoned,
}

/// Storage for incident reports.
pub trait ReportStore: Send + Sync {
    /// Stores a new report stamped with `timestamp` and returns it with its
    /// assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the report could not be persisted.
    fn append(&self, report: NewIncidentReport, timestamp: i64)
    -> Result<IncidentReport, StoreError>;

    /// Returns every stored report in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be read.
    fn snapshot(&self) -> Result<Vec<IncidentReport>, StoreError>;

    /// Removes all reports and returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be written.
    fn clear(&self) -> Result<usize, StoreError>;
}

#[derive(Debug, Default)]
struct State {
    next_id: u64,
    reports: Vec<IncidentReport>,
}

impl State {
    fn from_reports(reports: Vec<IncidentReport>) -> Self {
        let next_id = reports.iter().map(|r| r.id).max().map_or(1, |id| id + 1);
        Self { next_id, reports }
    }

    fn append(&mut self, report: NewIncidentReport, timestamp: i64) -> IncidentReport {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        let report = report.into_report(id, timestamp);
        self.reports.push(report.clone());
        report
    }

    fn clear(&mut self) -> usize {
        let removed = self.reports.len();
        self.reports.clear();
        removed
    }
}

/// Report store held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryReportStore {
    state: RwLock<State>,
}

impl MemoryReportStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `reports`. New ids continue after
    /// the highest existing one.
    #[must_use]
    pub fn with_reports(reports: Vec<IncidentReport>) -> Self {
        Self {
            state: RwLock::new(State::from_reports(reports)),
        }
    }
}

impl ReportStore for MemoryReportStore {
    fn append(
        &self,
        report: NewIncidentReport,
        timestamp: i64,
    ) -> Result<IncidentReport, StoreError> {
        let mut state = self.state.write().map_err(|_| StoreError::Poisoned)?;
        Ok(state.append(report, timestamp))
    }

    fn snapshot(&self) -> Result<Vec<IncidentReport>, StoreError> {
        let state = self.state.read().map_err(|_| StoreError::Poisoned)?;
        Ok(state.reports.clone())
    }

    fn clear(&self) -> Result<usize, StoreError> {
        let mut state = self.state.write().map_err(|_| StoreError::Poisoned)?;
        Ok(state.clear())
    }
}
