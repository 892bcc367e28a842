//! JSON file backed report store.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use safe_route_incident_models::{IncidentReport, NewIncidentReport};

use crate::{ReportStore, State, StoreError};

/// Report store that rewrites a JSON array file after every mutation.
///
/// The write lock is held across the flush, so the file always reflects a
/// complete state. Writes go to a sibling `.tmp` file first and are then
/// renamed into place.
#[derive(Debug)]
pub struct JsonFileReportStore {
    path: PathBuf,
    state: RwLock<State>,
}

impl JsonFileReportStore {
    /// Opens the store at `path`, loading existing reports if the file
    /// exists. A missing file is treated as an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but cannot be read or
    /// parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let reports: Vec<IncidentReport> = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            if contents.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&contents)?
            }
        } else {
            Vec::new()
        };

        log::info!("Loaded {} reports from {}", reports.len(), path.display());

        Ok(Self {
            path,
            state: RwLock::new(State::from_reports(reports)),
        })
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, reports: &[IncidentReport]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(reports)?)?;
        std::fs::rename(&tmp, &self.path)?;
        log::trace!("Flushed {} reports to {}", reports.len(), self.path.display());
        Ok(())
    }
}

impl ReportStore for JsonFileReportStore {
    fn append(
        &self,
        report: NewIncidentReport,
        timestamp: i64,
    ) -> Result<IncidentReport, StoreError> {
        let mut state = self.state.write().map_err(|_| StoreError::Poisoned)?;
        let next_id = state.next_id;
        let stored = state.append(report, timestamp);
        if let Err(e) = self.flush(&state.reports) {
            log::warn!("Failed to persist report {}, rolling back: {e}", stored.id);
            state.reports.pop();
            state.next_id = next_id;
            return Err(e);
        }
        Ok(stored)
    }

    fn snapshot(&self) -> Result<Vec<IncidentReport>, StoreError> {
        let state = self.state.read().map_err(|_| StoreError::Poisoned)?;
        Ok(state.reports.clone())
    }

    fn clear(&self) -> Result<usize, StoreError> {
        let mut state = self.state.write().map_err(|_| StoreError::Poisoned)?;
        self.flush(&[])?;
        Ok(state.clear())
    }
}
