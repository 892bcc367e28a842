//! Tunable parameters of the risk model.
//!
//! The defaults reproduce the reference weights carried by
//! [`IncidentCategory::base_weight`] and a seven day decay constant. A
//! deployment can override either from a TOML file:
//!
//! ```toml
//! decay_seconds = 259200.0
//!
//! [weights]
//! harassment = 5.0
//! pothole = 0.2
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use safe_route_incident_models::{IncidentCategory, IncidentReport};
use serde::{Deserialize, Serialize};

/// Seven days, in seconds.
pub const DEFAULT_DECAY_SECONDS: f64 = 7.0 * 24.0 * 3600.0;

/// Errors raised while loading a [`RiskModel`].
#[derive(Debug, thiserror::Error)]
pub enum RiskModelError {
    /// The model file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The model file is not valid TOML for this schema.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Decay constant is zero, negative or not finite.
    #[error("Invalid decay constant {value}: must be a positive number of seconds")]
    InvalidDecay {
        /// The rejected value.
        value: f64,
    },

    /// A weight was given for a category name that does not exist.
    #[error("Unknown incident category {name:?} in weights")]
    UnknownCategory {
        /// The unrecognized key.
        name: String,
    },

    /// Category weight is negative or not finite.
    #[error("Invalid weight {value} for category {category}")]
    InvalidWeight {
        /// Category the weight was given for.
        category: IncidentCategory,
        /// The rejected value.
        value: f64,
    },
}

/// Weight table and decay constant used to score reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskModel {
    /// Time constant `τ` of the exponential decay, in seconds.
    pub decay_seconds: f64,
    /// Per-category overrides of [`IncidentCategory::base_weight`].
    pub weights: BTreeMap<IncidentCategory, f64>,
}

impl Default for RiskModel {
    fn default() -> Self {
        Self {
            decay_seconds: DEFAULT_DECAY_SECONDS,
            weights: BTreeMap::new(),
        }
    }
}

/// On-disk shape of a model file. Weight keys stay raw strings until they
/// are checked against the category names.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RiskModelFile {
    decay_seconds: f64,
    weights: BTreeMap<String, f64>,
}

impl Default for RiskModelFile {
    fn default() -> Self {
        Self {
            decay_seconds: DEFAULT_DECAY_SECONDS,
            weights: BTreeMap::new(),
        }
    }
}

impl TryFrom<RiskModelFile> for RiskModel {
    type Error = RiskModelError;

    fn try_from(file: RiskModelFile) -> Result<Self, Self::Error> {
        let weights = file
            .weights
            .into_iter()
            .map(|(name, value)| {
                name.trim()
                    .parse::<IncidentCategory>()
                    .map(|category| (category, value))
                    .map_err(|_| RiskModelError::UnknownCategory { name })
            })
            .collect::<Result<_, _>>()?;

        Ok(Self {
            decay_seconds: file.decay_seconds,
            weights,
        })
    }
}

impl RiskModel {
    /// Parses a model from TOML and validates it.
    ///
    /// Weight keys must be exact category names.
    ///
    /// # Errors
    ///
    /// * [`RiskModelError::Toml`] if the document does not parse
    /// * [`RiskModelError::UnknownCategory`] for a misspelled weight key
    /// * [`RiskModelError::InvalidDecay`] / [`RiskModelError::InvalidWeight`]
    ///   if a parameter is out of range
    pub fn from_toml_str(s: &str) -> Result<Self, RiskModelError> {
        let file: RiskModelFile = toml::from_str(s)?;
        let model = Self::try_from(file)?;
        model.validate()?;
        Ok(model)
    }

    /// Reads and parses a model file.
    ///
    /// # Errors
    ///
    /// Returns [`RiskModelError`] if the file cannot be read or is invalid.
    pub fn load(path: &Path) -> Result<Self, RiskModelError> {
        let contents = std::fs::read_to_string(path)?;
        let model = Self::from_toml_str(&contents)?;
        log::info!(
            "Loaded risk model from {} ({} weight overrides, decay {}s)",
            path.display(),
            model.weights.len(),
            model.decay_seconds
        );
        Ok(model)
    }

    /// Checks that every parameter is usable.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range parameter found.
    pub fn validate(&self) -> Result<(), RiskModelError> {
        if !self.decay_seconds.is_finite() || self.decay_seconds <= 0.0 {
            return Err(RiskModelError::InvalidDecay {
                value: self.decay_seconds,
            });
        }
        for (category, value) in &self.weights {
            if !value.is_finite() || *value < 0.0 {
                return Err(RiskModelError::InvalidWeight {
                    category: *category,
                    value: *value,
                });
            }
        }
        Ok(())
    }

    /// Effective base weight for `category`.
    #[must_use]
    pub fn weight(&self, category: IncidentCategory) -> f64 {
        self.weights
            .get(&category)
            .copied()
            .unwrap_or_else(|| category.base_weight())
    }

    /// `exp(-age / τ)`.
    ///
    /// A negative age (a report stamped in the future) yields a factor
    /// above 1. That is left unclamped.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn decay(&self, age_seconds: i64) -> f64 {
        (-(age_seconds as f64) / self.decay_seconds).exp()
    }

    /// `weight × severity × decay` for one report, measured against `now`.
    ///
    /// A zero weight always contributes zero, even when the decay factor of
    /// a far-future report has overflowed to infinity.
    #[must_use]
    pub fn contribution(&self, report: &IncidentReport, now: i64) -> f64 {
        let weight = self.weight(report.category);
        if weight <= 0.0 {
            return 0.0;
        }
        let age = now.saturating_sub(report.timestamp);
        weight * report.severity.multiplier() * self.decay(age)
    }
}
