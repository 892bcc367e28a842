#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Incident report, category and severity types.
//!
//! Reports are immutable facts pinned to a grid cell. Everything here is
//! deliberately lenient on the way in: an unknown category becomes
//! [`IncidentCategory::Other`] and a missing or out-of-range severity
//! becomes [`Severity::Mild`], so noisy upstream data never blocks the risk
//! surface from being computed.

use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Severity of a reported incident, from 1 (mild) to 3 (severe).
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Display,
    AsRefStr,
)]
#[serde(into = "u8")]
#[strum(serialize_all = "snake_case")]
pub enum Severity {
    /// Level 1: minor nuisance
    #[default]
    Mild = 1,
    /// Level 2: worth avoiding
    Moderate = 2,
    /// Level 3: actively dangerous
    Severe = 3,
}

impl Severity {
    /// Returns the numeric value of this severity level.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Linear multiplier applied to a report's contribution.
    #[must_use]
    pub fn multiplier(self) -> f64 {
        f64::from(self.value())
    }

    /// Creates a severity level from a numeric value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not in the range 1-3.
    pub const fn from_value(value: i64) -> Result<Self, InvalidSeverityError> {
        match value {
            1 => Ok(Self::Mild),
            2 => Ok(Self::Moderate),
            3 => Ok(Self::Severe),
            _ => Err(InvalidSeverityError { value }),
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Mild, Self::Moderate, Self::Severe]
    }
}

impl From<i64> for Severity {
    fn from(value: i64) -> Self {
        Self::from_value(value).unwrap_or_else(|e| {
            log::debug!("{e}, defaulting to {}", Self::default());
            Self::default()
        })
    }
}

impl From<f64> for Severity {
    #[allow(clippy::cast_possible_truncation)]
    fn from(value: f64) -> Self {
        if value.fract().abs() < f64::EPSILON && (1.0..=3.0).contains(&value) {
            Self::from(value as i64)
        } else {
            log::debug!("invalid severity value {value}, defaulting to {}", Self::default());
            Self::default()
        }
    }
}

impl From<&str> for Severity {
    fn from(value: &str) -> Self {
        let value = value.trim();
        if let Ok(n) = value.parse::<i64>() {
            Self::from(n)
        } else if let Ok(n) = value.parse::<f64>() {
            Self::from(n)
        } else {
            log::debug!("invalid severity {value:?}, defaulting to {}", Self::default());
            Self::default()
        }
    }
}

/// Any shape a severity may arrive in from clients.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSeverity {
    Int(i64),
    Float(f64),
    Text(String),
    Unknown(serde::de::IgnoredAny),
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<RawSeverity>::deserialize(deserializer)? {
            None => Self::default(),
            Some(RawSeverity::Int(n)) => Self::from(n),
            Some(RawSeverity::Float(n)) => Self::from(n),
            Some(RawSeverity::Text(s)) => Self::from(s.as_str()),
            Some(RawSeverity::Unknown(_)) => {
                log::debug!("non-numeric severity, defaulting to {}", Self::default());
                Self::default()
            }
        })
    }
}

impl From<Severity> for u8 {
    fn from(value: Severity) -> Self {
        value.value()
    }
}

/// Error returned when attempting to create a [`Severity`] from an invalid
/// numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidSeverityError {
    /// The invalid severity value that was provided.
    pub value: i64,
}

impl std::fmt::Display for InvalidSeverityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid severity value {}: expected 1-3", self.value)
    }
}

impl std::error::Error for InvalidSeverityError {}

/// Kind of hazard a report describes.
///
/// [`FromStr`](std::str::FromStr) is strict and rejects unknown names.
/// Deserialization is lenient and maps anything unrecognized to
/// [`IncidentCategory::Other`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case", from = "String")]
#[strum(serialize_all = "snake_case")]
pub enum IncidentCategory {
    /// Theft from a person
    Pickpocket,
    /// Verbal or physical harassment
    Harassment,
    /// Broken or missing street lighting
    PoorLighting,
    /// Aggressive or roaming stray dogs
    StrayDog,
    /// Standing water or flooding
    Flood,
    /// Road surface damage
    Pothole,
    /// Traffic or pedestrian accident
    Accident,
    /// Anything that does not fit another category
    Other,
}

impl IncidentCategory {
    /// Reference base weight for this category.
    #[must_use]
    pub const fn base_weight(self) -> f64 {
        match self {
            Self::Pickpocket => 2.0,
            Self::Harassment => 3.5,
            Self::PoorLighting => 1.4,
            Self::StrayDog => 1.1,
            Self::Flood => 2.8,
            Self::Pothole => 0.6,
            Self::Accident => 3.0,
            Self::Other => 1.0,
        }
    }

    /// Parses a category name, falling back to [`Self::Other`] for
    /// anything unrecognized.
    #[must_use]
    pub fn parse_lenient(name: &str) -> Self {
        name.trim().parse().unwrap_or_else(|_| {
            log::debug!("Unknown incident category {name:?}, treating as other");
            Self::Other
        })
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Pickpocket,
            Self::Harassment,
            Self::PoorLighting,
            Self::StrayDog,
            Self::Flood,
            Self::Pothole,
            Self::Accident,
            Self::Other,
        ]
    }
}

impl From<String> for IncidentCategory {
    fn from(value: String) -> Self {
        Self::parse_lenient(&value)
    }
}

/// A stored incident report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentReport {
    /// Store-assigned identifier.
    pub id: u64,
    /// Grid column.
    pub x: i64,
    /// Grid row.
    pub y: i64,
    /// Hazard category.
    #[serde(rename = "type")]
    pub category: IncidentCategory,
    /// Severity (1-3).
    #[serde(default)]
    pub severity: Severity,
    /// Creation time in Unix seconds.
    pub timestamp: i64,
    /// Free-text notes. Not used by the risk model.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Payload for a report that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewIncidentReport {
    /// Grid column.
    pub x: i64,
    /// Grid row.
    pub y: i64,
    /// Hazard category, `other` if absent.
    #[serde(rename = "type", default = "default_category")]
    pub category: IncidentCategory,
    /// Severity, mild if absent or invalid.
    #[serde(default)]
    pub severity: Severity,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
}

const fn default_category() -> IncidentCategory {
    IncidentCategory::Other
}

impl NewIncidentReport {
    /// Stamps this payload with an id and creation time.
    #[must_use]
    pub fn into_report(self, id: u64, timestamp: i64) -> IncidentReport {
        IncidentReport {
            id,
            x: self.x,
            y: self.y,
            category: self.category,
            severity: self.severity,
            timestamp,
            notes: self.notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_from_value_accepts_only_one_to_three() {
        for v in 1..=3 {
            let severity = Severity::from_value(v).unwrap();
            assert_eq!(i64::from(severity.value()), v);
        }
        assert!(Severity::from_value(0).is_err());
        assert!(Severity::from_value(4).is_err());
    }

    #[test]
    fn invalid_severity_defaults_to_mild() {
        assert_eq!(Severity::from(7), Severity::Mild);
        assert_eq!(Severity::from(-1), Severity::Mild);
        assert_eq!(Severity::from("0"), Severity::Mild);
        assert_eq!(Severity::from("3"), Severity::Severe);
    }

    #[test]
    fn severity_accepts_numeric_strings_and_floats() {
        let parse = |body: &str| serde_json::from_str::<NewIncidentReport>(body).unwrap().severity;

        assert_eq!(parse(r#"{"x": 1, "y": 1, "severity": "2"}"#), Severity::Moderate);
        assert_eq!(parse(r#"{"x": 1, "y": 1, "severity": " 3 "}"#), Severity::Severe);
        assert_eq!(parse(r#"{"x": 1, "y": 1, "severity": 2.0}"#), Severity::Moderate);
        assert_eq!(parse(r#"{"x": 1, "y": 1, "severity": "bad"}"#), Severity::Mild);
        assert_eq!(parse(r#"{"x": 1, "y": 1, "severity": 2.5}"#), Severity::Mild);
        assert_eq!(parse(r#"{"x": 1, "y": 1, "severity": null}"#), Severity::Mild);
        assert_eq!(parse(r#"{"x": 1, "y": 1, "severity": true}"#), Severity::Mild);
        assert_eq!(parse(r#"{"x": 1, "y": 1, "severity": [2]}"#), Severity::Mild);
    }

    #[test]
    fn unknown_category_falls_back_to_other() {
        assert_eq!(
            IncidentCategory::parse_lenient("stray_dog"),
            IncidentCategory::StrayDog
        );
        assert_eq!(
            IncidentCategory::parse_lenient("meteor_strike"),
            IncidentCategory::Other
        );
        assert!("meteor_strike".parse::<IncidentCategory>().is_err());
    }

    #[test]
    fn category_names_round_trip_through_display() {
        for category in IncidentCategory::all() {
            let name = category.to_string();
            assert_eq!(name.parse::<IncidentCategory>().unwrap(), *category);
        }
        assert_eq!(IncidentCategory::PoorLighting.as_ref(), "poor_lighting");
    }

    #[test]
    fn base_weights_are_positive() {
        for category in IncidentCategory::all() {
            assert!(category.base_weight() > 0.0, "{category:?}");
        }
    }

    #[test]
    fn new_report_deserializes_with_defaults() {
        let report: NewIncidentReport = serde_json::from_str(r#"{"x": 2, "y": 3}"#).unwrap();
        assert_eq!(report.category, IncidentCategory::Other);
        assert_eq!(report.severity, Severity::Mild);
        assert_eq!(report.notes, None);

        let report: NewIncidentReport = serde_json::from_str(
            r#"{"x": 1, "y": 1, "type": "flood", "severity": 9, "notes": "knee deep"}"#,
        )
        .unwrap();
        assert_eq!(report.category, IncidentCategory::Flood);
        assert_eq!(report.severity, Severity::Mild);
        assert_eq!(report.notes.as_deref(), Some("knee deep"));
    }

    #[test]
    fn report_serializes_type_and_numeric_severity() {
        let report = NewIncidentReport {
            x: 4,
            y: 5,
            category: IncidentCategory::PoorLighting,
            severity: Severity::Severe,
            notes: None,
        }
        .into_report(12, 1_700_000_000);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["type"], "poor_lighting");
        assert_eq!(json["severity"], 3);
        assert_eq!(json["timestamp"], 1_700_000_000);
        assert_eq!(json["id"], 12);
    }
}
