//! Server configuration read from the environment.

use std::path::PathBuf;
use std::str::FromStr;

use safe_route_risk::{DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH};

use crate::ServerError;

/// Everything needed to start the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind (`BIND_ADDR`).
    pub bind_addr: String,
    /// Port to listen on (`PORT`).
    pub port: u16,
    /// Grid columns (`GRID_WIDTH`).
    pub width: usize,
    /// Grid rows (`GRID_HEIGHT`).
    pub height: usize,
    /// JSON file backing the report store (`SAFE_ROUTE_REPORTS`). The store
    /// is in-memory when unset.
    pub reports_path: Option<PathBuf>,
    /// TOML risk model overrides (`SAFE_ROUTE_RISK_MODEL`).
    pub risk_model_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,
            reports_path: None,
            risk_model_path: None,
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::InvalidEnv`] if a variable is set but does not
    /// parse, or [`ServerError::InvalidGrid`] for a zero grid dimension.
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`Self::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ServerError> {
        let defaults = Self::default();

        let config = Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: parse_var(&lookup, "PORT", defaults.port)?,
            width: parse_var(&lookup, "GRID_WIDTH", defaults.width)?,
            height: parse_var(&lookup, "GRID_HEIGHT", defaults.height)?,
            reports_path: lookup("SAFE_ROUTE_REPORTS")
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            risk_model_path: lookup("SAFE_ROUTE_RISK_MODEL")
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
        };
        config.validate()?;
        Ok(config)
    }

    /// Rejects grids with a zero dimension.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::InvalidGrid`] if `width` or `height` is zero.
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.width == 0 || self.height == 0 {
            return Err(ServerError::InvalidGrid {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ServerError> {
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ServerError::InvalidEnv { name, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: BTreeMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        assert_eq!(
            ServerConfig::from_lookup(lookup(&[])).unwrap(),
            ServerConfig::default()
        );
    }

    #[test]
    fn reads_every_variable() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("BIND_ADDR", "0.0.0.0"),
            ("PORT", "9000"),
            ("GRID_WIDTH", "20"),
            ("GRID_HEIGHT", " 15 "),
            ("SAFE_ROUTE_REPORTS", "data/reports.json"),
            ("SAFE_ROUTE_RISK_MODEL", "risk.toml"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.width, 20);
        assert_eq!(config.height, 15);
        assert_eq!(config.reports_path, Some(PathBuf::from("data/reports.json")));
        assert_eq!(config.risk_model_path, Some(PathBuf::from("risk.toml")));
    }

    #[test]
    fn rejects_unparseable_values() {
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[("PORT", "eighty")])),
            Err(ServerError::InvalidEnv { name: "PORT", .. })
        ));
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[("GRID_WIDTH", "-3")])),
            Err(ServerError::InvalidEnv {
                name: "GRID_WIDTH",
                ..
            })
        ));
    }

    #[test]
    fn rejects_zero_sized_grid() {
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[("GRID_HEIGHT", "0")])),
            Err(ServerError::InvalidGrid {
                width: 10,
                height: 0
            })
        ));
    }
}
