//! Runtime configuration
//!
//! Resolved once at startup from the environment.

use std::path::PathBuf;

use crate::measure::MeasurementSystem;

/// Environment variable holding the SQLite database path
pub const DATABASE_PATH_VAR: &str = "LARDER_DATABASE_PATH";
/// Environment variable holding the default measurement system
pub const UNIT_SYSTEM_VAR: &str = "LARDER_UNIT_SYSTEM";
/// Default tracing directive when RUST_LOG is unset
pub const DEFAULT_LOG_DIRECTIVE: &str = "larder=info";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    /// System used when a recipe is rendered without an explicit choice
    pub default_system: MeasurementSystem,
}

impl Config {
    pub fn from_env() -> Self {
        let database_path = std::env::var(DATABASE_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_database_path());

        let default_system = match std::env::var(UNIT_SYSTEM_VAR) {
            Ok(value) => parse_system(&value),
            Err(_) => MeasurementSystem::default(),
        };

        Self {
            database_path,
            default_system,
        }
    }
}

fn parse_system(value: &str) -> MeasurementSystem {
    MeasurementSystem::from_str(value).unwrap_or_else(|| {
        tracing::warn!(value, "unknown {}; using metric", UNIT_SYSTEM_VAR);
        MeasurementSystem::Metric
    })
}

/// `<project root>/data/larder.db`, where the project root is found by
/// walking up from target/debug or target/release
fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
            path = grandparent.to_path_buf();
        }
    }

    path.push("data");
    path.push("larder.db");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_system() {
        assert_eq!(parse_system("imperial"), MeasurementSystem::Imperial);
        assert_eq!(parse_system("METRIC"), MeasurementSystem::Metric);
        assert_eq!(parse_system("cubits"), MeasurementSystem::Metric);
    }

    #[test]
    fn test_default_database_path_file_name() {
        let path = default_database_path();
        assert!(path.ends_with("data/larder.db"));
    }
}
