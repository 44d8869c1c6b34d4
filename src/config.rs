//! Runtime configuration from environment variables.

use std::path::PathBuf;

use crate::adapters::{BuiltinCatalog, TomlCatalogFile};
use crate::application::RiskEngine;

const CATALOG_PATH_ENV: &str = "NEUROPROB_CATALOG_PATH";
const LOG_MODE_ENV: &str = "NEUROPROB_LOG_MODE";
const LOG_FILE_ENV: &str = "NEUROPROB_LOG_FILE";

const DEFAULT_LOG_FILE: &str = "neuroprob.log";

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// File when stdout is a terminal, stdout otherwise
    Auto,
    File,
    Stdout,
}

impl LogMode {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Self::File,
            "stdout" => Self::Stdout,
            _ => Self::Auto,
        }
    }

    /// Resolve `Auto` against whether stdout is interactive.
    #[must_use]
    pub fn writes_to_file(&self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// TOML catalog to load instead of the built-in one
    pub catalog_path: Option<PathBuf>,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            log_mode: LogMode::Auto,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl AppConfig {
    /// Read settings from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary lookup (environment, test map, ...).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            catalog_path: lookup(CATALOG_PATH_ENV)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            log_mode: lookup(LOG_MODE_ENV).map_or(defaults.log_mode, |v| LogMode::parse(&v)),
            log_file: lookup(LOG_FILE_ENV)
                .filter(|v| !v.trim().is_empty())
                .map_or(defaults.log_file, PathBuf::from),
        }
    }

    /// Build the engine over the configured catalog.
    ///
    /// # Errors
    /// Returns error if a configured catalog file cannot be loaded.
    pub fn build_engine(&self) -> crate::Result<RiskEngine> {
        match &self.catalog_path {
            Some(path) => RiskEngine::from_source(&TomlCatalogFile::new(path)),
            None => RiskEngine::from_source(&BuiltinCatalog),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_reads_all_variables() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (CATALOG_PATH_ENV, "/etc/neuroprob/tests.toml"),
            (LOG_MODE_ENV, "STDOUT"),
            (LOG_FILE_ENV, "/var/log/neuroprob.log"),
        ]));

        assert_eq!(config.catalog_path, Some(PathBuf::from("/etc/neuroprob/tests.toml")));
        assert_eq!(config.log_mode, LogMode::Stdout);
        assert_eq!(config.log_file, PathBuf::from("/var/log/neuroprob.log"));
    }

    #[test]
    fn test_unknown_log_mode_falls_back_to_auto() {
        let config = AppConfig::from_lookup(lookup_from(&[(LOG_MODE_ENV, "syslog")]));
        assert_eq!(config.log_mode, LogMode::Auto);
        assert!(config.log_mode.writes_to_file(true));
        assert!(!config.log_mode.writes_to_file(false));
    }

    #[test]
    fn test_builds_engine_from_builtin_catalog() {
        let engine = AppConfig::default().build_engine().expect("Builtin loads");
        assert_eq!(engine.catalog().len(), 4);
    }

    #[test]
    fn test_missing_catalog_file_fails() {
        let config = AppConfig {
            catalog_path: Some(PathBuf::from("/nonexistent/neuroprob/catalog.toml")),
            ..AppConfig::default()
        };
        assert!(config.build_engine().is_err());
    }
}
