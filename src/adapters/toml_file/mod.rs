//! TOML adapter: Implementation of CatalogSource backed by a file.
//!
//! Lets a site replace the built-in tests with its own validated numbers
//! without rebuilding. The file lists tests as an array of tables:
//!
//! ```toml
//! [[test]]
//! name = "Amyloid PET Scan"
//! threshold = 5
//! likelihood_ratio_positive = 30.7
//! likelihood_ratio_negative = 0.08
//! source = "Optional provenance"
//! ```
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::{CatalogError, TestCatalog, TestDefinition};
use crate::ports::CatalogSource;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default, rename = "test")]
    tests: Vec<TestDefinition>,
}

/// Parse catalog TOML text.
///
/// # Errors
/// Returns `Parse` for malformed TOML and the usual validation errors.
pub fn parse_catalog(text: &str) -> Result<TestCatalog, CatalogError> {
    let file: CatalogFile = toml::from_str(text)?;
    TestCatalog::new(file.tests)
}

/// Catalog source reading a TOML file on each load.
#[derive(Debug, Clone)]
pub struct TomlCatalogFile {
    path: PathBuf,
}

impl TomlCatalogFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for TomlCatalogFile {
    fn load_catalog(&self) -> Result<TestCatalog, CatalogError> {
        tracing::debug!("Reading test catalog from {:?}", self.path);
        let text = std::fs::read_to_string(&self.path)?;
        let catalog = parse_catalog(&text).map_err(|e| {
            tracing::error!("Catalog {:?} rejected: {}", self.path, e);
            e
        })?;
        Ok(catalog)
    }

    fn describe(&self) -> String {
        format!("catalog file {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
[[test]]
name = "CSF Biomarker Panel"
threshold = 10
likelihood_ratio_positive = 20.9
likelihood_ratio_negative = 0.07
source = "Memory clinic cohort"
source_link = "https://example.org/csf"

[[test]]
name = "Amyloid PET Scan"
threshold = 5.0
likelihood_ratio_positive = 30.7
likelihood_ratio_negative = 0.08
"#;

    #[test]
    fn test_parse_sample() {
        let catalog = parse_catalog(SAMPLE).expect("Should parse");
        assert_eq!(catalog.len(), 2);

        let csf = catalog.find("CSF Biomarker Panel").expect("Should exist");
        assert!((csf.threshold - 10.0).abs() < f64::EPSILON);
        assert_eq!(csf.source.as_deref(), Some("Memory clinic cohort"));
        assert!(catalog.find("Amyloid PET Scan").and_then(|t| t.source.as_ref()).is_none());
    }

    #[test]
    fn test_parse_rejects_invalid_values() {
        let text = r#"
[[test]]
name = "Broken"
threshold = 10
likelihood_ratio_positive = 0
likelihood_ratio_negative = 0.5
"#;
        assert!(matches!(parse_catalog(text), Err(CatalogError::InvalidEntry { .. })));
    }

    #[test]
    fn test_parse_rejects_malformed_toml() {
        assert!(matches!(parse_catalog("[[test]\nname ="), Err(CatalogError::Parse(_))));
        assert!(matches!(parse_catalog(""), Err(CatalogError::Empty)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("Should create temp file");
        file.write_all(SAMPLE.as_bytes()).expect("Should write");

        let source = TomlCatalogFile::new(file.path());
        let catalog = source.load_catalog().expect("Should load");
        assert_eq!(catalog.len(), 2);
        assert!(source.describe().starts_with("catalog file "));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let source = TomlCatalogFile::new(dir.path().join("absent.toml"));
        assert!(matches!(source.load_catalog(), Err(CatalogError::Io(_))));
    }
}
