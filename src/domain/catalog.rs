//! Diagnostic test catalog.
//!
//! The catalog is configuration: it is validated once when built and never
//! changes afterwards. Per-session likelihood-ratio edits live on the
//! assessment input instead (see [`crate::domain::LikelihoodOverride`]).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Errors produced while building or loading a test catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Catalog contains no tests")]
    Empty,

    #[error("Duplicate test name: {0}")]
    DuplicateName(String),

    #[error("Invalid test '{name}': {reason}")]
    InvalidEntry { name: String, reason: String },

    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A diagnostic test and its published operating characteristics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestDefinition {
    /// Display name, unique within a catalog
    pub name: String,

    /// Minimum pre-test probability (percent) at which the test applies
    pub threshold: f64,

    /// Factor applied to the pre-test odds on a positive result
    pub likelihood_ratio_positive: f64,

    /// Factor applied to the pre-test odds on a negative result
    pub likelihood_ratio_negative: f64,

    /// Where the numbers come from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_link: Option<String>,
}

impl TestDefinition {
    /// Create a test definition without provenance.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        threshold: f64,
        likelihood_ratio_positive: f64,
        likelihood_ratio_negative: f64,
    ) -> Self {
        Self {
            name: name.into(),
            threshold,
            likelihood_ratio_positive,
            likelihood_ratio_negative,
            source: None,
            source_link: None,
        }
    }

    /// Check the entry on its own.
    ///
    /// # Errors
    /// Returns the list of problems found.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push("name must not be empty".to_string());
        }
        if !(0.0..=100.0).contains(&self.threshold) {
            errors.push(format!("threshold {} out of range [0, 100]", self.threshold));
        }
        if !is_valid_likelihood_ratio(self.likelihood_ratio_positive) {
            errors.push(format!(
                "LR+ {} must be finite and greater than 0",
                self.likelihood_ratio_positive
            ));
        }
        if !is_valid_likelihood_ratio(self.likelihood_ratio_negative) {
            errors.push(format!(
                "LR- {} must be finite and greater than 0",
                self.likelihood_ratio_negative
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Likelihood ratios in a catalog or an override must be strictly positive.
#[must_use]
pub fn is_valid_likelihood_ratio(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Validated, read-only list of tests.
#[derive(Debug, Clone, PartialEq)]
pub struct TestCatalog {
    tests: Vec<TestDefinition>,
}

impl TestCatalog {
    /// Build a catalog, validating every entry.
    ///
    /// # Errors
    /// Returns error if the list is empty, an entry is invalid, or a name repeats.
    pub fn new(tests: Vec<TestDefinition>) -> Result<Self, CatalogError> {
        if tests.is_empty() {
            return Err(CatalogError::Empty);
        }

        {
            let mut seen = HashSet::with_capacity(tests.len());
            for test in &tests {
                if let Err(errors) = test.validate() {
                    return Err(CatalogError::InvalidEntry {
                        name: test.name.clone(),
                        reason: errors.join(", "),
                    });
                }
                if !seen.insert(test.name.as_str()) {
                    return Err(CatalogError::DuplicateName(test.name.clone()));
                }
            }
        }

        Ok(Self { tests })
    }

    /// The compiled-in catalog of blood biomarkers and imaging.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            tests: vec![
                TestDefinition::new("Neurofilament Light (NfL)", 20.0, 2.5, 0.5),
                TestDefinition::new("Glial Fibrillary Acidic Protein (GFAP)", 15.0, 5.0, 0.1),
                TestDefinition::new("Phosphorylated Tau 217 (pTau 217)", 10.0, 9.3, 0.46),
                TestDefinition::new("Amyloid PET Scan", 5.0, 30.7, 0.08),
            ],
        }
    }

    /// Look up a test by its exact name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&TestDefinition> {
        self.tests.iter().find(|t| t.name == name)
    }

    #[must_use]
    pub fn tests(&self) -> &[TestDefinition] {
        &self.tests
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tests.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }
}
