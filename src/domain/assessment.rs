//! Per-calculation input: what the clinician entered for one patient.

use serde::{Deserialize, Serialize};

use super::catalog::{is_valid_likelihood_ratio, TestDefinition};

/// Errors surfaced for a single calculation request.
///
/// None of these are fatal; the caller shows the message and lets the user
/// correct the input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssessmentError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown test: {0}")]
    UndefinedTest(String),

    #[error("Undefined probability update: {0}")]
    ArithmeticSingularity(String),
}

/// Session-local replacement for a test's catalog likelihood ratios.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LikelihoodOverride {
    pub positive: Option<f64>,
    pub negative: Option<f64>,
    /// Provenance shown next to the edited values
    pub source: Option<String>,
}

impl LikelihoodOverride {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positive.is_none() && self.negative.is_none()
    }

    /// # Errors
    /// Returns `InvalidInput` if a supplied ratio is not finite and positive.
    pub fn validate(&self) -> Result<(), AssessmentError> {
        for (label, value) in [("LR+", self.positive), ("LR-", self.negative)] {
            if let Some(v) = value {
                if !is_valid_likelihood_ratio(v) {
                    return Err(AssessmentError::InvalidInput(format!(
                        "{label} override {v} must be greater than 0"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Effective (LR+, LR-) for the given test.
    #[must_use]
    pub fn apply(&self, test: &TestDefinition) -> (f64, f64) {
        (
            self.positive.unwrap_or(test.likelihood_ratio_positive),
            self.negative.unwrap_or(test.likelihood_ratio_negative),
        )
    }
}

/// One calculation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentInput {
    /// Clinician's subjective estimate, percent
    pub clinician_probability: f64,

    /// Patient age in whole years
    pub patient_age: i32,

    /// Catalog name of the chosen test
    pub selected_test: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likelihood_override: Option<LikelihoodOverride>,
}

impl AssessmentInput {
    #[must_use]
    pub fn new(clinician_probability: f64, patient_age: i32, selected_test: impl Into<String>) -> Self {
        Self {
            clinician_probability,
            patient_age,
            selected_test: selected_test.into(),
            likelihood_override: None,
        }
    }

    /// Attach a likelihood-ratio override. An empty override is dropped.
    #[must_use]
    pub fn with_override(mut self, overrides: LikelihoodOverride) -> Self {
        self.likelihood_override = (!overrides.is_empty()).then_some(overrides);
        self
    }

    /// Build an input from raw form text.
    ///
    /// # Errors
    /// Returns `InvalidInput` if a number cannot be parsed or no test is named.
    pub fn parse(age: &str, clinician_probability: &str, selected_test: &str) -> Result<Self, AssessmentError> {
        let patient_age: i32 = age
            .trim()
            .parse()
            .map_err(|_| AssessmentError::InvalidInput(format!("Age '{}' is not a whole number", age.trim())))?;

        let probability: f64 = clinician_probability.trim().parse().map_err(|_| {
            AssessmentError::InvalidInput(format!(
                "Probability '{}' is not a number",
                clinician_probability.trim()
            ))
        })?;

        if selected_test.trim().is_empty() {
            return Err(AssessmentError::InvalidInput("No test selected".to_string()));
        }

        Ok(Self::new(probability, patient_age, selected_test.trim()))
    }

    /// Check ranges before any arithmetic runs.
    ///
    /// # Errors
    /// Returns `InvalidInput` describing the first problem found.
    pub fn validate(&self) -> Result<(), AssessmentError> {
        if !self.clinician_probability.is_finite() || !(0.0..=100.0).contains(&self.clinician_probability) {
            return Err(AssessmentError::InvalidInput(format!(
                "Probability {} out of range [0, 100]",
                self.clinician_probability
            )));
        }
        if self.patient_age < 0 {
            return Err(AssessmentError::InvalidInput(format!(
                "Age {} must not be negative",
                self.patient_age
            )));
        }
        if self.selected_test.trim().is_empty() {
            return Err(AssessmentError::InvalidInput("No test selected".to_string()));
        }
        if let Some(overrides) = &self.likelihood_override {
            overrides.validate()?;
        }
        Ok(())
    }
}
