//! Calculation result types.
//!
//! Represents the output of one pre-/post-test probability calculation.

use serde::{Deserialize, Serialize};

/// Positive-result probability above which disease is considered confirmed.
pub const CONFIRM_THRESHOLD: f64 = 95.0;

/// Negative-result probability below which disease is considered ruled out.
pub const RULE_OUT_THRESHOLD: f64 = 1.5;

/// Whether ordering the selected test is worthwhile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    /// Either result would move the estimate by a clinically meaningful margin
    Recommended,
    /// Below the test's threshold, or results would barely move the estimate
    NotRecommended,
}

impl Recommendation {
    /// Recommendation sentence for the named test.
    #[must_use]
    pub fn message(&self, test_name: &str) -> String {
        match self {
            Self::Recommended => {
                format!("{test_name} is recommended as it could significantly impact the diagnosis.")
            }
            Self::NotRecommended => format!(
                "{test_name} could provide additional information but is not strongly recommended."
            ),
        }
    }

    /// Get the associated color for TUI display (RGB).
    #[must_use]
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Self::Recommended => (16, 185, 129),   // Emerald (#10B981)
            Self::NotRecommended => (244, 63, 94), // Rose (#F43F5E)
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Recommended => write!(f, "RECOMMENDED"),
            Self::NotRecommended => write!(f, "NOT STRONGLY RECOMMENDED"),
        }
    }
}

/// Where the likelihood ratios used in a calculation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LikelihoodSource {
    Catalog,
    Override,
}

/// Everything derived from one assessment. Percent values throughout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub test_name: String,

    /// Test applicability threshold (percent)
    pub threshold: f64,

    pub clinician_probability: f64,
    pub baseline_probability: f64,
    pub adjusted_pre_test_probability: f64,

    /// Effective LR+ after any override
    pub likelihood_ratio_positive: f64,

    /// Effective LR- after any override
    pub likelihood_ratio_negative: f64,

    pub likelihood_source: LikelihoodSource,

    /// Provenance of the likelihood ratios, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likelihood_provenance: Option<String>,

    pub post_test_probability_if_positive: f64,
    pub post_test_probability_if_negative: f64,

    /// Signed percentage-point change on a positive result
    pub change_if_positive: f64,

    /// Signed percentage-point change on a negative result
    pub change_if_negative: f64,

    pub recommendation: Recommendation,
}

impl CalculationResult {
    /// A positive result would be enough to confidently confirm disease.
    #[must_use]
    pub fn positive_confirms_disease(&self) -> bool {
        self.post_test_probability_if_positive > CONFIRM_THRESHOLD
    }

    /// A negative result would be enough to confidently rule disease out.
    #[must_use]
    pub fn negative_rules_out_disease(&self) -> bool {
        self.post_test_probability_if_negative < RULE_OUT_THRESHOLD
    }

    /// Narrative reading of both possible results.
    #[must_use]
    pub fn interpretation(&self) -> Vec<String> {
        let positive = if self.positive_confirms_disease() {
            format!(
                "A positive result ({:.1}%) would be sufficient to confidently confirm Alzheimer's disease.",
                self.post_test_probability_if_positive
            )
        } else {
            format!(
                "A positive result ({:.1}%) would not be sufficient on its own to confirm Alzheimer's disease.",
                self.post_test_probability_if_positive
            )
        };

        let negative = if self.negative_rules_out_disease() {
            format!(
                "A negative result ({:.1}%) would be sufficient to confidently rule out Alzheimer's disease.",
                self.post_test_probability_if_negative
            )
        } else {
            format!(
                "A negative result ({:.1}%) would not be sufficient on its own to rule out Alzheimer's disease.",
                self.post_test_probability_if_negative
            )
        };

        vec![positive, negative]
    }

    /// Recommendation sentence for this result's test.
    #[must_use]
    pub fn recommendation_message(&self) -> String {
        self.recommendation.message(&self.test_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with(positive: f64, negative: f64) -> CalculationResult {
        CalculationResult {
            test_name: "Amyloid PET Scan".to_string(),
            threshold: 5.0,
            clinician_probability: 40.0,
            baseline_probability: 25.0,
            adjusted_pre_test_probability: 40.0,
            likelihood_ratio_positive: 30.7,
            likelihood_ratio_negative: 0.08,
            likelihood_source: LikelihoodSource::Catalog,
            likelihood_provenance: None,
            post_test_probability_if_positive: positive,
            post_test_probability_if_negative: negative,
            change_if_positive: positive - 40.0,
            change_if_negative: negative - 40.0,
            recommendation: Recommendation::Recommended,
        }
    }

    #[test]
    fn test_confidence_cutoffs_are_strict() {
        let at_cutoffs = result_with(95.0, 1.5);
        assert!(!at_cutoffs.positive_confirms_disease());
        assert!(!at_cutoffs.negative_rules_out_disease());

        let beyond = result_with(95.3, 1.4);
        assert!(beyond.positive_confirms_disease());
        assert!(beyond.negative_rules_out_disease());
    }

    #[test]
    fn test_interpretation_text() {
        let lines = result_with(95.3, 5.0).interpretation();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("confidently confirm"));
        assert!(lines[1].contains("not be sufficient"));
    }

    #[test]
    fn test_recommendation_messages() {
        let r = result_with(95.3, 1.4);
        assert_eq!(
            r.recommendation_message(),
            "Amyloid PET Scan is recommended as it could significantly impact the diagnosis."
        );
        assert!(Recommendation::NotRecommended
            .message("NfL")
            .ends_with("is not strongly recommended."));
    }
}
