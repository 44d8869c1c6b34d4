//! Domain layer: Core business types and logic.
//!
//! Pure types and arithmetic with no I/O. Everything here is deterministic
//! and safe to call from any presentation layer.

mod assessment;
mod catalog;
pub mod nomogram;
mod outcome;
pub mod probability;

pub use assessment::{AssessmentError, AssessmentInput, LikelihoodOverride};
pub use catalog::{is_valid_likelihood_ratio, CatalogError, TestCatalog, TestDefinition};
pub use nomogram::{NomogramLayout, NomogramReading};
pub use outcome::{
    CalculationResult, LikelihoodSource, Recommendation, CONFIRM_THRESHOLD, RULE_OUT_THRESHOLD,
};
pub use probability::{
    adjusted_pre_test_probability, baseline_probability, post_test_probability, ProbabilityError,
};
