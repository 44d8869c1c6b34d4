//! Risk engine: turns one assessment into pre-/post-test probabilities and a
//! recommendation.
//!
//! The engine holds the catalog it was built with and nothing else. Every
//! call is independent; identical inputs give identical results.

use std::sync::Arc;

use crate::domain::{
    adjusted_pre_test_probability, baseline_probability, post_test_probability, AssessmentError,
    AssessmentInput, CalculationResult, LikelihoodSource, ProbabilityError, Recommendation,
    TestCatalog, TestDefinition,
};
use crate::ports::CatalogSource;

/// Minimum shift (percentage points) a result must cause for the test to be
/// recommended.
pub const RECOMMENDATION_MARGIN: f64 = 30.0;

/// Stateless calculator over an immutable test catalog.
#[derive(Debug, Clone)]
pub struct RiskEngine {
    catalog: Arc<TestCatalog>,
}

impl RiskEngine {
    /// Create an engine over the given catalog.
    pub fn new(catalog: Arc<TestCatalog>) -> Self {
        Self { catalog }
    }

    /// Create an engine from a catalog source.
    ///
    /// # Errors
    /// Returns error if the source cannot produce a valid catalog.
    pub fn from_source<C: CatalogSource>(source: &C) -> Result<Self, crate::NeuroprobError> {
        let catalog = source.load_catalog()?;
        tracing::info!("Loaded {} tests from {}", catalog.len(), source.describe());
        Ok(Self::new(Arc::new(catalog)))
    }

    #[must_use]
    pub fn catalog(&self) -> &TestCatalog {
        &self.catalog
    }

    /// Age-based baseline (percent), for live display before a full calculation.
    #[must_use]
    pub fn baseline_probability(&self, age: i32) -> f64 {
        baseline_probability(age)
    }

    /// Run one calculation.
    ///
    /// # Errors
    /// Returns `InvalidInput`, `UndefinedTest` or `ArithmeticSingularity`.
    pub fn compute(&self, input: &AssessmentInput) -> Result<CalculationResult, AssessmentError> {
        compute_result(input, &self.catalog)
    }
}

/// Decide whether a test is worth ordering.
///
/// Below the test's threshold the answer is always no. Above it, the test is
/// recommended only if either result would move the estimate by more than
/// [`RECOMMENDATION_MARGIN`] points.
#[must_use]
pub fn classify_recommendation(
    adjusted_pre_test_probability: f64,
    test: &TestDefinition,
    positive_change: f64,
    negative_change: f64,
) -> Recommendation {
    if adjusted_pre_test_probability < test.threshold {
        Recommendation::NotRecommended
    } else if positive_change.abs() > RECOMMENDATION_MARGIN || negative_change.abs() > RECOMMENDATION_MARGIN {
        Recommendation::Recommended
    } else {
        Recommendation::NotRecommended
    }
}

fn singularity(test: &str, err: ProbabilityError) -> AssessmentError {
    AssessmentError::ArithmeticSingularity(format!("{test}: {err}"))
}

/// Compute the full result for one assessment against a catalog.
///
/// # Errors
/// - `InvalidInput` if the input fails validation
/// - `UndefinedTest` if the named test is not in the catalog
/// - `ArithmeticSingularity` if the Bayes update is undefined
pub fn compute_result(
    input: &AssessmentInput,
    catalog: &TestCatalog,
) -> Result<CalculationResult, AssessmentError> {
    if let Err(e) = input.validate() {
        tracing::warn!("Rejected assessment input: {}", e);
        return Err(e);
    }

    let test = catalog.find(&input.selected_test).ok_or_else(|| {
        tracing::warn!("Assessment references unknown test '{}'", input.selected_test);
        AssessmentError::UndefinedTest(input.selected_test.clone())
    })?;

    let (lr_positive, lr_negative, likelihood_source, likelihood_provenance) =
        match &input.likelihood_override {
            Some(overrides) => {
                let (positive, negative) = overrides.apply(test);
                (
                    positive,
                    negative,
                    LikelihoodSource::Override,
                    overrides.source.clone().or_else(|| test.source.clone()),
                )
            }
            None => (
                test.likelihood_ratio_positive,
                test.likelihood_ratio_negative,
                LikelihoodSource::Catalog,
                test.source.clone(),
            ),
        };

    let baseline = baseline_probability(input.patient_age);
    let adjusted = adjusted_pre_test_probability(input.clinician_probability, input.patient_age);
    let pre_test = adjusted / 100.0;

    tracing::debug!(
        "Pre-test: clinician={:.1}%, baseline={:.1}%, adjusted={:.1}%",
        input.clinician_probability,
        baseline,
        adjusted
    );

    let positive = post_test_probability(pre_test, lr_positive).map_err(|e| singularity(&test.name, e))?;
    let negative = post_test_probability(pre_test, lr_negative).map_err(|e| singularity(&test.name, e))?;

    let change_if_positive = (positive - pre_test) * 100.0;
    let change_if_negative = (negative - pre_test) * 100.0;

    let recommendation = classify_recommendation(adjusted, test, change_if_positive, change_if_negative);

    tracing::info!(
        "{}: LR+={} LR-={} ({:?}), post+={:.1}%, post-={:.1}%, {}",
        test.name,
        lr_positive,
        lr_negative,
        likelihood_source,
        positive * 100.0,
        negative * 100.0,
        recommendation
    );

    Ok(CalculationResult {
        test_name: test.name.clone(),
        threshold: test.threshold,
        clinician_probability: input.clinician_probability,
        baseline_probability: baseline,
        adjusted_pre_test_probability: adjusted,
        likelihood_ratio_positive: lr_positive,
        likelihood_ratio_negative: lr_negative,
        likelihood_source,
        likelihood_provenance,
        post_test_probability_if_positive: positive * 100.0,
        post_test_probability_if_negative: negative * 100.0,
        change_if_positive,
        change_if_negative,
        recommendation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::BuiltinCatalog;
    use crate::domain::LikelihoodOverride;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn worked_catalog() -> TestCatalog {
        TestCatalog::new(vec![TestDefinition::new("CSF Biomarker Panel", 10.0, 20.9, 0.07)])
            .expect("Valid catalog")
    }

    #[test]
    fn test_worked_scenario() {
        let catalog = worked_catalog();
        let input = AssessmentInput::new(20.0, 72, "CSF Biomarker Panel");
        let result = compute_result(&input, &catalog).expect("Should compute");

        assert!(approx(result.baseline_probability, 25.0));
        assert!(approx(result.adjusted_pre_test_probability, 25.0));
        assert!(approx(result.post_test_probability_if_positive, 100.0 * 20.9 / 23.9));
        assert!(approx(result.post_test_probability_if_negative, 100.0 * 0.07 / 3.07));
        assert!((result.change_if_positive - 62.45).abs() < 0.01);
        assert!(result.change_if_negative < 0.0);
        assert_eq!(result.recommendation, Recommendation::Recommended);
        assert_eq!(result.likelihood_source, LikelihoodSource::Catalog);
    }

    #[test]
    fn test_below_threshold_is_not_recommended() {
        let catalog = TestCatalog::new(vec![TestDefinition::new("Strong Test", 10.0, 1000.0, 0.001)])
            .expect("Valid catalog");
        let input = AssessmentInput::new(2.0, 50, "Strong Test");
        let result = compute_result(&input, &catalog).expect("Should compute");

        assert!(approx(result.adjusted_pre_test_probability, 3.0));
        assert!(result.change_if_positive > RECOMMENDATION_MARGIN);
        assert_eq!(result.recommendation, Recommendation::NotRecommended);
    }

    #[test]
    fn test_builtin_catalog_scenarios() {
        let engine = RiskEngine::from_source(&BuiltinCatalog).expect("Builtin loads");

        let ptau = engine
            .compute(&AssessmentInput::new(20.0, 72, "Phosphorylated Tau 217 (pTau 217)"))
            .expect("Should compute");
        assert!(approx(ptau.post_test_probability_if_positive, 100.0 * 3.1 / 4.1));
        assert_eq!(ptau.recommendation, Recommendation::Recommended);

        let nfl = engine
            .compute(&AssessmentInput::new(20.0, 72, "Neurofilament Light (NfL)"))
            .expect("Should compute");
        assert!(nfl.change_if_positive < RECOMMENDATION_MARGIN);
        assert!(nfl.change_if_negative.abs() < RECOMMENDATION_MARGIN);
        assert_eq!(nfl.recommendation, Recommendation::NotRecommended);
    }

    #[test]
    fn test_classification_boundaries() {
        let test = TestDefinition::new("T", 10.0, 2.0, 0.5);

        // Exactly at threshold passes the threshold gate.
        assert_eq!(classify_recommendation(10.0, &test, 30.5, 0.0), Recommendation::Recommended);
        assert_eq!(
            classify_recommendation(9.999, &test, 90.0, -90.0),
            Recommendation::NotRecommended
        );

        // A change of exactly the margin is not enough.
        assert_eq!(classify_recommendation(50.0, &test, 30.0, -30.0), Recommendation::NotRecommended);
        assert_eq!(classify_recommendation(50.0, &test, 5.0, -30.01), Recommendation::Recommended);
    }

    #[test]
    fn test_estimate_equal_to_threshold_passes_gate() {
        let catalog = TestCatalog::new(vec![
            TestDefinition::new("T29", 29.0, 100.0, 0.01),
            TestDefinition::new("T57", 57.0, 100.0, 0.01),
            TestDefinition::new("T58", 58.0, 100.0, 0.01),
        ])
        .expect("Valid catalog");

        for test in catalog.tests() {
            let input = AssessmentInput::new(test.threshold, 50, test.name.clone());
            let result = compute_result(&input, &catalog).expect("Should compute");

            assert_eq!(result.adjusted_pre_test_probability, test.threshold, "{}", test.name);
            assert!(result.change_if_positive > RECOMMENDATION_MARGIN);
            assert_eq!(result.recommendation, Recommendation::Recommended, "{}", test.name);
        }
    }

    #[test]
    fn test_unknown_test_is_reported() {
        let engine = RiskEngine::new(Arc::new(TestCatalog::builtin()));
        let err = engine
            .compute(&AssessmentInput::new(20.0, 72, "Lumbar Puncture"))
            .expect_err("Should fail");
        assert_eq!(err, AssessmentError::UndefinedTest("Lumbar Puncture".to_string()));
    }

    #[test]
    fn test_invalid_input_is_reported() {
        let engine = RiskEngine::new(Arc::new(TestCatalog::builtin()));
        let err = engine
            .compute(&AssessmentInput::new(120.0, 72, "Amyloid PET Scan"))
            .expect_err("Should fail");
        assert!(matches!(err, AssessmentError::InvalidInput(_)));
    }

    #[test]
    fn test_certain_pre_test_saturates() {
        let engine = RiskEngine::new(Arc::new(TestCatalog::builtin()));
        let result = engine
            .compute(&AssessmentInput::new(100.0, 50, "Amyloid PET Scan"))
            .expect("Saturation is defined");

        assert!(approx(result.adjusted_pre_test_probability, 100.0));
        assert!(approx(result.post_test_probability_if_positive, 100.0));
        assert!(approx(result.post_test_probability_if_negative, 100.0));
        assert!(approx(result.change_if_positive, 0.0));
        assert!(approx(result.change_if_negative, 0.0));
        assert_eq!(result.recommendation, Recommendation::NotRecommended);
    }

    #[test]
    fn test_monotonic_in_clinician_probability() {
        let engine = RiskEngine::new(Arc::new(TestCatalog::builtin()));
        let mut last_adjusted = 0.0;
        let mut last_positive = 0.0;

        for clinician in 0..=100 {
            let result = engine
                .compute(&AssessmentInput::new(f64::from(clinician), 68, "Amyloid PET Scan"))
                .expect("Should compute");
            assert!(result.adjusted_pre_test_probability >= last_adjusted);
            assert!(result.post_test_probability_if_positive >= last_positive);
            assert!(result.adjusted_pre_test_probability >= result.baseline_probability);
            last_adjusted = result.adjusted_pre_test_probability;
            last_positive = result.post_test_probability_if_positive;
        }
    }

    #[test]
    fn test_compute_is_idempotent() {
        let engine = RiskEngine::new(Arc::new(TestCatalog::builtin()));
        let input = AssessmentInput::new(33.0, 79, "Glial Fibrillary Acidic Protein (GFAP)");
        let first = engine.compute(&input).expect("Should compute");
        let second = engine.compute(&input).expect("Should compute");
        assert_eq!(first, second);
    }

    #[test]
    fn test_override_leaves_catalog_untouched() {
        let catalog = TestCatalog::builtin();
        let before = catalog.clone();

        let input = AssessmentInput::new(20.0, 72, "Neurofilament Light (NfL)").with_override(
            LikelihoodOverride {
                positive: Some(12.0),
                negative: None,
                source: Some("Local validation cohort".to_string()),
            },
        );
        let result = compute_result(&input, &catalog).expect("Should compute");

        assert_eq!(result.likelihood_source, LikelihoodSource::Override);
        assert!(approx(result.likelihood_ratio_positive, 12.0));
        assert!(approx(result.likelihood_ratio_negative, 0.5));
        assert_eq!(result.likelihood_provenance.as_deref(), Some("Local validation cohort"));
        assert_eq!(catalog, before);

        let plain = compute_result(&AssessmentInput::new(20.0, 72, "Neurofilament Light (NfL)"), &catalog)
            .expect("Should compute");
        assert!(approx(plain.likelihood_ratio_positive, 2.5));
    }
}
