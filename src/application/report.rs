//! Plain-text rendering of a calculation, for the one-shot report binary.

use std::fmt::{self, Write};

use crate::domain::{CalculationResult, LikelihoodSource, TestCatalog};

fn signed(value: f64) -> String {
    if value > 0.0 {
        format!("+{value:.1}%")
    } else {
        format!("{value:.1}%")
    }
}

/// Write the recommendation, calculation details and interpretation.
///
/// # Errors
/// Returns error if the underlying writer fails.
pub fn render_text_report<W: Write>(out: &mut W, result: &CalculationResult) -> fmt::Result {
    writeln!(out, "Recommendation")?;
    writeln!(out, "  {}", result.recommendation_message())?;
    writeln!(out)?;

    writeln!(out, "Initial Probabilities")?;
    writeln!(out, "  Clinician's Estimate:   {:.1}%", result.clinician_probability)?;
    writeln!(out, "  Baseline (Age-based):   {:.1}%", result.baseline_probability)?;
    writeln!(out, "  Adjusted Pre-test:      {:.1}%", result.adjusted_pre_test_probability)?;
    writeln!(out)?;

    writeln!(out, "Test Parameters")?;
    writeln!(out, "  Test Threshold:         {}%", result.threshold)?;
    writeln!(out, "  LR+:                    {:.1}", result.likelihood_ratio_positive)?;
    writeln!(out, "  LR-:                    {:.2}", result.likelihood_ratio_negative)?;
    if result.likelihood_source == LikelihoodSource::Override {
        writeln!(out, "  (custom likelihood ratios)")?;
    }
    if let Some(provenance) = &result.likelihood_provenance {
        writeln!(out, "  Source:                 {provenance}")?;
    }
    writeln!(out)?;

    writeln!(out, "Post-Test Probabilities")?;
    writeln!(out, "  Positive Result:        {:.1}%", result.post_test_probability_if_positive)?;
    writeln!(out, "  Negative Result:        {:.1}%", result.post_test_probability_if_negative)?;
    writeln!(out, "  Positive Change:        {}", signed(result.change_if_positive))?;
    writeln!(out, "  Negative Change:        {}", signed(result.change_if_negative))?;
    writeln!(out)?;

    writeln!(out, "Interpretation")?;
    for line in result.interpretation() {
        writeln!(out, "  {line}")?;
    }
    Ok(())
}

/// Write one line per catalog entry.
///
/// # Errors
/// Returns error if the underlying writer fails.
pub fn render_catalog<W: Write>(out: &mut W, catalog: &TestCatalog) -> fmt::Result {
    for test in catalog.tests() {
        writeln!(
            out,
            "{}  (threshold {}%, LR+ {}, LR- {})",
            test.name, test.threshold, test.likelihood_ratio_positive, test.likelihood_ratio_negative
        )?;
    }
    Ok(())
}
