//! Probability arithmetic: age baseline, pre-test floor and the odds-form
//! Bayes update.
//!
//! Percent values (0-100) are what users enter and read. Fractions (0-1) are
//! what the odds conversion works on. The floor stays in percent so a value
//! equal to a catalog threshold compares equal to it.

/// Errors raised by the odds-form Bayes update.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProbabilityError {
    #[error("Probability {0} outside [0, 1]")]
    OutOfRange(f64),

    #[error("Likelihood ratio {0} must be a finite, non-negative number")]
    InvalidLikelihoodRatio(f64),

    #[error("Pre-test probability of 100% combined with a likelihood ratio of 0 is undefined")]
    Singular,
}

/// Upper bound (inclusive) of each age bracket and its baseline percent.
/// Ages above the last bound fall into [`OLDEST_BRACKET_BASELINE`].
const AGE_BRACKETS: [(i32, f64); 6] = [
    (59, 3.0),
    (65, 10.0),
    (70, 15.0),
    (75, 25.0),
    (80, 35.0),
    (85, 50.0),
];

const OLDEST_BRACKET_BASELINE: f64 = 65.0;

/// Population prior probability (percent) for a patient of the given age.
///
/// Total over all integers. Negative ages land in the youngest bracket.
#[must_use]
pub fn baseline_probability(age: i32) -> f64 {
    AGE_BRACKETS
        .iter()
        .find(|(upper, _)| age <= *upper)
        .map_or(OLDEST_BRACKET_BASELINE, |(_, baseline)| *baseline)
}

/// Pre-test probability (percent) after applying the age baseline as a floor.
///
/// A clinician may raise the estimate above the population rate but never
/// lower it.
#[must_use]
pub fn adjusted_pre_test_probability(clinician_probability: f64, age: i32) -> f64 {
    clinician_probability.max(baseline_probability(age))
}

/// Convert a probability to odds. Undefined at `p == 1`.
#[must_use]
pub fn to_odds(probability: f64) -> f64 {
    probability / (1.0 - probability)
}

/// Convert odds back to a probability.
#[must_use]
pub fn from_odds(odds: f64) -> f64 {
    odds / (1.0 + odds)
}

/// Bayes update of a pre-test probability (fraction) by a likelihood ratio.
///
/// A pre-test probability of exactly 1 saturates: any positive likelihood
/// ratio leaves it at 1, which is the limit of the odds formula as `p -> 1`.
/// A likelihood ratio of 0 collapses any `p < 1` to exactly 0.
///
/// # Errors
/// - [`ProbabilityError::OutOfRange`] if `pre_test` is not within [0, 1]
/// - [`ProbabilityError::InvalidLikelihoodRatio`] if the ratio is negative or not finite
/// - [`ProbabilityError::Singular`] for `pre_test == 1` with a ratio of 0
pub fn post_test_probability(pre_test: f64, likelihood_ratio: f64) -> Result<f64, ProbabilityError> {
    if !(0.0..=1.0).contains(&pre_test) {
        return Err(ProbabilityError::OutOfRange(pre_test));
    }
    if !likelihood_ratio.is_finite() || likelihood_ratio < 0.0 {
        return Err(ProbabilityError::InvalidLikelihoodRatio(likelihood_ratio));
    }

    if pre_test >= 1.0 {
        return if likelihood_ratio > 0.0 {
            Ok(1.0)
        } else {
            Err(ProbabilityError::Singular)
        };
    }

    let post_odds = to_odds(pre_test) * likelihood_ratio;
    Ok(from_odds(post_odds))
}

/// Natural log-odds, used by the nomogram axes.
#[must_use]
pub fn logit(probability: f64) -> f64 {
    to_odds(probability).ln()
}
