//! Fagan nomogram geometry.
//!
//! Three vertical axes: pre-test probability (left, inverted), likelihood
//! ratio (middle) and post-test probability (right). Coordinates grow
//! downward, like screen rows. With the middle axis scaled by one half, a
//! straight line from the pre-test value through the likelihood ratio lands
//! on the post-test value.

use super::probability::logit;

/// Probability tick marks (percent) on the outer axes.
pub const PROBABILITY_TICKS: [f64; 13] = [
    1.0, 5.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 95.0, 99.0,
];

/// Tick marks on the likelihood-ratio axis.
pub const LIKELIHOOD_RATIO_TICKS: [f64; 10] = [0.1, 0.2, 0.5, 1.0, 2.0, 5.0, 10.0, 20.0, 50.0, 100.0];

/// Drawable percent range; 0% and 100% have no finite log-odds.
const MIN_DRAWABLE_PERCENT: f64 = 0.1;
const MAX_DRAWABLE_PERCENT: f64 = 99.9;

/// Smallest likelihood ratio placed on the axis.
const MIN_DRAWABLE_RATIO: f64 = 1e-3;

/// Linear map from log-odds to a vertical coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NomogramLayout {
    /// Units per natural-log unit of odds
    pub scale: f64,
    /// Coordinate of even odds (50%, LR 1)
    pub offset: f64,
}

impl Default for NomogramLayout {
    fn default() -> Self {
        Self {
            scale: 100.0,
            offset: 150.0,
        }
    }
}

/// One reading on the chart: pre-test, likelihood ratio, post-test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NomogramReading {
    pub pre_test_y: f64,
    pub likelihood_ratio_y: f64,
    pub post_test_y: f64,
}

impl NomogramReading {
    /// Distance of the middle point from the straight line joining the outer
    /// points. Zero for an exact Bayes update.
    #[must_use]
    pub fn collinearity_error(&self) -> f64 {
        ((self.pre_test_y + self.post_test_y) / 2.0 - self.likelihood_ratio_y).abs()
    }
}

fn clamp_percent(percent: f64) -> f64 {
    percent.clamp(MIN_DRAWABLE_PERCENT, MAX_DRAWABLE_PERCENT)
}

impl NomogramLayout {
    /// Position on the post-test axis (higher probability is higher up).
    #[must_use]
    pub fn post_test_y(&self, percent: f64) -> f64 {
        self.offset - logit(clamp_percent(percent) / 100.0) * self.scale
    }

    /// Position on the inverted pre-test axis (higher probability is lower down).
    #[must_use]
    pub fn pre_test_y(&self, percent: f64) -> f64 {
        self.offset + logit(clamp_percent(percent) / 100.0) * self.scale
    }

    /// Position on the middle axis.
    #[must_use]
    pub fn likelihood_ratio_y(&self, likelihood_ratio: f64) -> f64 {
        self.offset - likelihood_ratio.max(MIN_DRAWABLE_RATIO).ln() * self.scale / 2.0
    }

    /// Place one calculation on the chart.
    #[must_use]
    pub fn reading(&self, pre_test_percent: f64, likelihood_ratio: f64, post_test_percent: f64) -> NomogramReading {
        NomogramReading {
            pre_test_y: self.pre_test_y(pre_test_percent),
            likelihood_ratio_y: self.likelihood_ratio_y(likelihood_ratio),
            post_test_y: self.post_test_y(post_test_percent),
        }
    }

    /// Vertical extent covering every tick on every axis, as (top, bottom).
    #[must_use]
    pub fn extent(&self) -> (f64, f64) {
        let first = PROBABILITY_TICKS[0];
        let last = PROBABILITY_TICKS[PROBABILITY_TICKS.len() - 1];
        let candidates = [
            self.post_test_y(first),
            self.post_test_y(last),
            self.pre_test_y(first),
            self.pre_test_y(last),
        ];
        let top = candidates.iter().copied().fold(f64::INFINITY, f64::min);
        let bottom = candidates.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (top, bottom)
    }
}
