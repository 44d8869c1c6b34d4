//! Application layer: Use cases and services.
//!
//! Orchestrates domain arithmetic with the catalog port.

mod report;
mod risk_engine;

pub use report::{render_catalog, render_text_report};
pub use risk_engine::{classify_recommendation, compute_result, RiskEngine, RECOMMENDATION_MARGIN};
