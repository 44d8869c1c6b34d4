//! # neuroprob
//!
//! Bayesian pre-/post-test probability calculator for Alzheimer's disease
//! diagnostics.
//!
//! This crate provides:
//! - Age-based baseline probabilities with a clinician estimate on top
//! - Odds-form Bayes updates for positive and negative test results
//! - A recommendation rule for whether a test is worth ordering
//! - Terminal UI with a step wizard and a Fagan nomogram
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types and arithmetic (probabilities, catalog, results)
//! - `ports`: Trait definitions for external collaborators
//! - `adapters`: Concrete catalog sources (built-in, TOML file)
//! - `application`: The risk engine and report rendering
//! - `config`: Environment-driven settings
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use application::RiskEngine;
pub use domain::{AssessmentInput, CalculationResult, Recommendation, TestCatalog, TestDefinition};

/// Result type for neuroprob operations
pub type Result<T> = std::result::Result<T, NeuroprobError>;

/// Main error type for neuroprob
#[derive(Debug, thiserror::Error)]
pub enum NeuroprobError {
    #[error("Assessment failed: {0}")]
    Assessment(#[from] domain::AssessmentError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] domain::CatalogError),
}
