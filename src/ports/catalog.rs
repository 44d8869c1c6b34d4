//! Catalog port: Trait for supplying the diagnostic test catalog.
//!
//! The engine never decides which tests exist; a configuration source does.

use crate::domain::{CatalogError, TestCatalog};

/// Trait for catalog sources.
///
/// Implementations return a fully validated catalog. The engine keeps the
/// result for the rest of the session and never writes back to it.
pub trait CatalogSource: Send + Sync {
    /// Load and validate the catalog.
    ///
    /// # Errors
    /// Returns `CatalogError` if the catalog cannot be read or fails validation.
    fn load_catalog(&self) -> Result<TestCatalog, CatalogError>;

    /// Human-readable description of where the catalog comes from.
    fn describe(&self) -> String;
}
