//! Built-in adapter: the compiled-in test catalog.

use crate::domain::{CatalogError, TestCatalog};
use crate::ports::CatalogSource;

/// Catalog source that needs no configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalog;

impl CatalogSource for BuiltinCatalog {
    fn load_catalog(&self) -> Result<TestCatalog, CatalogError> {
        Ok(TestCatalog::builtin())
    }

    fn describe(&self) -> String {
        "built-in catalog".to_string()
    }
}
