//! Adapters layer: Concrete implementations of ports.
//!
//! - `builtin`: compiled-in catalog
//! - `toml_file`: catalog read from a TOML file

mod builtin;
pub mod toml_file;

pub use builtin::BuiltinCatalog;
pub use toml_file::TomlCatalogFile;
