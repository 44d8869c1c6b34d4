//! Ports layer: Trait definitions for external collaborators.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and its configuration sources.

mod catalog;

pub use catalog::CatalogSource;
