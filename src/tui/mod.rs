//! TUI module: Terminal User Interface using Ratatui.
//!
//! Walks the clinician through:
//! - Patient age (with live baseline)
//! - Clinician probability estimate
//! - Test selection
//! - Result with recommendation and Fagan nomogram

mod app;
mod styles;
mod ui;
mod wizard;

pub use app::App;
pub use styles::ClinicalTheme;
pub use wizard::{EditField, NomogramBranch, Wizard, WizardCommand, WizardStep};
