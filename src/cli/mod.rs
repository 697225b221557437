//! CLI command handlers for LazyQR.
//!
//! Headless, scriptable access to payload formatting, rendering and the
//! persisted style configuration.

pub mod common;
pub mod config;
pub mod content;
pub mod format;
pub mod render;

// Re-export types used by main.rs and tests
pub use common::{CliError, CliResult, ExitCode};
pub use config::ConfigArgs;
pub use format::FormatArgs;
pub use render::RenderArgs;
