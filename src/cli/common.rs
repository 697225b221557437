//! Error and exit-code plumbing shared by the CLI commands.

use std::fmt;
use thiserror::Error;

use crate::forms::FormError;
use crate::storage::FileStorage;
use crate::store::StyleStore;

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command succeeded
    Success = 0,
    /// Invalid input or configuration value
    ValidationError = 1,
    /// File or storage access failed
    IoError = 2,
}

impl ExitCode {
    /// Numeric process exit code.
    pub const fn code(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A failed command: message for stderr plus exit code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CliError {
    /// Exit code to terminate with
    pub code: ExitCode,
    /// User-facing message
    pub message: String,
}

impl CliError {
    /// Invalid input (exit code 1).
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::ValidationError,
            message: message.into(),
        }
    }

    /// I/O failure (exit code 2).
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::IoError,
            message: message.into(),
        }
    }
}

impl From<FormError> for CliError {
    fn from(error: FormError) -> Self {
        Self::validation(error.to_string())
    }
}

/// Result type of CLI command handlers.
pub type CliResult<T> = Result<T, CliError>;

/// Opens the style store in the default storage directory.
pub fn open_store() -> CliResult<StyleStore<FileStorage>> {
    let storage = FileStorage::open_default()
        .map_err(|e| CliError::io(format!("Failed to locate storage directory: {e:#}")))?;
    tracing::debug!("Using storage directory {}", storage.dir().display());
    Ok(StyleStore::open(storage))
}

/// Parses a named value, reporting failures as validation errors.
pub fn parse_value<T>(value: &str) -> CliResult<T>
where
    T: std::str::FromStr<Err = anyhow::Error>,
{
    value
        .parse()
        .map_err(|e: anyhow::Error| CliError::validation(e.to_string()))
}
