//! CLI-level errors (wraps tree and settings errors)

use std::path::PathBuf;

use thiserror::Error;

use crate::config::SettingsError;
use crate::errors::TreeError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Tree(#[from] TreeError),

    #[error("{0}")]
    Settings(#[from] SettingsError),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("not found: {0}")]
    NotFound(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) => crate::exitcode::USAGE,
            CliError::NotFound(_) => crate::exitcode::NOTFOUND,
            CliError::Io { .. } => crate::exitcode::IOERR,
            CliError::Settings(_) => crate::exitcode::CONFIG,
            CliError::Tree(e) => match e {
                TreeError::Decode(_) | TreeError::Encode(_) => crate::exitcode::DATAERR,
                TreeError::OutOfRange { .. } => crate::exitcode::USAGE,
                _ => crate::exitcode::SOFTWARE,
            },
        }
    }
}
