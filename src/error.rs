//! CLI error types.
//!
//! Every failure a command can report funnels into [`CliError`]; `main`
//! prints it and exits with [`EXIT_ERROR`]. Nothing here is retried.

use thiserror::Error;
use tonic::Status;

/// Process exit code for any reported command failure.
pub const EXIT_ERROR: u8 = 1;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Malformed or missing command line input.
    #[error("invalid argument: {0}")]
    Validation(String),

    /// Configuration could not be loaded, parsed or saved.
    #[error("configuration error: {0:#}")]
    Config(#[from] anyhow::Error),

    /// The backend channel could not be established.
    #[error("connection error: {0}")]
    Connection(String),

    /// A backend call failed or ran past its deadline.
    #[error("Unable to {action}: {}: {}", .status.code(), .status.message())]
    Rpc {
        action: &'static str,
        status: Status,
    },

    /// Writing command output failed (closed stdout, broken pipe).
    #[error("write error: {0}")]
    Write(#[from] std::io::Error),

    /// `completion` was given a shell it cannot generate for.
    #[error("unsupported shell type {0}")]
    UnsupportedShell(String),
}

impl CliError {
    /// Wrap a gRPC status with the user-facing verb phrase of the failed call.
    pub fn rpc(action: &'static str, status: Status) -> Self {
        Self::Rpc { action, status }
    }

    pub fn exit_code(&self) -> u8 {
        EXIT_ERROR
    }
}

pub type Result<T, E = CliError> = std::result::Result<T, E>;
