//! Structured error handling and exit codes.

use serde::Serialize;

/// Exit codes for dupecat.
///
/// - 0: Success (command completed normally)
/// - 1: General error (catalog unreadable, scan root failure, bad config)
/// - 3: Partial success (completed, but some files could not be hashed or deleted)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: the command completed normally.
    Success = 0,
    /// General error: a fatal condition stopped the command.
    GeneralError = 1,
    /// Partial success: completed with some per-file failures.
    PartialSuccess = 3,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DC000",
            Self::GeneralError => "DC001",
            Self::PartialSuccess => "DC003",
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DC001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message, including its causes
    pub message: String,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{:#}", err),
        }
    }
}
