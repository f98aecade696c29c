//! Error types for `Casefile`
//!
//! The top-level error aggregates case, library and I/O failures and maps
//! each one to a process exit code.

use thiserror::Error;

pub use casefile_core::error::{CaseError, Severity, ValidationIssue};

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `casefile` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Case error (invalid YAML, validation failure, unknown case)
    pub const CASE_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `casefile` operations.
#[derive(Debug, Error)]
pub enum CasefileError {
    /// Case loading or validation error
    #[error(transparent)]
    Case(#[from] CaseError),

    /// Case library error
    #[error(transparent)]
    Library(#[from] LibraryError),

    /// Invalid command-line usage
    #[error("usage error: {0}")]
    Usage(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CasefileError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Case(_) | Self::Json(_) | Self::Yaml(_) => ExitCode::CASE_ERROR,
            Self::Library(err) => err.exit_code(),
            Self::Usage(_) => ExitCode::USAGE_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
        }
    }
}

// ============================================================================
// Library Errors
// ============================================================================

/// Case library errors.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// No case with this id exists in the library
    #[error("unknown case '{id}'{}", suggestion.as_ref().map_or_else(String::new, |s| format!(" (did you mean '{s}'?)")))]
    UnknownCase {
        /// Requested id
        id: String,
        /// Closest known id, if any is close enough
        suggestion: Option<String>,
    },

    /// The id cannot name a case file
    #[error("invalid case id '{id}'")]
    InvalidId {
        /// Requested id
        id: String,
    },

    /// The library index could not be read
    #[error("cannot read case index {path}: {message}")]
    Index {
        /// Index location
        path: String,
        /// Underlying failure
        message: String,
    },

    /// The case exists but failed to load
    #[error(transparent)]
    Case(#[from] CaseError),
}

impl LibraryError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Index { .. } => ExitCode::IO_ERROR,
            Self::UnknownCase { .. } | Self::InvalidId { .. } | Self::Case(_) => {
                ExitCode::CASE_ERROR
            }
        }
    }
}

/// Convenience alias for `casefile` results.
pub type Result<T, E = CasefileError> = std::result::Result<T, E>;
