//! Exit codes for CLI operations following Unix conventions.
//!
//! # Exit Code Semantics
//!
//! - `0`: Success - query answered (an empty neighbour list is still a success)
//! - `1`: General error - unspecified failure
//! - `2`: Blocking error - internal invariant broken, automation should halt
//! - `3-125`: Specific recoverable errors
//! - `126-255`: Reserved by shell

use crate::error::{BuildError, LoadError, QueryError};

/// Standard exit codes for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Operation succeeded (code 0)
    Success = 0,

    /// Unspecified error occurred (code 1)
    GeneralError = 1,

    /// Critical error that should halt automation (code 2)
    BlockingError = 2,

    /// Name or term not found (code 3)
    NotFound = 3,

    /// Malformed input file (code 4)
    ParseError = 4,

    /// File I/O error (code 5)
    IoError = 5,

    /// Configuration error (code 6)
    ConfigError = 6,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl ExitCode {
    /// Map a query failure to an exit code.
    ///
    /// A miss is recoverable; a missing table row means the build is broken.
    pub fn from_query_error(error: &QueryError) -> Self {
        match error {
            QueryError::Unresolved { .. } | QueryError::UnknownTerm { .. } => ExitCode::NotFound,
            QueryError::MissingEmbedding { .. } => ExitCode::BlockingError,
        }
    }

    /// Map a loader failure to an exit code.
    pub fn from_load_error(error: &LoadError) -> Self {
        match error {
            LoadError::FileRead { .. } => ExitCode::IoError,
            LoadError::Malformed { .. } | LoadError::Vectors { .. } => ExitCode::ParseError,
        }
    }

    /// Map a build failure to an exit code.
    pub fn from_build_error(error: &BuildError) -> Self {
        match error {
            BuildError::WorkerPool { .. } => ExitCode::GeneralError,
            BuildError::Aggregation(_) => ExitCode::BlockingError,
        }
    }

    /// Check if this exit code indicates a blocking error.
    #[must_use]
    pub fn is_blocking(&self) -> bool {
        matches!(self, ExitCode::BlockingError)
    }

    /// Check if this exit code indicates success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, ExitCode::Success)
    }

    /// Get a human-readable description of the exit code.
    pub fn description(&self) -> &str {
        match self {
            ExitCode::Success => "Success",
            ExitCode::GeneralError => "General error",
            ExitCode::BlockingError => "Blocking error - automation should halt",
            ExitCode::NotFound => "Not found",
            ExitCode::ParseError => "Parse error",
            ExitCode::IoError => "I/O error",
            ExitCode::ConfigError => "Configuration error",
        }
    }
}
