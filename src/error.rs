//! Error types for reqcheck operations.
//!
//! This module defines [`ReqcheckError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `ReqcheckError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `ReqcheckError::Other`) for unexpected errors
//! - An unsatisfied requirement is not an error; it is a [`CheckStatus`]
//!
//! [`CheckStatus`]: crate::requirements::CheckStatus

use thiserror::Error;

/// Core error type for reqcheck operations.
#[derive(Debug, Error)]
pub enum ReqcheckError {
    /// A requirement specifier could not be parsed.
    #[error("Invalid requirement '{requirement}': {message}")]
    MalformedRequirement {
        requirement: String,
        message: String,
    },

    /// The Python interpreter used to discover site-packages could not be found.
    #[error("Python interpreter not found: {python}")]
    InterpreterNotFound { python: String },

    /// The Python interpreter ran but did not report a usable search path.
    #[error("Failed to query interpreter '{python}': {message}")]
    InterpreterProbeFailed { python: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for reqcheck operations.
pub type Result<T> = std::result::Result<T, ReqcheckError>;
