// src/error.rs

//! Error types for the scriptwrap pipeline
//!
//! Every gate and execution stage maps to one variant so the driver can
//! report which stage stopped the run and why.

use thiserror::Error;

/// Errors produced by the pipeline and its collaborators
#[derive(Error, Debug)]
pub enum Error {
    /// Sanitizer produced a blocking verdict and no bypass was requested
    #[error("Security scan failed: {}", .warnings.join("; "))]
    PolicyDenied { warnings: Vec<String> },

    /// Generated recipe failed validation
    #[error("Recipe rejected: {0}")]
    ArtifactRejected(String),

    /// Model call failed or returned something that is not a recipe
    #[error("Recipe generation failed: {0}")]
    GenerationFailed(String),

    /// Image build exited unsuccessfully
    #[error("Build failed: {0}")]
    BuildFailed(String),

    /// Container could not be started, or exited non-zero with no expectation
    ///
    /// `exit_code` is set only when the container actually ran.
    #[error("Run failed: {message}")]
    RunFailed {
        exit_code: Option<i32>,
        message: String,
    },

    /// Container ran but its output did not satisfy the expectation
    #[error("Output mismatch. Expected: \"{expected}\", Got: \"{actual}\"")]
    VerificationMismatch { expected: String, actual: String },

    /// Expected-output pattern could not be compiled
    #[error("Invalid expected-output pattern '{pattern}': {reason}")]
    InvalidExpectation { pattern: String, reason: String },

    /// Provider or runtime configuration is missing or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Suite file could not be loaded
    #[error("Suite error: {0}")]
    Suite(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error was raised by a gate before any execution resource existed
    pub fn is_gate_denial(&self) -> bool {
        matches!(self, Error::PolicyDenied { .. } | Error::ArtifactRejected(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
