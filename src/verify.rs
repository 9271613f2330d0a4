// src/verify.rs

//! Output verification
//!
//! An expectation is either a literal substring or, when written as
//! `/pattern/`, a regular expression searched for anywhere in stdout.
//! A run that exited non-zero never verifies.

use crate::container::ExecutionResult;
use crate::error::{Error, Result};
use regex::Regex;
use tracing::debug;

/// What the container's stdout is checked against
#[derive(Debug, Clone)]
pub enum Expectation {
    /// Stdout must contain this text
    Literal(String),
    /// Stdout must match this pattern somewhere
    Pattern(Regex),
}

impl Expectation {
    /// Interpret an expectation string
    ///
    /// Returns `None` for an empty expectation, which accepts any successful
    /// run. A `/.../` form that does not compile is `InvalidExpectation`.
    pub fn parse(raw: &str) -> Result<Option<Self>> {
        if raw.is_empty() {
            return Ok(None);
        }

        match pattern_body(raw) {
            Some(body) => Regex::new(body)
                .map(|re| Some(Expectation::Pattern(re)))
                .map_err(|e| Error::InvalidExpectation {
                    pattern: raw.to_string(),
                    reason: e.to_string(),
                }),
            None => Ok(Some(Expectation::Literal(raw.to_string()))),
        }
    }

    pub fn matches(&self, stdout: &str) -> bool {
        match self {
            Expectation::Literal(text) => stdout.contains(text.as_str()),
            Expectation::Pattern(re) => re.is_match(stdout),
        }
    }
}

/// The inside of `/.../`, if `raw` has that shape
fn pattern_body(raw: &str) -> Option<&str> {
    if raw.len() >= 2 && raw.starts_with('/') && raw.ends_with('/') {
        Some(&raw[1..raw.len() - 1])
    } else {
        None
    }
}

/// Check a captured run against an optional expectation string
///
/// An expectation that fails to compile never verifies.
pub fn verify(result: &ExecutionResult, expected: Option<&str>) -> bool {
    if result.exit_code != 0 {
        debug!("Verification failed: exit code {}", result.exit_code);
        return false;
    }

    match Expectation::parse(expected.unwrap_or("")) {
        Ok(None) => true,
        Ok(Some(expectation)) => expectation.matches(&result.stdout),
        Err(e) => {
            debug!("Verification failed: {}", e);
            false
        }
    }
}
