// src/suite.rs

//! Batch runs over a TOML list of cases
//!
//! ```toml
//! [[case]]
//! name = "Line Counter"
//! script = "scripts/line_counter/line_counter.sh"
//! readme = "scripts/line_counter/README.md"
//! example = "./scripts/line_counter/line_counter.sh 'Hello\\nWorld'"
//! expected = "Line Count: 2"
//! ```
//!
//! Case paths are used exactly as written, so relative ones resolve against
//! the working directory the same way a single-script run does and the
//! path gates see what the user typed. Every case goes through the full
//! pipeline; a failing case never stops the cases after it.

use crate::error::{Error, Result};
use crate::pipeline::{Mode, Pipeline, PipelineOutcome, PipelineRequest};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// One case in a suite file
#[derive(Debug, Clone, Deserialize)]
pub struct SuiteCase {
    pub name: String,
    pub script: PathBuf,
    pub readme: PathBuf,
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default)]
    pub expected: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct SuiteFile {
    #[serde(default, rename = "case")]
    cases: Vec<SuiteCase>,
}

/// A loaded suite
#[derive(Debug, Clone)]
pub struct Suite {
    pub cases: Vec<SuiteCase>,
}

/// How far a case got before it stopped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseDetails {
    pub recipe_generated: bool,
    pub build_succeeded: bool,
    pub container_ran: bool,
    pub output_matched: bool,
    pub actual_output: Option<String>,
}

impl CaseDetails {
    fn from_outcome(outcome: &PipelineOutcome) -> Self {
        Self {
            recipe_generated: true,
            build_succeeded: true,
            container_ran: true,
            output_matched: true,
            actual_output: outcome.execution.as_ref().map(|r| r.stdout.clone()),
        }
    }

    /// Infer completed stages from the stage that failed
    fn from_error(err: &Error) -> Self {
        match err {
            Error::BuildFailed(_) => Self {
                recipe_generated: true,
                ..Default::default()
            },
            Error::RunFailed { exit_code, .. } => Self {
                recipe_generated: true,
                build_succeeded: true,
                container_ran: exit_code.is_some(),
                ..Default::default()
            },
            Error::VerificationMismatch { actual, .. } => Self {
                recipe_generated: true,
                build_succeeded: true,
                container_ran: true,
                output_matched: false,
                actual_output: Some(actual.clone()),
            },
            _ => Self::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CaseResult {
    pub name: String,
    pub passed: bool,
    pub error: Option<String>,
    pub details: CaseDetails,
}

#[derive(Debug, Clone, Default)]
pub struct SuiteReport {
    pub results: Vec<CaseResult>,
}

impl SuiteReport {
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }
}

impl Suite {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Suite(format!("failed to read {}: {}", path.display(), e)))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let file: SuiteFile =
            toml::from_str(content).map_err(|e| Error::Suite(format!("invalid suite file: {}", e)))?;
        if file.cases.is_empty() {
            return Err(Error::Suite("suite has no [[case]] entries".to_string()));
        }

        Ok(Self { cases: file.cases })
    }

    /// Run every case in order through full mode
    pub async fn run(&self, pipeline: &Pipeline) -> SuiteReport {
        let mut report = SuiteReport::default();

        for case in &self.cases {
            info!("Running case {}", case.name);
            let mut request = PipelineRequest::new(&case.script, &case.readme);
            request.example = case.example.clone();
            request.expected = case.expected.clone();
            request.mode = Mode::Full;

            let result = match pipeline.run(&request).await {
                Ok(outcome) => CaseResult {
                    name: case.name.clone(),
                    passed: true,
                    error: None,
                    details: CaseDetails::from_outcome(&outcome),
                },
                Err(e) => CaseResult {
                    name: case.name.clone(),
                    passed: false,
                    details: CaseDetails::from_error(&e),
                    error: Some(e.to_string()),
                },
            };
            report.results.push(result);
        }

        report
    }
}
