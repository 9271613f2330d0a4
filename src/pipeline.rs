// src/pipeline.rs

//! The scriptwrap pipeline
//!
//! Stages run strictly in order and stop at the first denial:
//!
//! 1. Input sanitization (path, script, README). A blocking verdict stops
//!    the run unless the caller forces past it.
//! 2. Recipe generation through the configured [`Generator`].
//! 3. Recipe validation. Rejection is terminal.
//! 4. Example parsing into the container's argument vector.
//! 5. Build and run through the [`ContainerRuntime`].
//! 6. Output verification.
//!
//! Nothing touches the container runtime before both gates have passed.

use crate::container::{ContainerRuntime, ExecutionOrchestrator, ExecutionResult};
use crate::error::{Error, Result};
use crate::generate::{GenerationRequest, Generator};
use crate::invocation::ParsedInvocation;
use crate::recipe::{resolve_example, ArtifactValidator};
use crate::security::{AggregateVerdict, InputSanitizer, Subject};
use crate::verify::{verify, Expectation};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// How far the pipeline goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Stop after the recipe has been validated
    GenerateOnly,
    /// Build, run and verify
    Full,
}

/// One pipeline invocation
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    pub script_path: PathBuf,
    pub readme_path: PathBuf,
    /// Example command; falls back to the README, then a default
    pub example: Option<String>,
    /// Expected stdout, literal or `/pattern/`
    pub expected: Option<String>,
    pub mode: Mode,
    /// Continue past a blocking sanitizer verdict
    pub force: bool,
    /// Keep `<tag>.Dockerfile` on disk while the image builds and runs
    pub keep_recipe_copy: bool,
}

impl PipelineRequest {
    pub fn new(script_path: impl Into<PathBuf>, readme_path: impl Into<PathBuf>) -> Self {
        Self {
            script_path: script_path.into(),
            readme_path: readme_path.into(),
            example: None,
            expected: None,
            mode: Mode::Full,
            force: false,
            keep_recipe_copy: false,
        }
    }
}

/// What a successful run produced
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub tag: String,
    /// The validated recipe
    pub recipe: String,
    pub verdict: AggregateVerdict,
    pub invocation: ParsedInvocation,
    /// Present in full mode
    pub execution: Option<ExecutionResult>,
    /// Whether a blocking verdict was overridden
    pub forced: bool,
}

/// Image tag for a payload: `scriptwrap-<filename>-<millis>`
///
/// The filename is lowercased and every character outside `[a-z0-9]` becomes `-`.
pub fn image_tag(filename: &str, millis: i64) -> String {
    let name: String = filename
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() { c } else { '-' })
        .collect();
    format!("scriptwrap-{}-{}", name, millis)
}

/// Sidecar copy of the recipe, removed when dropped
struct RecipeCopy {
    path: PathBuf,
}

impl RecipeCopy {
    fn write(dir: &Path, tag: &str, recipe: &str) -> Result<Self> {
        let path = dir.join(format!("{}.Dockerfile", tag));
        fs::write(&path, recipe)?;
        debug!("Wrote recipe copy to {}", path.display());
        Ok(Self { path })
    }
}

impl Drop for RecipeCopy {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!("Failed to remove recipe copy {}: {}", self.path.display(), e);
        }
    }
}

pub struct Pipeline {
    sanitizer: InputSanitizer,
    validator: ArtifactValidator,
    generator: Box<dyn Generator>,
    runtime: Box<dyn ContainerRuntime>,
    recipe_copy_dir: PathBuf,
}

impl Pipeline {
    /// Pipeline with the standard rule catalog and sanitizer settings
    pub fn new(generator: Box<dyn Generator>, runtime: Box<dyn ContainerRuntime>) -> Self {
        Self {
            sanitizer: InputSanitizer::with_defaults(),
            validator: ArtifactValidator::with_defaults(),
            generator,
            runtime,
            recipe_copy_dir: PathBuf::from("."),
        }
    }

    pub fn with_sanitizer(mut self, sanitizer: InputSanitizer) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    pub fn with_validator(mut self, validator: ArtifactValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Directory that receives the `<tag>.Dockerfile` copy
    pub fn with_recipe_copy_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.recipe_copy_dir = dir.into();
        self
    }

    pub async fn run(&self, request: &PipelineRequest) -> Result<PipelineOutcome> {
        let path_str = request.script_path.to_string_lossy().into_owned();

        // The path is checked before anything is read from it
        let path_verdict = self.sanitizer.sanitize_path(&path_str);
        if path_verdict.blocking && !request.force {
            return Err(Error::PolicyDenied {
                warnings: path_verdict
                    .warnings
                    .iter()
                    .map(|w| format!("{}: {}", Subject::Path, w))
                    .collect(),
            });
        }

        let script = fs::read_to_string(&request.script_path)?;
        let readme = fs::read_to_string(&request.readme_path)?;

        let verdict = self.sanitizer.sanitize_all(&path_str, &script, &readme);
        for warning in verdict.all_warnings() {
            warn!("{}", warning);
        }

        let forced = !verdict.overall_safe;
        if forced {
            if !request.force {
                return Err(Error::PolicyDenied {
                    warnings: verdict.blocking_warnings(),
                });
            }
            warn!("Security checks bypassed with --force");
        }

        if request.mode == Mode::Full
            && let Some(expected) = request.expected.as_deref()
        {
            Expectation::parse(expected)?;
        }

        let filename = request
            .script_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path_str.clone());

        let example = resolve_example(request.example.as_deref(), &readme, &filename);
        let invocation = ParsedInvocation::parse(&example, &filename);
        if !invocation.filename_found() {
            warn!(
                "Example '{}' does not mention {}; running without arguments",
                example, filename
            );
        }

        let tag = image_tag(&filename, chrono::Utc::now().timestamp_millis());
        info!("Generating recipe for {} with {}", filename, self.generator.name());

        let generation = GenerationRequest {
            filename: filename.clone(),
            script,
            documentation: verdict.documentation.sanitized.clone(),
            in_container_command: invocation.in_container_command(&filename),
        };
        let raw = self.generator.generate(&generation).await?;
        let recipe = self.validator.validate(&raw)?;

        let mut outcome = PipelineOutcome {
            tag,
            recipe,
            verdict,
            invocation,
            execution: None,
            forced,
        };

        if request.mode == Mode::GenerateOnly {
            return Ok(outcome);
        }

        let _recipe_copy = if request.keep_recipe_copy {
            Some(RecipeCopy::write(
                &self.recipe_copy_dir,
                &outcome.tag,
                &outcome.recipe,
            )?)
        } else {
            None
        };

        let orchestrator = ExecutionOrchestrator::new(self.runtime.as_ref());
        let result = orchestrator
            .build_and_run(
                &outcome.tag,
                &request.script_path,
                &outcome.recipe,
                &filename,
                &outcome.invocation.argument_vector,
            )
            .await?;

        match request.expected.as_deref().filter(|e| !e.is_empty()) {
            Some(expected) => {
                if !verify(&result, Some(expected)) {
                    return Err(Error::VerificationMismatch {
                        expected: expected.to_string(),
                        actual: result.stdout,
                    });
                }
            }
            None => {
                if !result.success() {
                    return Err(Error::RunFailed {
                        exit_code: Some(result.exit_code),
                        message: format!(
                            "container exited with code {}: {}",
                            result.exit_code, result.stderr
                        ),
                    });
                }
            }
        }

        outcome.execution = Some(result);
        Ok(outcome)
    }
}
