// src/lib.rs

//! scriptwrap
//!
//! Produces a container recipe for a script with a model's help, and
//! refuses to trust it. Untrusted input passes three gates before and
//! after anything is executed:
//!
//! - Inputs: the script path, script body and README are scanned for
//!   traversal, dangerous commands and prompt-injection phrasing
//! - Recipe: the generated text must declare a base image and must not
//!   fetch remote content
//! - Output: the container's stdout is checked against an expectation
//!
//! # Architecture
//!
//! - [`security`] holds the rule catalog and the input sanitizer
//! - [`generate`] talks to the model behind the [`Generator`] trait
//! - [`recipe`] validates generated recipes and finds README examples
//! - [`container`] stages, builds and runs images behind [`ContainerRuntime`]
//! - [`pipeline`] sequences the stages

pub mod config;
pub mod container;
mod error;
pub mod generate;
pub mod invocation;
pub mod pipeline;
pub mod recipe;
pub mod security;
pub mod suite;
pub mod verify;

pub use config::{LlmConfig, Provider, RuntimeConfig};
pub use container::{ContainerRuntime, DockerRuntime, ExecutionOrchestrator, ExecutionResult};
pub use error::{Error, Result};
pub use generate::{GenerationRequest, Generator};
pub use invocation::ParsedInvocation;
pub use pipeline::{image_tag, Mode, Pipeline, PipelineOutcome, PipelineRequest};
pub use recipe::ArtifactValidator;
pub use security::{AggregateVerdict, InputSanitizer, PatternCatalog, SanitizationVerdict};
pub use suite::{Suite, SuiteReport};
pub use verify::{verify, Expectation};
