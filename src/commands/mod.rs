// src/commands/mod.rs
//! Command handlers for the scriptwrap CLI

mod suite;
mod wrap;

pub use suite::cmd_suite;
pub use wrap::cmd_wrap;

use anyhow::{Context, Result};
use scriptwrap::config::{LlmConfig, RuntimeConfig};
use scriptwrap::container::{ContainerRuntime, DockerRuntime};
use scriptwrap::generate::create_generator;
use scriptwrap::Pipeline;

/// Assemble a pipeline from the environment
///
/// The runtime binary is only resolved when it will be used, so
/// `--generate-only` works on hosts without a container engine.
fn pipeline_from_env(needs_runtime: bool) -> Result<Pipeline> {
    let llm = LlmConfig::from_env().context(
        "LLM configuration is invalid (set LLM_API_KEY, LLM_PROVIDER, LLM_MODEL, LLM_TEMPERATURE)",
    )?;
    eprintln!(
        "Using {} ({}) with temperature {}",
        llm.provider, llm.model, llm.temperature
    );
    let generator = create_generator(&llm)?;

    let runtime_config = RuntimeConfig::from_env();
    let runtime: Box<dyn ContainerRuntime> = if needs_runtime {
        Box::new(DockerRuntime::from_config(&runtime_config)?)
    } else {
        Box::new(DockerRuntime::new(&runtime_config.program))
    };

    Ok(Pipeline::new(generator, runtime))
}
