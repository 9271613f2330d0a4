// src/generate/mod.rs

//! Recipe generation through a hosted or local model
//!
//! The model is a fallible `prompt -> text` call. Nothing it returns is
//! trusted: the output is only checked here for looking like a recipe at
//! all, and the real gate is [`crate::recipe::ArtifactValidator`].
//!
//! There is no retry. A failed call surfaces as `GenerationFailed`.

mod anthropic;
mod openai;
mod prompt;

pub use anthropic::AnthropicGenerator;
pub use openai::OpenAiGenerator;
pub use prompt::{RecipePrompt, SYSTEM_PROMPT};

use crate::config::{LlmConfig, Provider};
use crate::error::{Error, Result};
use crate::recipe::strip_fences;
use async_trait::async_trait;
use std::time::Duration;

/// Timeout for a single generation request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Inputs the model sees when writing a recipe
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub filename: String,
    pub script: String,
    /// Sanitized (possibly truncated) documentation
    pub documentation: String,
    /// How the payload is invoked inside the container
    pub in_container_command: String,
}

/// A source of container recipes
#[async_trait]
pub trait Generator: Send + Sync {
    /// Produce raw recipe text for `request`
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;

    /// Human-readable provider name for logs
    fn name(&self) -> &str;
}

/// Build the generator selected by `config`
pub fn create_generator(config: &LlmConfig) -> Result<Box<dyn Generator>> {
    match config.provider {
        Provider::OpenAi | Provider::Local => Ok(Box::new(OpenAiGenerator::new(config)?)),
        Provider::Anthropic => Ok(Box::new(AnthropicGenerator::new(config)?)),
    }
}

/// Reject model output that does not start with a base-image directive
///
/// Returns the text unchanged; fence stripping is left to the validator.
pub fn ensure_recipe(text: &str) -> Result<String> {
    let cleaned = strip_fences(text);
    if !cleaned.to_ascii_uppercase().starts_with("FROM ") {
        return Err(Error::GenerationFailed(format!(
            "model did not return a Dockerfile. Response: {}",
            text.trim()
        )));
    }
    Ok(text.trim().to_string())
}

fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| Error::GenerationFailed(format!("failed to create HTTP client: {e}")))
}

/// Turn a non-success HTTP response into `GenerationFailed`
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(Error::GenerationFailed(format!("API error {}: {}", status, body)))
}
