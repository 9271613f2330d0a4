// src/generate/anthropic.rs

//! Anthropic Messages API

use super::{check_status, ensure_recipe, http_client, GenerationRequest, Generator, RecipePrompt};
use crate::config::LlmConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    system: String,
    messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

impl MessagesResponse {
    /// Concatenated text blocks
    fn into_text(self) -> String {
        self.content
            .into_iter()
            .filter(|b| b.kind == "text")
            .map(|b| b.text)
            .collect()
    }
}

pub struct AnthropicGenerator {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl AnthropicGenerator {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| Error::Config("Anthropic API key is required".to_string()))?;
        let base = config
            .effective_base_url()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/');

        Ok(Self {
            client: http_client()?,
            endpoint: format!("{}/messages", base),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    fn request_body(&self, prompt: RecipePrompt) -> MessagesRequest {
        MessagesRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system: prompt.system,
            messages: vec![Message {
                role: "user",
                content: prompt.user,
            }],
        }
    }
}

#[async_trait]
impl Generator for AnthropicGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let body = self.request_body(RecipePrompt::build(request));
        debug!("POST {} (model {})", self.endpoint, self.model);

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::GenerationFailed(format!("failed to call Anthropic API: {e}")))?;
        let parsed: MessagesResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| Error::GenerationFailed(format!("failed to parse API response: {e}")))?;

        ensure_recipe(&parsed.into_text())
    }

    fn name(&self) -> &str {
        "Anthropic"
    }
}
