// src/config.rs

//! Environment-driven configuration
//!
//! Generation and runtime settings come from environment variables (a
//! `.env` file is loaded by the binary before this runs). Loading goes
//! through a lookup function so callers other than `main` can supply
//! values without touching the process environment.

use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;
use strum_macros::{Display, EnumString};
use tracing::debug;

/// Default sampling temperature for recipe generation
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Default completion budget
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

/// Base URL used for the `local` provider when none is configured
pub const LOCAL_BASE_URL: &str = "http://localhost:11434/v1";

/// Container CLI used when `SCRIPTWRAP_RUNTIME` is unset
pub const DEFAULT_RUNTIME: &str = "docker";

/// Model provider backing the generation step
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Provider {
    OpenAi,
    Anthropic,
    Local,
}

impl Provider {
    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAi => "gpt-4o-mini",
            Provider::Anthropic => "claude-3-haiku-20240307",
            Provider::Local => "llama3.1",
        }
    }

    /// Provider-specific variable consulted when `LLM_API_KEY` is unset
    pub fn fallback_key_var(&self) -> Option<&'static str> {
        match self {
            Provider::OpenAi => Some("OPENAI_API_KEY"),
            Provider::Anthropic => Some("ANTHROPIC_API_KEY"),
            Provider::Local => None,
        }
    }
}

/// Settings for the generation provider
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: Provider,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub base_url: Option<String>,
    pub max_tokens: u32,
}

impl LlmConfig {
    /// Read settings from the process environment and validate them
    pub fn from_env() -> Result<Self> {
        let config = Self::from_lookup(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Read settings through `lookup`, without validating them
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider = match get("LLM_PROVIDER") {
            Some(raw) => raw
                .trim()
                .parse::<Provider>()
                .map_err(|_| Error::Config(format!("Unknown LLM_PROVIDER '{}'", raw)))?,
            None => Provider::OpenAi,
        };

        let api_key = get("LLM_API_KEY")
            .or_else(|| provider.fallback_key_var().and_then(|var| get(var)));

        let model = get("LLM_MODEL").unwrap_or_else(|| provider.default_model().to_string());

        let temperature = match get("LLM_TEMPERATURE") {
            Some(raw) => raw
                .trim()
                .parse::<f32>()
                .map_err(|e| Error::Config(format!("Invalid LLM_TEMPERATURE '{}': {}", raw, e)))?,
            None => DEFAULT_TEMPERATURE,
        };

        let max_tokens = match get("LLM_MAX_TOKENS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|e| Error::Config(format!("Invalid LLM_MAX_TOKENS '{}': {}", raw, e)))?,
            None => DEFAULT_MAX_TOKENS,
        };

        let config = Self {
            provider,
            api_key,
            model,
            temperature,
            base_url: get("LLM_BASE_URL"),
            max_tokens,
        };
        debug!(
            "LLM config: provider={}, model={}, base_url={:?}",
            config.provider, config.model, config.base_url
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_none() && self.provider != Provider::Local {
            return Err(Error::Config(format!(
                "API key not found. Set LLM_API_KEY or {}",
                self.provider.fallback_key_var().unwrap_or("LLM_API_KEY")
            )));
        }

        if self.model.trim().is_empty() {
            return Err(Error::Config(
                "Model not specified. Set LLM_MODEL".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(Error::Config(format!(
                "Temperature must be between 0 and 2, got {}",
                self.temperature
            )));
        }

        Ok(())
    }

    /// Base URL to send requests to, if the provider has a non-default one
    pub fn effective_base_url(&self) -> Option<&str> {
        match (&self.base_url, self.provider) {
            (Some(url), _) => Some(url.as_str()),
            (None, Provider::Local) => Some(LOCAL_BASE_URL),
            (None, _) => None,
        }
    }
}

/// Which container CLI builds and runs images
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub program: String,
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let program = lookup("SCRIPTWRAP_RUNTIME")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_RUNTIME.to_string());
        Self { program }
    }

    /// Locate the runtime binary on `PATH`
    pub fn resolve(&self) -> Result<PathBuf> {
        which::which(&self.program).map_err(|e| {
            Error::Config(format!("Container runtime '{}' not found: {}", self.program, e))
        })
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_RUNTIME.to_string(),
        }
    }
}
