// src/recipe/validate.rs

//! Validation of generated recipes
//!
//! The generated text is untrusted. Before it is written anywhere it is
//! stripped of markdown fences and checked for a base-image directive and
//! for remote fetches. Checks only ever see fence-stripped text.

use crate::error::{Error, Result};
use crate::security::{PatternCatalog, SanitizationVerdict, Subject};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Recipe filename recognised by the container runtime
pub const RECIPE_FILENAME: &str = "Dockerfile";

static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)```(?:dockerfile)?").unwrap());

static FROM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?im)^\s*FROM\s+\S").unwrap());

/// Remove markdown code-fence markers and surrounding whitespace
pub fn strip_fences(text: &str) -> String {
    FENCE_RE.replace_all(text, "").trim().to_string()
}

/// Whether some line starts with the base-image directive
pub fn has_base_image(text: &str) -> bool {
    FROM_RE.is_match(text)
}

/// The second gate: accepts or rejects generated recipe text
#[derive(Debug, Clone)]
pub struct ArtifactValidator {
    catalog: PatternCatalog,
}

impl ArtifactValidator {
    pub fn new(catalog: PatternCatalog) -> Self {
        Self { catalog }
    }

    pub fn with_defaults() -> Self {
        Self::new(PatternCatalog::standard())
    }

    /// Inspect a raw recipe without failing
    pub fn inspect(&self, raw: &str) -> SanitizationVerdict {
        let cleaned = strip_fences(raw);
        let mut warnings = Vec::new();

        if !has_base_image(&cleaned) {
            warnings.push("Missing FROM line".to_string());
        }

        for rule in self.catalog.match_artifact_fetch(&cleaned) {
            warnings.push(format!(
                "Unsafe recipe: {} detected ({})",
                rule.name,
                rule.pattern()
            ));
        }

        SanitizationVerdict {
            subject: Subject::Artifact,
            blocking: !warnings.is_empty(),
            warnings,
            sanitized: cleaned,
        }
    }

    /// Return the cleaned recipe, or `ArtifactRejected`
    ///
    /// Idempotent: validating an accepted result returns it unchanged.
    pub fn validate(&self, raw: &str) -> Result<String> {
        let verdict = self.inspect(raw);
        if verdict.blocking {
            debug!("Recipe rejected: {:?}", verdict.warnings);
            return Err(Error::ArtifactRejected(verdict.warnings.join("; ")));
        }
        Ok(verdict.sanitized)
    }
}

impl Default for ArtifactValidator {
    fn default() -> Self {
        Self::with_defaults()
    }
}
