// src/recipe/example.rs

//! Example invocation lookup in script documentation

use regex::Regex;
use std::sync::LazyLock;

/// First line of the first fenced block after an `## Example` heading
static EXAMPLE_SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)## Example.*?```(?:bash|shell)?\s*\n([^\n`]+)").unwrap()
});

/// Extract the example command from a README, if it has one
pub fn extract_readme_example(readme: &str) -> Option<String> {
    EXAMPLE_SECTION_RE
        .captures(readme)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|cmd| !cmd.is_empty())
}

/// Invocation used when neither the caller nor the README supplies one
pub fn default_example(filename: &str) -> String {
    format!("{} 'Hello world'", filename)
}

/// Pick the example: explicit argument, then README, then the default
pub fn resolve_example(explicit: Option<&str>, readme: &str, filename: &str) -> String {
    explicit
        .map(str::to_string)
        .filter(|e| !e.trim().is_empty())
        .or_else(|| extract_readme_example(readme))
        .unwrap_or_else(|| default_example(filename))
}
