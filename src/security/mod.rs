// src/security/mod.rs

//! Heuristic gates in front of recipe generation and execution
//!
//! - `catalog` - rule tables (injection phrasing, keywords, dangerous commands)
//! - `sanitizer` - per-input verdicts for the script path, script and README
//!
//! These checks are a best-effort filter before an irreversible action. They
//! have false negatives and are not a security boundary on their own.

mod catalog;
mod sanitizer;

pub use catalog::{PatternCatalog, Rule};
pub use sanitizer::{
    AggregateVerdict, InputSanitizer, SanitizationVerdict, SanitizerConfig, Subject,
    DEFAULT_ALLOWED_PREFIX, MAX_DOCUMENTATION_CHARS,
};
