// src/security/catalog.rs

//! Pattern catalog for input and recipe analysis
//!
//! The catalog is plain data: four rule families compiled once and handed
//! to the sanitizer and validator by value. Tests can build a reduced
//! catalog with [`PatternCatalog::new`].
//!
//! Matching is heuristic. A clean scan means no known shape was found,
//! not that the input is safe.

use regex::Regex;
use std::sync::LazyLock;

/// A named regular expression
#[derive(Debug, Clone)]
pub struct Rule {
    /// Human-readable description used in warnings
    pub name: String,
    pub regex: Regex,
}

impl Rule {
    /// Compile a rule from a pattern
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.into(),
            regex: Regex::new(pattern)?,
        })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Source pattern of the compiled expression
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

/// Prompt-injection phrasing (case-insensitive)
const INJECTION_RULES: &[(&str, &str)] = &[
    // Instruction override
    (
        "instruction override",
        r"(?i)ignore\s+(?:previous|above|all)\s+(?:instructions?|prompts?|rules?|commands?)",
    ),
    (
        "memory reset",
        r"(?i)forget\s+(?:everything|all|instructions?|previous)",
    ),
    (
        "session restart",
        r"(?i)(?:start|begin)\s+(?:new|fresh|different)\s+(?:conversation|session|context)",
    ),
    // Role reassignment
    (
        "role reassignment",
        r"(?i)(?:you\s+are\s+now|now\s+you\s+are|act\s+as|pretend\s+to\s+be|role\s*[:=])",
    ),
    (
        "speaker impersonation",
        r#"(?i)(?:system|assistant|user)\s*[:=]\s*["']?"#,
    ),
    (
        "redirected instruction",
        r"(?i)(?:instead|rather|but\s+actually|however),?\s+(?:do|say|write|output|generate|create)",
    ),
    (
        "refusal instruction",
        r"(?i)(?:don['’]t|do\s+not|never)\s+(?:follow|obey|use|apply)\s+(?:the|those|previous)",
    ),
    // Context reframing
    (
        "task reframing",
        r"(?i)(?:the\s+)?(?:real|actual|true)\s+(?:task|instruction|prompt|goal)\s+is",
    ),
    (
        "test framing",
        r"(?i)(?:this\s+is\s+)?(?:a\s+)?(?:test|simulation|example)\s+(?:of|for)",
    ),
    // Embedded executable content
    ("script tag", r"(?is)<script\b.*?</script>"),
    ("javascript uri", r"(?i)javascript\s*:"),
    (
        "dynamic evaluation call",
        r"(?i)(?:eval|exec|system|shell_exec|passthru)\s*\(",
    ),
    // Template interpolation
    ("double-brace template", r"\{\{\s*[^}]+\s*\}\}"),
    ("dollar-brace interpolation", r"\$\{[^}]+\}"),
    ("percent-brace interpolation", r"%\{[^}]+\}"),
];

/// Tokens associated with exploitation framing
const SUSPICIOUS_KEYWORDS: &[&str] = &[
    "jailbreak",
    "bypass",
    "override",
    "ignore",
    "forget",
    "disregard",
    "admin",
    "root",
    "sudo",
    "administrator",
    "privilege",
    "elevated",
    "backdoor",
    "exploit",
    "vulnerability",
    "payload",
    "injection",
    "malicious",
    "harmful",
    "dangerous",
    "execute",
    "run_command",
];

/// Shell command shapes that block a script
const DANGEROUS_COMMAND_RULES: &[(&str, &str)] = &[
    ("recursive root deletion", r"rm\s+-rf\s+/"),
    ("fork bomb", r":\(\)\s*\{\s*:\s*\|\s*:\s*&\s*\}\s*;\s*:"),
    ("curl piped to shell", r"curl\s+.*\|\s*(?:bash|sh|python)"),
    ("wget piped to shell", r"wget\s+.*\|\s*(?:bash|sh|python)"),
    ("privilege elevation", r"\b(?:sudo|su)\s+"),
    ("permission or ownership change", r"\b(?:chmod|chown)\s+"),
    ("firewall manipulation", r"(?:iptables|ufw|firewall)"),
    ("system service manipulation", r"\b(?:crontab|systemctl|service)\b"),
];

/// Remote fetches that reject a generated recipe
const ARTIFACT_FETCH_RULES: &[(&str, &str)] = &[("remote fetch", r"(?i)(?:curl|wget)\s+http")];

fn compile(table: &[(&str, &str)]) -> Vec<Rule> {
    table
        .iter()
        .map(|(name, pattern)| Rule::new(*name, pattern).expect("built-in pattern must compile"))
        .collect()
}

static STANDARD: LazyLock<PatternCatalog> = LazyLock::new(|| PatternCatalog {
    injection: compile(INJECTION_RULES),
    keywords: SUSPICIOUS_KEYWORDS.iter().map(|k| k.to_string()).collect(),
    dangerous_commands: compile(DANGEROUS_COMMAND_RULES),
    artifact_fetch: compile(ARTIFACT_FETCH_RULES),
});

/// Immutable rule tables shared by the gates
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    injection: Vec<Rule>,
    keywords: Vec<String>,
    dangerous_commands: Vec<Rule>,
    artifact_fetch: Vec<Rule>,
}

impl PatternCatalog {
    /// Build a catalog from explicit rule sets
    ///
    /// Keywords are stored lowercased and matched case-insensitively.
    pub fn new(
        injection: Vec<Rule>,
        keywords: Vec<String>,
        dangerous_commands: Vec<Rule>,
        artifact_fetch: Vec<Rule>,
    ) -> Self {
        Self {
            injection,
            keywords: keywords.into_iter().map(|k| k.to_lowercase()).collect(),
            dangerous_commands,
            artifact_fetch,
        }
    }

    /// The built-in rule set
    pub fn standard() -> Self {
        STANDARD.clone()
    }

    pub fn injection_rules(&self) -> &[Rule] {
        &self.injection
    }

    pub fn suspicious_keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn dangerous_command_rules(&self) -> &[Rule] {
        &self.dangerous_commands
    }

    pub fn artifact_fetch_rules(&self) -> &[Rule] {
        &self.artifact_fetch
    }

    /// Injection rules matching `text`
    pub fn match_injection<'a>(&'a self, text: &str) -> Vec<&'a Rule> {
        self.injection.iter().filter(|r| r.is_match(text)).collect()
    }

    /// Keywords occurring anywhere in `text`, ignoring case
    pub fn match_keywords<'a>(&'a self, text: &str) -> Vec<&'a str> {
        let lower = text.to_lowercase();
        self.keywords
            .iter()
            .filter(|k| lower.contains(k.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// Dangerous command rules matching `text`
    pub fn match_dangerous<'a>(&'a self, text: &str) -> Vec<&'a Rule> {
        self.dangerous_commands
            .iter()
            .filter(|r| r.is_match(text))
            .collect()
    }

    /// Recipe fetch rules matching `text`
    pub fn match_artifact_fetch<'a>(&'a self, text: &str) -> Vec<&'a Rule> {
        self.artifact_fetch.iter().filter(|r| r.is_match(text)).collect()
    }
}

impl Default for PatternCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
