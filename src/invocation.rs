// src/invocation.rs

//! Example-command parsing
//!
//! Turns a freeform example such as `./scripts/foo/foo.sh 'a b' c` into the
//! argument vector the container is run with. The quoting rules are a
//! minimal subset of the shell's: quotes group and are removed, nothing is
//! escaped or expanded.

/// Tokens of an example command split around the script's filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInvocation {
    /// The example text as given
    pub source_text: String,
    /// Index of the first token containing the filename
    pub matched_filename_index: Option<usize>,
    /// Tokens after the filename token; empty when it was not found
    pub argument_vector: Vec<String>,
}

impl ParsedInvocation {
    /// Parse `example` and split it after the token containing `filename`
    ///
    /// The filename match is a substring match so path prefixes in the
    /// example (`./scripts/foo/foo.sh`) still match `foo.sh`.
    pub fn parse(example: &str, filename: &str) -> Self {
        let tokens = tokenize(example.trim());
        let matched_filename_index = tokens.iter().position(|t| t.contains(filename));
        let argument_vector = match matched_filename_index {
            Some(idx) => tokens[idx + 1..].to_vec(),
            None => Vec::new(),
        };

        Self {
            source_text: example.to_string(),
            matched_filename_index,
            argument_vector,
        }
    }

    pub fn filename_found(&self) -> bool {
        self.matched_filename_index.is_some()
    }

    /// How the script is invoked inside the container: `/<filename> <args>`
    pub fn in_container_command(&self, filename: &str) -> String {
        format!("/{} {}", filename, self.argument_vector.join(" "))
    }
}

/// Split a command line on unquoted whitespace
///
/// Single and double quotes suppress splitting until the matching quote and
/// are dropped from the output. Empty tokens are never produced.
pub fn tokenize(command: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in command.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '\'' || c == '"' => quote = Some(c),
            None if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            None => current.push(c),
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_after_prefixed_filename() {
        let parsed = ParsedInvocation::parse("./foo/bar.sh arg1 'arg two'", "bar.sh");
        assert_eq!(parsed.matched_filename_index, Some(0));
        assert_eq!(parsed.argument_vector, vec!["arg1", "arg two"]);
    }

    #[test]
    fn test_filename_not_found() {
        let parsed = ParsedInvocation::parse("echo hi", "bar.sh");
        assert!(!parsed.filename_found());
        assert!(parsed.argument_vector.is_empty());
    }

    #[test]
    fn test_interpreter_before_filename() {
        let parsed = ParsedInvocation::parse(
            "node scripts/vowel_counter/vowel_counter.js \"Hello world\"",
            "vowel_counter.js",
        );
        assert_eq!(parsed.matched_filename_index, Some(1));
        assert_eq!(parsed.argument_vector, vec!["Hello world"]);
    }

    #[test]
    fn test_no_escape_processing() {
        let parsed = ParsedInvocation::parse(
            "./scripts/line_counter/line_counter.sh 'Hello\\nWorld'",
            "line_counter.sh",
        );
        assert_eq!(parsed.argument_vector, vec!["Hello\\nWorld"]);
        assert_eq!(
            parsed.in_container_command("line_counter.sh"),
            "/line_counter.sh Hello\\nWorld"
        );
    }

    #[test]
    fn test_tokenize_quotes() {
        assert_eq!(tokenize("a 'b c' \"d 'e'\""), vec!["a", "b c", "d 'e'"]);
        assert_eq!(tokenize("x''y"), vec!["xy"]);
        assert_eq!(tokenize("  a\t\tb  "), vec!["a", "b"]);
        assert!(tokenize("'' \"\"").is_empty());
        // an unterminated quote runs to the end
        assert_eq!(tokenize("a 'b c"), vec!["a", "b c"]);
    }

    #[test]
    fn test_first_matching_token_wins() {
        let parsed = ParsedInvocation::parse("run.sh run.sh x", "run.sh");
        assert_eq!(parsed.matched_filename_index, Some(0));
        assert_eq!(parsed.argument_vector, vec!["run.sh", "x"]);
    }
}
