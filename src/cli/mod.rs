// src/cli/mod.rs
//! CLI definitions for scriptwrap
//!
//! The default form wraps a single script:
//!
//! ```text
//! scriptwrap [--force] [--generate-only] [--keep-recipe-copy] SCRIPT README [EXAMPLE] [EXPECTED]
//! ```
//!
//! `scriptwrap suite FILE` runs a TOML list of cases instead. The handlers
//! live in the `commands` module.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scriptwrap")]
#[command(version)]
#[command(about = "Generate, build and verify a container recipe for a script", long_about = None)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub wrap: WrapArgs,
}

#[derive(Args, Debug, Clone)]
pub struct WrapArgs {
    /// Continue even if the security scan blocks (not recommended)
    #[arg(long)]
    pub force: bool,

    /// Print the validated recipe without building or running it
    #[arg(long)]
    pub generate_only: bool,

    /// Keep <tag>.Dockerfile in the working directory while the image builds and runs
    #[arg(long)]
    pub keep_recipe_copy: bool,

    /// Script to containerize
    #[arg(required = true, value_name = "SCRIPT")]
    pub script: Option<PathBuf>,

    /// README describing the script
    #[arg(required = true, value_name = "README")]
    pub readme: Option<PathBuf>,

    /// Example invocation (default: taken from the README's "## Example" section)
    #[arg(value_name = "EXAMPLE")]
    pub example: Option<String>,

    /// Expected output: a substring, or /regex/
    #[arg(value_name = "EXPECTED")]
    pub expected: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run every case in a TOML suite file through the full pipeline
    Suite {
        /// Suite file with [[case]] entries
        file: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positionals_and_flags() {
        let cli = Cli::try_parse_from([
            "scriptwrap",
            "--force",
            "./line_counter.sh",
            "README.md",
            "./line_counter.sh 'a b'",
            "Line Count: 1",
        ])
        .unwrap();
        assert!(cli.command.is_none());
        assert!(cli.wrap.force);
        assert!(!cli.wrap.generate_only);
        assert_eq!(cli.wrap.script, Some(PathBuf::from("./line_counter.sh")));
        assert_eq!(cli.wrap.example.as_deref(), Some("./line_counter.sh 'a b'"));
        assert_eq!(cli.wrap.expected.as_deref(), Some("Line Count: 1"));
    }

    #[test]
    fn test_readme_required() {
        assert!(Cli::try_parse_from(["scriptwrap", "a.sh"]).is_err());
        assert!(Cli::try_parse_from(["scriptwrap"]).is_err());
    }

    #[test]
    fn test_suite_subcommand() {
        let cli = Cli::try_parse_from(["scriptwrap", "suite", "cases.toml"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Suite { ref file }) if file == &PathBuf::from("cases.toml")));
    }

    #[test]
    fn test_generate_only_flag() {
        let cli =
            Cli::try_parse_from(["scriptwrap", "a.sh", "README.md", "--generate-only"]).unwrap();
        assert!(cli.wrap.generate_only);
        assert!(cli.wrap.example.is_none());
    }
}
