// src/commands/wrap.rs

//! Wrap command - generate, build and verify a recipe for one script

use super::pipeline_from_env;
use crate::cli::WrapArgs;
use anyhow::{Context, Result};
use scriptwrap::{Error, Mode, PipelineRequest};
use tracing::info;

pub async fn cmd_wrap(args: WrapArgs) -> Result<()> {
    let script = args.script.context("SCRIPT is required")?;
    let readme = args.readme.context("README is required")?;
    let mode = if args.generate_only {
        Mode::GenerateOnly
    } else {
        Mode::Full
    };

    let pipeline = pipeline_from_env(mode == Mode::Full)?;

    let mut request = PipelineRequest::new(&script, &readme);
    request.example = args.example;
    request.expected = args.expected.clone();
    request.mode = mode;
    request.force = args.force;
    request.keep_recipe_copy = args.keep_recipe_copy;

    info!("Wrapping {}", script.display());
    let outcome = match pipeline.run(&request).await {
        Err(e @ Error::PolicyDenied { .. }) => {
            eprintln!("Use --force to bypass security checks (not recommended)");
            return Err(e.into());
        }
        other => other?,
    };

    if outcome.forced {
        eprintln!("Warning: security checks were bypassed with --force");
    }
    eprintln!("Using example: {}", outcome.invocation.source_text);
    eprintln!("Image tag: {}", outcome.tag);

    if let Some(result) = &outcome.execution {
        eprintln!("Container output:");
        eprintln!("stdout: {}", result.stdout);
        eprintln!("stderr: {}", result.stderr);
        eprintln!("exit code: {}", result.exit_code);
        match args.expected.as_deref().filter(|e| !e.is_empty()) {
            Some(expected) => eprintln!("[OK] Output matches expected: \"{}\"", expected),
            None => eprintln!("[OK] Container executed successfully"),
        }
    } else {
        eprintln!("[OK] Recipe generated and validated");
    }

    println!("{}", outcome.recipe);
    Ok(())
}
