// src/commands/suite.rs

//! Suite command - run a file of cases and summarize

use super::pipeline_from_env;
use anyhow::{bail, Context, Result};
use scriptwrap::Suite;
use std::path::Path;

fn mark(ok: bool) -> &'static str {
    if ok { "yes" } else { "no" }
}

pub async fn cmd_suite(file: &Path) -> Result<()> {
    let suite = Suite::load(file)
        .with_context(|| format!("Failed to load suite: {}", file.display()))?;
    let pipeline = pipeline_from_env(true)?;

    eprintln!("Running suite with {} case(s)", suite.cases.len());
    eprintln!("{}", "=".repeat(60));

    let report = suite.run(&pipeline).await;

    for result in &report.results {
        let d = &result.details;
        if result.passed {
            eprintln!("[PASS] {}", result.name);
        } else {
            eprintln!(
                "[FAIL] {}: {}",
                result.name,
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
        eprintln!(
            "  recipe generated: {}, build succeeded: {}, container ran: {}, output matched: {}",
            mark(d.recipe_generated),
            mark(d.build_succeeded),
            mark(d.container_ran),
            mark(d.output_matched)
        );
        if let Some(output) = &d.actual_output {
            eprintln!("  actual output: {}", output);
        }
    }

    eprintln!("{}", "=".repeat(60));
    eprintln!(
        "Results: {} passed, {} failed",
        report.passed(),
        report.failed()
    );

    if !report.all_passed() {
        bail!("{} case(s) failed", report.failed());
    }
    Ok(())
}
