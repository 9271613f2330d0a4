// src/container/mod.rs

//! Isolated build and execution of generated recipes
//!
//! The orchestrator stages the payload and recipe into a fresh directory,
//! asks the runtime to build an image from it, removes the directory, and
//! runs the image with the derived arguments.
//!
//! Runtimes sit behind [`ContainerRuntime`] so the pipeline can be driven
//! against a fake in tests. [`DockerRuntime`] is the real implementation.

mod context;
mod docker;

pub use context::BuildContext;
pub use docker::DockerRuntime;

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;
use tracing::debug;

/// Captured outcome of one container run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Trimmed standard output
    pub stdout: String,
    /// Trimmed standard error
    pub stderr: String,
    /// Exit status, `-1` when the process ended without one
    pub exit_code: i32,
}

impl ExecutionResult {
    pub fn new(stdout: impl AsRef<str>, stderr: impl AsRef<str>, exit_code: i32) -> Self {
        Self {
            stdout: stdout.as_ref().trim().to_string(),
            stderr: stderr.as_ref().trim().to_string(),
            exit_code,
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Build and run primitives of a container engine
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Build an image tagged `tag` from a directory holding a recipe and payload
    async fn build(&self, context_dir: &Path, tag: &str) -> Result<()>;

    /// Run `tag` non-interactively with `args`
    ///
    /// A non-zero exit is returned as data. Only failing to launch is an error.
    async fn run(&self, tag: &str, args: &[String]) -> Result<ExecutionResult>;
}

/// Sequences build-context staging, build, cleanup and run
pub struct ExecutionOrchestrator<'a> {
    runtime: &'a dyn ContainerRuntime,
}

impl<'a> ExecutionOrchestrator<'a> {
    pub fn new(runtime: &'a dyn ContainerRuntime) -> Self {
        Self { runtime }
    }

    /// Build an image from `recipe` plus the payload, then run it with `args`
    ///
    /// The build directory is gone by the time this returns, whatever the
    /// outcome. The image itself is left in the runtime.
    pub async fn build_and_run(
        &self,
        tag: &str,
        payload_path: &Path,
        recipe: &str,
        payload_filename: &str,
        args: &[String],
    ) -> Result<ExecutionResult> {
        let context = BuildContext::create(payload_path, payload_filename, recipe)?;
        let built = self.runtime.build(context.path(), tag).await;
        context.release();
        built?;

        debug!("Running {} {:?}", tag, args);
        self.runtime.run(tag, args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingRuntime {
        fail_build: bool,
        build_dirs: Mutex<Vec<(PathBuf, Vec<String>)>>,
        runs: Mutex<Vec<(String, Vec<String>)>>,
    }

    #[async_trait]
    impl ContainerRuntime for RecordingRuntime {
        async fn build(&self, context_dir: &Path, _tag: &str) -> Result<()> {
            let mut names: Vec<String> = fs::read_dir(context_dir)?
                .map(|e| e.map(|e| e.file_name().to_string_lossy().into_owned()))
                .collect::<std::io::Result<_>>()?;
            names.sort();
            self.build_dirs
                .lock()
                .unwrap()
                .push((context_dir.to_path_buf(), names));
            if self.fail_build {
                return Err(Error::BuildFailed("exit code 1".to_string()));
            }
            Ok(())
        }

        async fn run(&self, tag: &str, args: &[String]) -> Result<ExecutionResult> {
            self.runs
                .lock()
                .unwrap()
                .push((tag.to_string(), args.to_vec()));
            Ok(ExecutionResult::new("  Line Count: 2\n", "", 0))
        }
    }

    fn payload() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("line_counter.sh");
        fs::write(&path, "echo -e \"$1\" | wc -l").unwrap();
        (dir, path)
    }

    #[test]
    fn test_execution_result_trims_streams() {
        let result = ExecutionResult::new("\n out \n", "\terr\n", 0);
        assert_eq!(result.stdout, "out");
        assert_eq!(result.stderr, "err");
        assert!(result.success());
        assert!(!ExecutionResult::new("", "", -1).success());
    }

    #[tokio::test]
    async fn test_build_and_run_stages_and_cleans() {
        let (_src, payload_path) = payload();
        let runtime = RecordingRuntime::default();
        let orchestrator = ExecutionOrchestrator::new(&runtime);
        let args = vec!["Hello\\nWorld".to_string()];

        let result = orchestrator
            .build_and_run("tag-1", &payload_path, "FROM bash", "line_counter.sh", &args)
            .await
            .unwrap();
        assert_eq!(result.stdout, "Line Count: 2");

        let builds = runtime.build_dirs.lock().unwrap();
        assert_eq!(builds.len(), 1);
        assert_eq!(builds[0].1, vec!["Dockerfile", "line_counter.sh"]);
        assert!(!builds[0].0.exists());

        let runs = runtime.runs.lock().unwrap();
        assert_eq!(runs[0], ("tag-1".to_string(), args));
    }

    #[tokio::test]
    async fn test_build_failure_still_cleans_and_skips_run() {
        let (_src, payload_path) = payload();
        let runtime = RecordingRuntime {
            fail_build: true,
            ..Default::default()
        };
        let orchestrator = ExecutionOrchestrator::new(&runtime);

        let err = orchestrator
            .build_and_run("tag-2", &payload_path, "FROM bash", "line_counter.sh", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::BuildFailed(_)));

        let builds = runtime.build_dirs.lock().unwrap();
        assert!(!builds[0].0.exists());
        assert!(runtime.runs.lock().unwrap().is_empty());
    }
}
