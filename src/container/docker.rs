// src/container/docker.rs

//! Docker-compatible CLI runtime
//!
//! Drives `docker` (or any CLI with the same `build`/`run` surface, such as
//! `podman`) as a child process.

use super::{ContainerRuntime, ExecutionResult};
use crate::config::RuntimeConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Lines of build output kept for the failure message
const BUILD_TAIL_LINES: usize = 20;

/// Container runtime backed by an external CLI binary
#[derive(Debug, Clone)]
pub struct DockerRuntime {
    program: PathBuf,
}

impl DockerRuntime {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Resolve the configured binary on `PATH`
    pub fn from_config(config: &RuntimeConfig) -> Result<Self> {
        let program = config.resolve()?;
        debug!("Using container runtime {}", program.display());
        Ok(Self::new(program))
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

/// Echo each line to stderr with a `[build]` prefix, keeping the last few
///
/// Lines are read as raw bytes and the pipe is drained to EOF, so output
/// that is not UTF-8 never closes the pipe under a running build.
async fn relay_build_output<R>(reader: R) -> VecDeque<String>
where
    R: AsyncRead + Unpin,
{
    let mut tail = VecDeque::with_capacity(BUILD_TAIL_LINES);
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                warn!("Failed to read build output: {}", e);
                break;
            }
        }
        let line = String::from_utf8_lossy(&buf).trim_end_matches(['\n', '\r']).to_string();
        eprintln!("[build] {}", line);
        if tail.len() == BUILD_TAIL_LINES {
            tail.pop_front();
        }
        tail.push_back(line);
    }
    tail
}

#[async_trait]
impl ContainerRuntime for DockerRuntime {
    async fn build(&self, context_dir: &Path, tag: &str) -> Result<()> {
        info!("Building image {}", tag);
        let mut child = Command::new(&self.program)
            .arg("build")
            .arg("-t")
            .arg(tag)
            .arg(context_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                Error::BuildFailed(format!("failed to start {}: {}", self.program.display(), e))
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let (out_tail, err_tail) = tokio::join!(
            async move {
                match stdout {
                    Some(s) => relay_build_output(s).await,
                    None => VecDeque::new(),
                }
            },
            async move {
                match stderr {
                    Some(s) => relay_build_output(s).await,
                    None => VecDeque::new(),
                }
            }
        );

        let status = child.wait().await?;
        if !status.success() {
            let code = status.code().unwrap_or(-1);
            let tail: Vec<String> = err_tail.into_iter().chain(out_tail).collect();
            return Err(Error::BuildFailed(format!(
                "exit code {}: {}",
                code,
                tail.join("\n")
            )));
        }

        debug!("Image {} built", tag);
        Ok(())
    }

    async fn run(&self, tag: &str, args: &[String]) -> Result<ExecutionResult> {
        info!("Running image {} with {} argument(s)", tag, args.len());
        let output = Command::new(&self.program)
            .arg("run")
            .arg("--rm")
            .arg(tag)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| Error::RunFailed {
                exit_code: None,
                message: format!("failed to start {}: {}", self.program.display(), e),
            })?;

        let result = ExecutionResult::new(
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
            output.status.code().unwrap_or(-1),
        );
        debug!("Container exited with code {}", result.exit_code);
        Ok(result)
    }
}
