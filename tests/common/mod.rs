// tests/common/mod.rs

//! Shared test utilities: fake generator, fake runtime and script fixtures.

#![allow(dead_code)]

use async_trait::async_trait;
use scriptwrap::security::{InputSanitizer, PatternCatalog, SanitizerConfig};
use scriptwrap::{
    ContainerRuntime, Error, ExecutionResult, GenerationRequest, Generator, Pipeline, Result,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const LINE_COUNTER: &str = "#!/bin/bash\n\
input=\"$1\"\n\
echo -e \"$input\" | wc -l | xargs printf \"Line Count: %s\\n\"\n";

pub const LINE_COUNTER_README: &str = "# Line Counter\n\n\
Counts the lines in its first argument.\n\n\
## Example\n\n\
```bash\n\
./scripts/line_counter/line_counter.sh 'Hello\\nWorld'\n\
```\n\n\
Output:\n\n\
```\n\
Line Count: 2\n\
```\n";

pub const RECIPE: &str = "FROM bash:latest\n\
COPY line_counter.sh /line_counter.sh\n\
RUN chmod +x /line_counter.sh\n\
ENTRYPOINT [\"bash\", \"/line_counter.sh\"]";

/// A script and README on disk
pub struct Fixture {
    pub dir: TempDir,
    pub script: PathBuf,
    pub readme: PathBuf,
}

impl Fixture {
    pub fn new(script: &str, readme: &str) -> Self {
        Self::named("line_counter.sh", script, readme)
    }

    pub fn named(filename: &str, script: &str, readme: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let script_path = dir.path().join(filename);
        let readme_path = dir.path().join("README.md");
        fs::write(&script_path, script).unwrap();
        fs::write(&readme_path, readme).unwrap();
        Self {
            dir,
            script: script_path,
            readme: readme_path,
        }
    }

    pub fn line_counter() -> Self {
        Self::new(LINE_COUNTER, LINE_COUNTER_README)
    }

    /// Sanitizer that accepts absolute paths inside this fixture
    pub fn sanitizer(&self) -> InputSanitizer {
        InputSanitizer::new(
            PatternCatalog::standard(),
            SanitizerConfig {
                allowed_prefix: self.dir.path().to_string_lossy().into_owned(),
                ..Default::default()
            },
        )
    }
}

/// Generator returning a canned response and recording requests
#[derive(Clone)]
pub struct FakeGenerator {
    response: std::result::Result<String, String>,
    pub requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl FakeGenerator {
    pub fn returning(text: &str) -> Self {
        Self {
            response: Ok(text.to_string()),
            requests: Arc::default(),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            requests: Arc::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> GenerationRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl Generator for FakeGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        self.response.clone().map_err(Error::GenerationFailed)
    }

    fn name(&self) -> &str {
        "fake"
    }
}

/// What the fake runtime saw when asked to build
#[derive(Debug, Clone)]
pub struct BuildRecord {
    pub dir: PathBuf,
    pub tag: String,
    /// (filename, contents), sorted by name
    pub files: Vec<(String, String)>,
    /// Files present in the watched directory at build time
    pub watched: Vec<String>,
}

/// Runtime that records builds and returns a fixed run result
#[derive(Clone)]
pub struct FakeRuntime {
    result: ExecutionResult,
    fail_build: bool,
    watch_dir: Option<PathBuf>,
    pub builds: Arc<Mutex<Vec<BuildRecord>>>,
    pub runs: Arc<Mutex<Vec<(String, Vec<String>)>>>,
}

impl FakeRuntime {
    pub fn exiting(stdout: &str, exit_code: i32) -> Self {
        Self {
            result: ExecutionResult::new(stdout, "", exit_code),
            fail_build: false,
            watch_dir: None,
            builds: Arc::default(),
            runs: Arc::default(),
        }
    }

    pub fn failing_build() -> Self {
        Self {
            fail_build: true,
            ..Self::exiting("", 0)
        }
    }

    pub fn watching(mut self, dir: &Path) -> Self {
        self.watch_dir = Some(dir.to_path_buf());
        self
    }

    pub fn build_count(&self) -> usize {
        self.builds.lock().unwrap().len()
    }

    pub fn run_count(&self) -> usize {
        self.runs.lock().unwrap().len()
    }
}

fn list_dir(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[async_trait]
impl ContainerRuntime for FakeRuntime {
    async fn build(&self, context_dir: &Path, tag: &str) -> Result<()> {
        let files = list_dir(context_dir)
            .into_iter()
            .map(|name| {
                let contents = fs::read_to_string(context_dir.join(&name)).unwrap();
                (name, contents)
            })
            .collect();
        let watched = self.watch_dir.as_deref().map(list_dir).unwrap_or_default();

        self.builds.lock().unwrap().push(BuildRecord {
            dir: context_dir.to_path_buf(),
            tag: tag.to_string(),
            files,
            watched,
        });

        if self.fail_build {
            return Err(Error::BuildFailed("exit code 1: boom".to_string()));
        }
        Ok(())
    }

    async fn run(&self, tag: &str, args: &[String]) -> Result<ExecutionResult> {
        self.runs
            .lock()
            .unwrap()
            .push((tag.to_string(), args.to_vec()));
        Ok(self.result.clone())
    }
}

/// Pipeline over the fakes, with the sanitizer scoped to the fixture
pub fn pipeline(fixture: &Fixture, generator: &FakeGenerator, runtime: &FakeRuntime) -> Pipeline {
    Pipeline::new(Box::new(generator.clone()), Box::new(runtime.clone()))
        .with_sanitizer(fixture.sanitizer())
}
