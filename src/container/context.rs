// src/container/context.rs

//! Transient build directory

use crate::error::Result;
use crate::recipe::RECIPE_FILENAME;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, warn};

const BUILD_DIR_PREFIX: &str = "scriptwrap-build-";

/// A uniquely-named directory holding the payload and recipe for one build
///
/// The directory is removed by [`BuildContext::release`], or on drop if
/// release was never reached. Removal failures are logged, never returned.
pub struct BuildContext {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl BuildContext {
    /// Create the directory and populate it with `payload_filename` and the recipe
    pub fn create(payload_path: &Path, payload_filename: &str, recipe: &str) -> Result<Self> {
        let dir = tempfile::Builder::new().prefix(BUILD_DIR_PREFIX).tempdir()?;
        let path = dir.path().to_path_buf();
        // Owned from here on, so an early return below still removes the directory
        let context = Self {
            dir: Some(dir),
            path,
        };

        fs::copy(payload_path, context.path.join(payload_filename))?;
        fs::write(context.path.join(RECIPE_FILENAME), recipe)?;
        debug!("Build context prepared at {}", context.path.display());

        Ok(context)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the directory now
    pub fn release(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        if let Some(dir) = self.dir.take() {
            match dir.close() {
                Ok(()) => debug!("Removed build context {}", self.path.display()),
                Err(e) => warn!("Failed to remove build context {}: {}", self.path.display(), e),
            }
        }
    }
}

impl Drop for BuildContext {
    fn drop(&mut self) {
        self.remove();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn payload() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("count.sh");
        fs::write(&path, "#!/bin/bash\necho \"$1\" | wc -l\n").unwrap();
        (dir, path)
    }

    #[test]
    fn test_context_holds_payload_and_recipe() {
        let (_src, payload_path) = payload();
        let context = BuildContext::create(&payload_path, "count.sh", "FROM bash:latest").unwrap();

        let entries: Vec<String> = fs::read_dir(context.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(
            fs::read_to_string(context.path().join(RECIPE_FILENAME)).unwrap(),
            "FROM bash:latest"
        );
        assert!(context.path().join("count.sh").exists());
        assert!(context
            .path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(BUILD_DIR_PREFIX));
    }

    #[test]
    fn test_release_removes_directory() {
        let (_src, payload_path) = payload();
        let context = BuildContext::create(&payload_path, "count.sh", "FROM bash").unwrap();
        let path = context.path().to_path_buf();
        context.release();
        assert!(!path.exists());
    }

    #[test]
    fn test_drop_removes_directory() {
        let (_src, payload_path) = payload();
        let path = {
            let context = BuildContext::create(&payload_path, "count.sh", "FROM bash").unwrap();
            context.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_payload_fails() {
        let err = BuildContext::create(Path::new("/nonexistent/x.sh"), "x.sh", "FROM bash");
        assert!(err.is_err());
    }

    #[test]
    fn test_contexts_are_unique() {
        let (_src, payload_path) = payload();
        let a = BuildContext::create(&payload_path, "count.sh", "FROM bash").unwrap();
        let b = BuildContext::create(&payload_path, "count.sh", "FROM bash").unwrap();
        assert_ne!(a.path(), b.path());
    }
}
