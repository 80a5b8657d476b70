//! On-disk workspaces in a temporary directory.

use std::fs;
use std::path::{Path, PathBuf};

use franca::base::normalize_path;
use franca::{ValidationSession, ValidatorOptions};
use tempfile::TempDir;

/// A temporary directory of model files, removed on drop.
pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Builder form of [`TestWorkspace::write`].
    pub fn with_file(self, relative: &str, source: impl AsRef<str>) -> Self {
        self.write(relative, source);
        self
    }

    /// Writes (or overwrites) a file, creating parent directories.
    pub fn write(&self, relative: &str, source: impl AsRef<str>) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create directories");
        }
        fs::write(&path, source.as_ref()).expect("Failed to write file");
        path
    }

    pub fn remove(&self, relative: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        fs::remove_file(&path).expect("Failed to remove file");
        path
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Normalized absolute path of `relative`, as diagnostics report it.
    pub fn path(&self, relative: &str) -> PathBuf {
        normalize_path(&self.dir.path().join(relative))
    }

    /// A disk-backed session rooted at this workspace.
    pub fn session(&self) -> ValidationSession {
        ValidationSession::new(ValidatorOptions::default().with_workspace_root(self.root()))
    }
}
