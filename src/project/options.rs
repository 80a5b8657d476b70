//! Validation configuration.

use std::path::{Path, PathBuf};

use crate::base::constants::{FDEPL_EXT, FIDL_EXT, SKIPPED_DIRS};

/// Options shared by the index builder and the validators.
///
/// Severities are fixed by the rules themselves and are not configurable.
#[derive(Debug, Clone)]
pub struct ValidatorOptions {
    /// Directory scanned for the cross-file symbol index. `None` disables
    /// workspace indexing; only files seen through `update_index` are known.
    pub workspace_root: Option<PathBuf>,
    /// Directory names never descended into while scanning.
    pub skipped_dirs: Vec<String>,
    /// Extension of interface-description documents.
    pub model_extension: String,
    /// Extension of deployment documents.
    pub deployment_extension: String,
    /// Report declarations that share name and package with another file.
    pub check_cross_file_duplicates: bool,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            workspace_root: None,
            skipped_dirs: SKIPPED_DIRS.iter().map(|d| d.to_string()).collect(),
            model_extension: FIDL_EXT.to_string(),
            deployment_extension: FDEPL_EXT.to_string(),
            check_cross_file_duplicates: true,
        }
    }
}

impl ValidatorOptions {
    pub fn with_workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace_root = Some(root.into());
        self
    }

    pub fn is_skipped_dir(&self, name: &str) -> bool {
        self.skipped_dirs.iter().any(|d| d == name)
    }

    pub fn is_model_file(&self, path: &Path) -> bool {
        has_extension(path, &self.model_extension)
    }

    pub fn is_deployment_file(&self, path: &Path) -> bool {
        has_extension(path, &self.deployment_extension)
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(extension)
}
