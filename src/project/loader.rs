//! Document loading and import-URI resolution.
//!
//! Validators never read files themselves. They ask a [`DocumentLoader`]
//! for the parsed document behind an absolute file identity and treat any
//! failure as an absent node.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::base::constants::EXTERNAL_SCHEMES;
use crate::base::{normalize_path, resolve_relative};
use crate::parser::{ParseError, parse_fdepl, parse_fidl};
use crate::syntax::{FileExtension, SyntaxFile};

/// Failure to produce a parsed document for a file identity.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}:{source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("unsupported file extension: {}", .0.display())]
    UnsupportedExtension(PathBuf),
}

impl LoadError {
    pub fn path(&self) -> &Path {
        match self {
            LoadError::NotFound(path) | LoadError::UnsupportedExtension(path) => path,
            LoadError::Io { path, .. } | LoadError::Parse { path, .. } => path,
        }
    }
}

/// Source of parsed documents, keyed by absolute file identity.
pub trait DocumentLoader {
    /// Load and parse the document at `path`.
    fn load(&self, path: &Path) -> Result<Arc<SyntaxFile>, LoadError>;

    /// Forget any cached copy of `path`.
    fn invalidate(&self, _path: &Path) {}
}

/// Resolve an import URI against the file that contains the import.
///
/// Returns `None` for plugin or classpath URIs, which name resources
/// outside the workspace.
pub fn resolve_import_uri(base: &Path, raw: &str) -> Option<PathBuf> {
    let raw = raw.trim();
    if EXTERNAL_SCHEMES.iter().any(|scheme| raw.starts_with(scheme)) {
        return None;
    }
    Some(resolve_relative(base, raw))
}

/// Parse `source` with the reader matching the extension of `path`.
pub fn parse_source(path: &Path, source: &str) -> Result<SyntaxFile, LoadError> {
    let parse_error = |source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    };
    match FileExtension::from_path(path) {
        Some(FileExtension::Fidl) => parse_fidl(source, path)
            .map(SyntaxFile::Model)
            .map_err(parse_error),
        Some(FileExtension::Fdepl) => parse_fdepl(source, path)
            .map(SyntaxFile::Deployment)
            .map_err(parse_error),
        None => Err(LoadError::UnsupportedExtension(path.to_path_buf())),
    }
}

// ============================================================================
// FILE LOADER
// ============================================================================

/// Reads documents from disk and caches them per normalized path.
#[derive(Debug, Default)]
pub struct FileLoader {
    cache: Mutex<FxHashMap<PathBuf, Arc<SyntaxFile>>>,
}

impl FileLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&self) {
        self.cache.lock().clear();
    }

    pub fn cached_len(&self) -> usize {
        self.cache.lock().len()
    }
}

impl DocumentLoader for FileLoader {
    fn load(&self, path: &Path) -> Result<Arc<SyntaxFile>, LoadError> {
        let path = normalize_path(path);
        if let Some(cached) = self.cache.lock().get(&path) {
            return Ok(Arc::clone(cached));
        }
        if FileExtension::from_path(&path).is_none() {
            return Err(LoadError::UnsupportedExtension(path));
        }

        let source = std::fs::read_to_string(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                LoadError::NotFound(path.clone())
            } else {
                LoadError::Io {
                    path: path.clone(),
                    source,
                }
            }
        })?;

        tracing::trace!("parsing {}", path.display());
        let file = Arc::new(parse_source(&path, &source)?);
        self.cache.lock().insert(path, Arc::clone(&file));
        Ok(file)
    }

    /// Drop the cached document for `path` so the next load rereads it.
    fn invalidate(&self, path: &Path) {
        self.cache.lock().remove(&normalize_path(path));
    }
}

// ============================================================================
// MEMORY LOADER
// ============================================================================

/// Serves documents from in-memory sources, e.g. unsaved editor buffers.
#[derive(Debug, Default)]
pub struct MemoryLoader {
    sources: FxHashMap<PathBuf, String>,
    parsed: Mutex<FxHashMap<PathBuf, Arc<SyntaxFile>>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the source text for `path`.
    pub fn insert(&mut self, path: impl AsRef<Path>, source: impl Into<String>) {
        let path = normalize_path(path.as_ref());
        self.parsed.get_mut().remove(&path);
        self.sources.insert(path, source.into());
    }

    pub fn with_file(mut self, path: impl AsRef<Path>, source: impl Into<String>) -> Self {
        self.insert(path, source);
        self
    }

    pub fn remove(&mut self, path: &Path) {
        let path = normalize_path(path);
        self.parsed.get_mut().remove(&path);
        self.sources.remove(&path);
    }

    /// Every path with a registered source, in sorted order.
    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<_> = self.sources.keys().cloned().collect();
        paths.sort();
        paths
    }
}

impl DocumentLoader for MemoryLoader {
    fn load(&self, path: &Path) -> Result<Arc<SyntaxFile>, LoadError> {
        let path = normalize_path(path);
        if let Some(parsed) = self.parsed.lock().get(&path) {
            return Ok(Arc::clone(parsed));
        }
        let source = self
            .sources
            .get(&path)
            .ok_or_else(|| LoadError::NotFound(path.clone()))?;
        let file = Arc::new(parse_source(&path, source)?);
        self.parsed.lock().insert(path, Arc::clone(&file));
        Ok(file)
    }
}
