//! Workspace-wide index of top-level declarations.
//!
//! The index is an explicit handle owned by a session. It remembers the
//! last scanned root so repeated single-file validations do not rescan the
//! tree, and it keeps a derived name → package → files view that is rebuilt
//! from scratch whenever an entry changes.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use walkdir::WalkDir;

use crate::base::normalize_path;
use crate::project::{DocumentLoader, ValidatorOptions};
use crate::syntax::Document;

/// What one file contributes to the index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SymbolIndexEntry {
    pub package: SmolStr,
    pub type_collections: BTreeSet<SmolStr>,
    pub interfaces: BTreeSet<SmolStr>,
}

impl SymbolIndexEntry {
    pub fn from_document(document: &Document) -> Self {
        Self {
            package: document.package.clone(),
            type_collections: document
                .type_collections
                .iter()
                .map(|tc| tc.name.clone())
                .collect(),
            interfaces: document.interfaces.iter().map(|i| i.name.clone()).collect(),
        }
    }

    /// Every declared top-level name.
    pub fn names(&self) -> impl Iterator<Item = &SmolStr> {
        self.type_collections.iter().chain(self.interfaces.iter())
    }
}

/// name → package → files declaring that name in that package.
pub type FastIndex = FxHashMap<SmolStr, FxHashMap<SmolStr, BTreeSet<PathBuf>>>;

#[derive(Clone, Debug, Default)]
pub struct SymbolIndex {
    root: Option<PathBuf>,
    entries: IndexMap<PathBuf, SymbolIndexEntry>,
    fast: FastIndex,
}

impl SymbolIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan `root` for model files and index them.
    ///
    /// Returns `false` without rescanning when `root` is the root of the
    /// previous scan. Files that fail to load are skipped.
    pub fn build_index(
        &mut self,
        root: &Path,
        loader: &dyn DocumentLoader,
        options: &ValidatorOptions,
    ) -> bool {
        let root = normalize_path(root);
        if self.root.as_ref() == Some(&root) {
            tracing::debug!("symbol index for {} is current", root.display());
            return false;
        }

        let files = scan_model_files(&root, options);
        self.entries.clear();
        for file in files {
            self.index_file(&file, loader);
        }
        self.root = Some(root);
        self.rebuild_fast_index();
        tracing::debug!(
            "built symbol index: {} files, {} names",
            self.entries.len(),
            self.fast.len()
        );
        true
    }

    /// Index an explicit set of files, replacing the current contents.
    pub fn build_index_from_files<I>(&mut self, files: I, loader: &dyn DocumentLoader)
    where
        I: IntoIterator,
        I::Item: AsRef<Path>,
    {
        self.root = None;
        self.entries.clear();
        for file in files {
            self.index_file(&normalize_path(file.as_ref()), loader);
        }
        self.rebuild_fast_index();
    }

    /// Replace the entry for one file after an edit.
    pub fn update_index(&mut self, document: &Document, path: &Path) {
        let path = normalize_path(path);
        tracing::trace!("updating symbol index for {}", path.display());
        self.entries
            .insert(path, SymbolIndexEntry::from_document(document));
        self.rebuild_fast_index();
    }

    /// Forget one file, e.g. after it was deleted.
    pub fn remove(&mut self, path: &Path) -> bool {
        let removed = self
            .entries
            .shift_remove(&normalize_path(path))
            .is_some();
        if removed {
            self.rebuild_fast_index();
        }
        removed
    }

    /// Forget the memoized root so the next `build_index` rescans.
    pub fn invalidate(&mut self) {
        self.root = None;
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn entry(&self, path: &Path) -> Option<&SymbolIndexEntry> {
        self.entries.get(path)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&PathBuf, &SymbolIndexEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Packages and files declaring `name`.
    pub fn lookup(&self, name: &str) -> Option<&FxHashMap<SmolStr, BTreeSet<PathBuf>>> {
        self.fast.get(name)
    }

    /// Files declaring `name` in `package`, in path order.
    pub fn files_declaring(&self, name: &str, package: &str) -> impl Iterator<Item = &PathBuf> {
        self.fast
            .get(name)
            .and_then(|packages| packages.get(package))
            .into_iter()
            .flatten()
    }

    fn index_file(&mut self, path: &Path, loader: &dyn DocumentLoader) {
        tracing::trace!("indexing {}", path.display());
        match loader.load(path) {
            Ok(file) => match file.as_model() {
                Some(document) => {
                    self.entries
                        .insert(path.to_path_buf(), SymbolIndexEntry::from_document(document));
                }
                None => tracing::trace!("{} is not a model file", path.display()),
            },
            Err(err) => tracing::warn!("skipping {} while indexing: {err}", path.display()),
        }
    }

    fn rebuild_fast_index(&mut self) {
        let mut fast = FastIndex::default();
        for (path, entry) in &self.entries {
            for name in entry.names() {
                fast.entry(name.clone())
                    .or_default()
                    .entry(entry.package.clone())
                    .or_default()
                    .insert(path.clone());
            }
        }
        self.fast = fast;
    }
}

/// Model files under `root`, skipping build output, in path order.
fn scan_model_files(root: &Path, options: &ValidatorOptions) -> Vec<PathBuf> {
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| options.is_skipped_dir(name))
        });

    let mut files = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) if entry.file_type().is_file() && options.is_model_file(entry.path()) => {
                files.push(normalize_path(entry.path()));
            }
            Ok(_) => {}
            Err(err) => tracing::warn!("directory traversal error: {err}"),
        }
    }
    files
}
