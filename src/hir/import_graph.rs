//! File-level import graph.
//!
//! Keys are absolute file identities; values are the files each one
//! imports directly. Self-imports are never stored as edges.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};

use crate::project::{DocumentLoader, resolve_import_uri};
use crate::syntax::{Import, SyntaxFile};

/// Files directly imported by `file`, in statement order.
///
/// Unresolvable URIs and imports of `file` itself are left out.
pub fn direct_imports(file: &Path, imports: &[Import]) -> IndexSet<PathBuf> {
    imports
        .iter()
        .filter_map(|import| resolve_import_uri(file, &import.uri))
        .filter(|target| target != file)
        .collect()
}

#[derive(Clone, Debug, Default)]
pub struct ImportGraph {
    edges: IndexMap<PathBuf, IndexSet<PathBuf>>,
}

impl ImportGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// A graph seeded with one file and its direct imports.
    pub fn seeded(file: &Path, imports: &[Import]) -> Self {
        let mut graph = Self::new();
        graph.insert(file.to_path_buf(), direct_imports(file, imports));
        graph
    }

    pub fn insert(&mut self, file: PathBuf, imports: IndexSet<PathBuf>) {
        self.edges.insert(file, imports);
    }

    /// Whether `file`'s imports are known.
    pub fn contains(&self, file: &Path) -> bool {
        self.edges.contains_key(file)
    }

    /// Files imported directly by `file`; empty for unknown files.
    pub fn imports_of(&self, file: &Path) -> impl Iterator<Item = &PathBuf> {
        self.edges.get(file).into_iter().flatten()
    }

    /// Every file in the graph, as a key or as an import target.
    pub fn files(&self) -> IndexSet<&PathBuf> {
        let mut files: IndexSet<&PathBuf> = self.edges.keys().collect();
        files.extend(self.edges.values().flatten());
        files
    }

    /// Expand imported files until every reachable file is a key.
    ///
    /// Files that fail to load become leaves with no imports. Calling this
    /// on an already closed graph does nothing.
    pub fn resolve_transitive(&mut self, loader: &dyn DocumentLoader) {
        let mut pending: VecDeque<PathBuf> = self
            .edges
            .values()
            .flatten()
            .filter(|target| !self.edges.contains_key(*target))
            .cloned()
            .collect();

        let mut expanded = 0usize;
        while let Some(file) = pending.pop_front() {
            if self.edges.contains_key(&file) {
                continue;
            }
            let imports = match loader.load(&file) {
                Ok(parsed) => match parsed.as_ref() {
                    SyntaxFile::Model(doc) => direct_imports(&file, &doc.imports),
                    SyntaxFile::Deployment(doc) => direct_imports(&file, &doc.imports),
                },
                Err(err) => {
                    tracing::trace!("import {} is a leaf: {err}", file.display());
                    IndexSet::new()
                }
            };
            tracing::trace!("expanded {} ({} imports)", file.display(), imports.len());
            pending.extend(
                imports
                    .iter()
                    .filter(|target| !self.edges.contains_key(*target))
                    .cloned(),
            );
            self.edges.insert(file, imports);
            expanded += 1;
        }

        if expanded > 0 {
            tracing::debug!(
                "import graph reached a fixed point: {} files, {expanded} expanded",
                self.edges.len()
            );
        }
    }

    /// Files reachable from `file` through one or more imports.
    pub fn reachable(&self, file: &Path) -> IndexSet<&PathBuf> {
        let mut seen: IndexSet<&PathBuf> = IndexSet::new();
        let mut stack: Vec<&PathBuf> = self.imports_of(file).collect();
        stack.reverse();
        while let Some(next) = stack.pop() {
            if seen.insert(next) {
                let mut children: Vec<&PathBuf> = self.imports_of(next).collect();
                children.reverse();
                stack.extend(children);
            }
        }
        seen
    }

    /// Whether `from` imports `to` directly or through other files.
    pub fn transitively_imports(&self, from: &Path, to: &Path) -> bool {
        self.reachable(from).iter().any(|file| file.as_path() == to)
    }
}
