//! Name resolution across a document and its import closure.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;

use super::import_graph::ImportGraph;
use crate::project::DocumentLoader;
use crate::syntax::{Document, ElementId, Interface, SyntaxFile, TypeCollection, TypeDecl};

/// An interface together with the file and package declaring it.
#[derive(Clone, Copy, Debug)]
pub struct InterfaceHandle<'s> {
    pub file: &'s Path,
    pub package: &'s str,
    pub interface: &'s Interface,
}

/// A type collection together with the file and package declaring it.
#[derive(Clone, Copy, Debug)]
pub struct TypeCollectionHandle<'s> {
    pub file: &'s Path,
    pub package: &'s str,
    pub type_collection: &'s TypeCollection,
}

/// A type declaration together with its file and enclosing container.
#[derive(Clone, Copy, Debug)]
pub struct TypeHandle<'s> {
    pub file: &'s Path,
    pub container: &'s str,
    pub decl: &'s TypeDecl,
}

/// Every document reachable from one starting file.
///
/// The starting document may be an in-memory copy (e.g. after
/// normalization); every other document comes from the loader.
pub struct ModelScope<'a> {
    root: Option<(&'a Path, &'a Document)>,
    graph: &'a ImportGraph,
    loaded: IndexMap<PathBuf, Arc<SyntaxFile>>,
}

impl<'a> ModelScope<'a> {
    /// Scope for a model document stored at `path`.
    pub fn for_document(
        path: &'a Path,
        document: &'a Document,
        graph: &'a ImportGraph,
        loader: &dyn DocumentLoader,
    ) -> Self {
        Self::load(Some((path, document)), graph, loader)
    }

    /// Scope made only of the files in `graph`, e.g. for a deployment.
    pub fn for_graph(graph: &'a ImportGraph, loader: &dyn DocumentLoader) -> Self {
        Self::load(None, graph, loader)
    }

    fn load(
        root: Option<(&'a Path, &'a Document)>,
        graph: &'a ImportGraph,
        loader: &dyn DocumentLoader,
    ) -> Self {
        let mut loaded = IndexMap::new();
        for file in graph.files() {
            if root.is_some_and(|(path, _)| path == file.as_path()) {
                continue;
            }
            // Unloadable files were already reported by the import checks.
            if let Ok(parsed) = loader.load(file) {
                loaded.insert(file.clone(), parsed);
            }
        }
        Self {
            root,
            graph,
            loaded,
        }
    }

    pub fn graph(&self) -> &ImportGraph {
        self.graph
    }

    /// The model document stored at `file`, if loaded.
    pub fn document(&self, file: &Path) -> Option<&Document> {
        self.entry(file).map(|(_, document)| document)
    }

    fn entry(&self, file: &Path) -> Option<(&Path, &Document)> {
        match self.root {
            Some((path, document)) if path == file => Some((path, document)),
            _ => {
                let (path, parsed) = self.loaded.get_key_value(file)?;
                Some((path.as_path(), parsed.as_model()?))
            }
        }
    }

    /// Every loaded model document, the starting one first.
    pub fn documents(&self) -> impl Iterator<Item = (&Path, &Document)> {
        self.root.into_iter().chain(
            self.loaded
                .iter()
                .filter_map(|(path, parsed)| Some((path.as_path(), parsed.as_model()?))),
        )
    }

    /// `from` itself, then everything it imports transitively.
    pub fn visible_from(&self, from: &Path) -> Vec<(&Path, &Document)> {
        let mut visible: Vec<_> = self.entry(from).into_iter().collect();
        for file in self.graph.reachable(from) {
            visible.extend(self.entry(file));
        }
        visible
    }

    /// Resolve `Name` or `pkg.Name` to an interface visible from `from`.
    pub fn resolve_interface(&self, from: &Path, name: &str) -> Option<InterfaceHandle<'_>> {
        self.visible_from(from).into_iter().find_map(|(file, doc)| {
            doc.interfaces
                .iter()
                .find(|i| names_match(name, &doc.package, &i.name))
                .map(|interface| InterfaceHandle {
                    file,
                    package: &doc.package,
                    interface,
                })
        })
    }

    /// Resolve `Name` or `pkg.Name` to a type collection visible from `from`.
    pub fn resolve_type_collection(
        &self,
        from: &Path,
        name: &str,
    ) -> Option<TypeCollectionHandle<'_>> {
        self.visible_from(from).into_iter().find_map(|(file, doc)| {
            doc.type_collections
                .iter()
                .find(|tc| names_match(name, &doc.package, &tc.name))
                .map(|type_collection| TypeCollectionHandle {
                    file,
                    package: &doc.package,
                    type_collection,
                })
        })
    }

    /// Resolve a type reference written inside `container` of `from`.
    ///
    /// Accepts `Type`, `Container.Type` and `pkg.Container.Type`. A simple
    /// name prefers the referencing container.
    pub fn resolve_type(&self, from: &Path, container: &str, name: &str) -> Option<TypeHandle<'_>> {
        let visible = self.visible_from(from);
        match name.rsplit_once('.') {
            None => {
                let local = visible.first().copied().and_then(|(file, doc)| {
                    containers(doc)
                        .find(|(owner, _)| *owner == container)
                        .and_then(|(owner, types)| find_type(file, owner, types, name))
                });
                local.or_else(|| {
                    visible.iter().copied().find_map(|(file, doc)| {
                        containers(doc)
                            .find_map(|(owner, types)| find_type(file, owner, types, name))
                    })
                })
            }
            Some((prefix, simple)) => visible.iter().copied().find_map(|(file, doc)| {
                containers(doc)
                    .filter(|(owner, _)| names_match(prefix, &doc.package, owner))
                    .find_map(|(owner, types)| find_type(file, owner, types, simple))
            }),
        }
    }

    pub fn interface_by_id(&self, id: ElementId) -> Option<InterfaceHandle<'_>> {
        self.documents().find_map(|(file, doc)| {
            doc.interfaces
                .iter()
                .find(|i| i.id == id)
                .map(|interface| InterfaceHandle {
                    file,
                    package: &doc.package,
                    interface,
                })
        })
    }

    pub fn type_by_id(&self, id: ElementId) -> Option<TypeHandle<'_>> {
        self.documents().find_map(|(file, doc)| {
            containers(doc).find_map(|(owner, types)| {
                types
                    .iter()
                    .find(|decl| decl.id() == id)
                    .map(|decl| TypeHandle {
                        file,
                        container: owner,
                        decl,
                    })
            })
        })
    }
}

/// `name` is `simple` or `package.simple`.
pub(crate) fn names_match(name: &str, package: &str, simple: &str) -> bool {
    name == simple
        || name
            .strip_prefix(package)
            .and_then(|rest| rest.strip_prefix('.'))
            .is_some_and(|rest| rest == simple)
}

fn containers(doc: &Document) -> impl Iterator<Item = (&str, &[TypeDecl])> {
    doc.type_collections
        .iter()
        .map(|tc| (tc.name.as_str(), tc.types.as_slice()))
        .chain(
            doc.interfaces
                .iter()
                .map(|i| (i.name.as_str(), i.types.as_slice())),
        )
}

fn find_type<'s>(
    file: &'s Path,
    container: &'s str,
    types: &'s [TypeDecl],
    name: &str,
) -> Option<TypeHandle<'s>> {
    types
        .iter()
        .find(|decl| decl.name() == name)
        .map(|decl| TypeHandle {
            file,
            container,
            decl,
        })
}
