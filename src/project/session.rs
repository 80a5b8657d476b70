//! Validation session: the driver that ties loading, indexing,
//! normalization and validation together for one workspace.

use std::path::{Path, PathBuf};

use crate::base::normalize_path;
use crate::hir::{
    DeploymentValidator, Diagnostic, ModelValidator, Normalizer, RenameLedger, Severity,
    SymbolIndex, direct_imports,
};
use crate::syntax::{Document, SyntaxFile};

use super::loader::{DocumentLoader, FileLoader, LoadError};
use super::options::ValidatorOptions;

/// Outcome of validating one file.
#[derive(Debug)]
pub struct ValidationReport {
    pub path: PathBuf,
    /// The file after normalization.
    pub file: SyntaxFile,
    pub diagnostics: Vec<Diagnostic>,
    /// Renames applied while producing `file` (and `models`).
    pub ledger: RenameLedger,
    /// For a deployment: normalized copies of the models it imports directly.
    pub models: Vec<Document>,
}

impl ValidationReport {
    /// Generation must not proceed when this is true.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.with_severity(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.with_severity(Severity::Warning)
    }

    fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |d| d.severity == severity)
    }
}

/// Owns the symbol index and the loader for one workspace.
///
/// The index lives as long as the session; each validation run gets its
/// own import graph and rename ledger.
pub struct ValidationSession<L: DocumentLoader = FileLoader> {
    index: SymbolIndex,
    loader: L,
    options: ValidatorOptions,
}

impl ValidationSession<FileLoader> {
    /// Session reading documents from disk.
    pub fn new(options: ValidatorOptions) -> Self {
        Self::with_loader(FileLoader::new(), options)
    }
}

impl<L: DocumentLoader> ValidationSession<L> {
    pub fn with_loader(loader: L, options: ValidatorOptions) -> Self {
        Self {
            index: SymbolIndex::new(),
            loader,
            options,
        }
    }

    pub fn index(&self) -> &SymbolIndex {
        &self.index
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Mutable access to the loader, e.g. to replace an in-memory buffer.
    pub fn loader_mut(&mut self) -> &mut L {
        &mut self.loader
    }

    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    /// Point the session at another workspace root. The next validation
    /// rescans it.
    pub fn set_workspace_root(&mut self, root: impl Into<PathBuf>) {
        self.options.workspace_root = Some(root.into());
    }

    /// Drop everything cached about `path` after it changed on disk.
    pub fn file_changed(&mut self, path: &Path) {
        self.loader.invalidate(path);
        if !path.exists() {
            self.index.remove(path);
        }
    }

    /// Validate the model or deployment stored at `path`.
    ///
    /// Only failure to load `path` itself is an `Err`; every problem found
    /// in the document or its imports is a diagnostic in the report.
    pub fn validate_path(&mut self, path: &Path) -> Result<ValidationReport, LoadError> {
        let path = normalize_path(path);
        self.loader.invalidate(&path);
        let mut file = self.loader.load(&path)?.as_ref().clone();

        if let Some(root) = &self.options.workspace_root {
            self.index.build_index(root, &self.loader, &self.options);
        }

        let mut normalizer = Normalizer::new();
        let mut models = Vec::new();
        let diagnostics = match &mut file {
            SyntaxFile::Model(document) => {
                normalizer.normalize(document);
                self.index.update_index(document, &path);
                ModelValidator::new(&self.index, &self.loader, &self.options)
                    .validate(document, &path)
            }
            SyntaxFile::Deployment(deployment) => {
                let diagnostics = DeploymentValidator::new(&self.index, &self.loader, &self.options)
                    .validate(deployment, &path);
                for import in direct_imports(&path, &deployment.imports) {
                    let Ok(parsed) = self.loader.load(&import) else {
                        continue;
                    };
                    if let Some(model) = parsed.as_model() {
                        let mut model = model.clone();
                        normalizer.normalize(&mut model);
                        normalizer.normalize_deployment(deployment, &mut model);
                        models.push(model);
                    }
                }
                diagnostics
            }
        };

        tracing::debug!(
            "{}: {} diagnostics, {} renames",
            path.display(),
            diagnostics.len(),
            normalizer.ledger().len()
        );
        Ok(ValidationReport {
            path,
            file,
            diagnostics,
            ledger: normalizer.into_ledger(),
            models,
        })
    }

    /// Validate every model file of the workspace root.
    ///
    /// Files that fail to load are returned as errors next to the reports.
    pub fn validate_workspace(&mut self) -> Vec<Result<ValidationReport, LoadError>> {
        let Some(root) = self.options.workspace_root.clone() else {
            return Vec::new();
        };
        self.index.build_index(&root, &self.loader, &self.options);
        let files: Vec<PathBuf> = self.index.entries().map(|(path, _)| path.clone()).collect();
        files.iter().map(|file| self.validate_path(file)).collect()
    }
}
