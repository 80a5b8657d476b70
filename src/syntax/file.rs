//! Syntax file wrapper for parsed model and deployment files.

use std::path::{Path, PathBuf};

use super::deployment::DeploymentDocument;
use super::model::Document;
use crate::base::constants::{FDEPL_EXT, FIDL_EXT};

/// File extension type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileExtension {
    Fidl,
    Fdepl,
}

impl FileExtension {
    /// Classify a path by its extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            FIDL_EXT => Some(FileExtension::Fidl),
            FDEPL_EXT => Some(FileExtension::Fdepl),
            _ => None,
        }
    }
}

/// A parsed file of either language.
#[derive(Debug, Clone)]
pub enum SyntaxFile {
    Model(Document),
    Deployment(DeploymentDocument),
}

impl SyntaxFile {
    pub fn path(&self) -> &PathBuf {
        match self {
            SyntaxFile::Model(doc) => &doc.path,
            SyntaxFile::Deployment(doc) => &doc.path,
        }
    }

    pub fn extension(&self) -> FileExtension {
        match self {
            SyntaxFile::Model(_) => FileExtension::Fidl,
            SyntaxFile::Deployment(_) => FileExtension::Fdepl,
        }
    }

    pub fn as_model(&self) -> Option<&Document> {
        match self {
            SyntaxFile::Model(doc) => Some(doc),
            SyntaxFile::Deployment(_) => None,
        }
    }

    pub fn as_deployment(&self) -> Option<&DeploymentDocument> {
        match self {
            SyntaxFile::Deployment(doc) => Some(doc),
            SyntaxFile::Model(_) => None,
        }
    }
}
