//! In-memory model of a deployment-annotation document.
//!
//! Deployment documents never own model elements. Each definition names its
//! target interface or type collection, and nested blocks name members of
//! that target. Resolution to model element identities happens in
//! [`crate::hir::resolve_deployment`].

use std::path::PathBuf;

use smol_str::SmolStr;

use super::element::{ElementId, ElementKind, ElementRef};
use super::model::{Import, Reference};
use crate::base::Span;

/// A parsed deployment file.
#[derive(Clone, Debug, Default)]
pub struct DeploymentDocument {
    pub path: PathBuf,
    pub imports: Vec<Import>,
    pub definitions: Vec<DeploymentDefinition>,
}

/// What a `define ... for <kind> <target>` block deploys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeploymentTargetKind {
    Interface,
    TypeCollection,
}

impl DeploymentTargetKind {
    pub fn display(&self) -> &'static str {
        match self {
            DeploymentTargetKind::Interface => "Interface",
            DeploymentTargetKind::TypeCollection => "Type collection",
        }
    }
}

/// `define <specification> for interface <target> { ... }`
#[derive(Clone, Debug)]
pub struct DeploymentDefinition {
    pub id: ElementId,
    pub specification: SmolStr,
    pub target_kind: DeploymentTargetKind,
    pub target: Reference,
    pub elements: Vec<DeployedElement>,
    pub span: Span,
}

impl DeploymentDefinition {
    pub fn to_ref(&self) -> ElementRef {
        ElementRef::new(
            ElementKind::DeploymentDefinition,
            self.id,
            self.target.name.clone(),
        )
    }
}

/// Which kind of model element a nested deployment block refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeployedKind {
    Method,
    Attribute,
    Broadcast,
    Struct,
    Union,
    Enumeration,
    Array,
    Typedef,
    Map,
    InArgument,
    OutArgument,
    Field,
    Enumerator,
}

impl DeployedKind {
    pub fn display(&self) -> &'static str {
        match self {
            DeployedKind::Method => "Method",
            DeployedKind::Attribute => "Attribute",
            DeployedKind::Broadcast => "Broadcast",
            DeployedKind::Struct => "Struct",
            DeployedKind::Union => "Union",
            DeployedKind::Enumeration => "Enumeration",
            DeployedKind::Array => "Array",
            DeployedKind::Typedef => "Typedef",
            DeployedKind::Map => "Map",
            DeployedKind::InArgument => "In-argument",
            DeployedKind::OutArgument => "Out-argument",
            DeployedKind::Field => "Field",
            DeployedKind::Enumerator => "Enumerator",
        }
    }
}

/// A nested block naming one member of the deployed target.
#[derive(Clone, Debug)]
pub struct DeployedElement {
    pub id: ElementId,
    pub kind: DeployedKind,
    /// Name of the model element as written in the deployment.
    pub target: Reference,
    pub children: Vec<DeployedElement>,
    pub span: Span,
}

impl DeployedElement {
    pub fn to_ref(&self) -> ElementRef {
        ElementRef::new(ElementKind::DeployedElement, self.id, self.target.name.clone())
    }
}
