//! Document model for interface-description and deployment files.
//!
//! These are plain data types. Parsing lives in [`crate::parser`], analysis
//! in [`crate::hir`].

pub mod deployment;
pub mod element;
pub mod file;
pub mod model;

pub use deployment::{
    DeployedElement, DeployedKind, DeploymentDefinition, DeploymentDocument, DeploymentTargetKind,
};
pub use element::{Element, ElementId, ElementKind, ElementMut, ElementRef};
pub use file::{FileExtension, SyntaxFile};
pub use model::{
    Argument, ArrayType, Attribute, Broadcast, Document, EnumerationType, Enumerator, Field,
    Import, Interface, LiteralValue, MapType, Method, Primitive, Reference, StructType,
    TypeCollection, TypeContainer, TypeDecl, TypeRef, TypeRefKind, TypedElement, TypedefType,
    Version,
};

pub use crate::base::{Position, Span};
