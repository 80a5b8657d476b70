//! Element identities and the closed element sum type.
//!
//! Every nameable model element carries an [`ElementId`] assigned at parse
//! time. Validation rules match exhaustively over [`Element`], and
//! diagnostics point back at elements through an [`ElementRef`].

use std::fmt;

use smol_str::SmolStr;
use uuid::Uuid;

use super::model::{
    Attribute, Broadcast, EnumerationType, Enumerator, Interface, Method, StructType,
    TypeCollection, TypedElement,
};
use crate::base::Span;

/// Stable identity of one model element for the lifetime of its document.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Generate a fresh identity.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementId({})", self.0.simple())
    }
}

/// What kind of element a diagnostic or reference points at.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Document,
    Import,
    TypeCollection,
    Interface,
    Struct,
    Union,
    Enumeration,
    Typedef,
    Array,
    Map,
    Method,
    Attribute,
    Broadcast,
    Argument,
    Field,
    Enumerator,
    DeploymentDefinition,
    DeployedElement,
}

impl ElementKind {
    /// Human-readable name used in diagnostic messages.
    pub fn display(&self) -> &'static str {
        match self {
            ElementKind::Document => "document",
            ElementKind::Import => "import",
            ElementKind::TypeCollection => "Type collection",
            ElementKind::Interface => "Interface",
            ElementKind::Struct => "Struct",
            ElementKind::Union => "Union",
            ElementKind::Enumeration => "Enumeration",
            ElementKind::Typedef => "Typedef",
            ElementKind::Array => "Array",
            ElementKind::Map => "Map",
            ElementKind::Method => "Method",
            ElementKind::Attribute => "Attribute",
            ElementKind::Broadcast => "Broadcast",
            ElementKind::Argument => "Argument",
            ElementKind::Field => "Field",
            ElementKind::Enumerator => "Enumerator",
            ElementKind::DeploymentDefinition => "Deployment definition",
            ElementKind::DeployedElement => "Deployed element",
        }
    }
}

/// Opaque pointer back at the element a diagnostic is about.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ElementRef {
    pub kind: ElementKind,
    pub id: ElementId,
    pub name: SmolStr,
}

impl ElementRef {
    pub fn new(kind: ElementKind, id: ElementId, name: impl Into<SmolStr>) -> Self {
        Self {
            kind,
            id,
            name: name.into(),
        }
    }
}

/// Borrowed view over every element kind a validation rule can visit.
#[derive(Clone, Copy, Debug)]
pub enum Element<'a> {
    TypeCollection(&'a TypeCollection),
    Interface(&'a Interface),
    Struct(&'a StructType),
    Enumeration(&'a EnumerationType),
    Method(&'a Method),
    Attribute(&'a Attribute),
    Broadcast(&'a Broadcast),
    Argument(&'a TypedElement),
    Field(&'a TypedElement),
    Enumerator(&'a Enumerator),
}

impl<'a> Element<'a> {
    pub fn id(&self) -> ElementId {
        match self {
            Element::TypeCollection(e) => e.id,
            Element::Interface(e) => e.id,
            Element::Struct(e) => e.id,
            Element::Enumeration(e) => e.id,
            Element::Method(e) => e.id,
            Element::Attribute(e) => e.id,
            Element::Broadcast(e) => e.id,
            Element::Argument(e) | Element::Field(e) => e.id,
            Element::Enumerator(e) => e.id,
        }
    }

    pub fn name(&self) -> &'a str {
        match self {
            Element::TypeCollection(e) => &e.name,
            Element::Interface(e) => &e.name,
            Element::Struct(e) => &e.name,
            Element::Enumeration(e) => &e.name,
            Element::Method(e) => &e.name,
            Element::Attribute(e) => &e.name,
            Element::Broadcast(e) => &e.name,
            Element::Argument(e) | Element::Field(e) => &e.name,
            Element::Enumerator(e) => &e.name,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Element::TypeCollection(e) => e.span,
            Element::Interface(e) => e.span,
            Element::Struct(e) => e.span,
            Element::Enumeration(e) => e.span,
            Element::Method(e) => e.span,
            Element::Attribute(e) => e.span,
            Element::Broadcast(e) => e.span,
            Element::Argument(e) | Element::Field(e) => e.span,
            Element::Enumerator(e) => e.span,
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Element::TypeCollection(_) => ElementKind::TypeCollection,
            Element::Interface(_) => ElementKind::Interface,
            Element::Struct(_) => ElementKind::Struct,
            Element::Enumeration(_) => ElementKind::Enumeration,
            Element::Method(_) => ElementKind::Method,
            Element::Attribute(_) => ElementKind::Attribute,
            Element::Broadcast(_) => ElementKind::Broadcast,
            Element::Argument(_) => ElementKind::Argument,
            Element::Field(_) => ElementKind::Field,
            Element::Enumerator(_) => ElementKind::Enumerator,
        }
    }

    pub fn to_ref(&self) -> ElementRef {
        ElementRef::new(self.kind(), self.id(), self.name())
    }
}

/// Mutable counterpart of [`Element`], used by the renaming pass.
#[derive(Debug)]
pub enum ElementMut<'a> {
    TypeCollection(&'a mut TypeCollection),
    Interface(&'a mut Interface),
    Struct(&'a mut StructType),
    Enumeration(&'a mut EnumerationType),
    Method(&'a mut Method),
    Attribute(&'a mut Attribute),
    Broadcast(&'a mut Broadcast),
    Argument(&'a mut TypedElement),
    Field(&'a mut TypedElement),
    Enumerator(&'a mut Enumerator),
}

impl ElementMut<'_> {
    pub fn name(&self) -> &str {
        match self {
            ElementMut::TypeCollection(e) => &e.name,
            ElementMut::Interface(e) => &e.name,
            ElementMut::Struct(e) => &e.name,
            ElementMut::Enumeration(e) => &e.name,
            ElementMut::Method(e) => &e.name,
            ElementMut::Attribute(e) => &e.name,
            ElementMut::Broadcast(e) => &e.name,
            ElementMut::Argument(e) | ElementMut::Field(e) => &e.name,
            ElementMut::Enumerator(e) => &e.name,
        }
    }

    pub fn set_name(&mut self, name: SmolStr) {
        match self {
            ElementMut::TypeCollection(e) => e.name = name,
            ElementMut::Interface(e) => e.name = name,
            ElementMut::Struct(e) => e.name = name,
            ElementMut::Enumeration(e) => e.name = name,
            ElementMut::Method(e) => e.name = name,
            ElementMut::Attribute(e) => e.name = name,
            ElementMut::Broadcast(e) => e.name = name,
            ElementMut::Argument(e) | ElementMut::Field(e) => e.name = name,
            ElementMut::Enumerator(e) => e.name = name,
        }
    }
}
