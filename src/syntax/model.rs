//! In-memory model of an interface-description document.
//!
//! Produced by [`crate::parser::parse_fidl`] and consumed read-only by the
//! validator. The normalizer is the only component that mutates it.

use std::path::PathBuf;

use smol_str::SmolStr;

use super::element::{Element, ElementId, ElementKind, ElementMut, ElementRef};
use crate::base::Span;

/// A parsed interface-description file.
#[derive(Clone, Debug, Default)]
pub struct Document {
    /// Absolute, normalized file identity.
    pub path: PathBuf,
    /// Dotted package name.
    pub package: SmolStr,
    pub imports: Vec<Import>,
    pub type_collections: Vec<TypeCollection>,
    pub interfaces: Vec<Interface>,
}

/// A reference from one document to another.
#[derive(Clone, Debug)]
pub struct Import {
    pub id: ElementId,
    /// URI as written, possibly relative.
    pub uri: String,
    /// Namespace filter such as `org.example.*`; `None` for `import model`.
    pub namespace: Option<SmolStr>,
    pub span: Span,
}

impl Import {
    pub fn to_ref(&self) -> ElementRef {
        ElementRef::new(ElementKind::Import, self.id, self.uri.as_str())
    }
}

/// A reference to another element by (possibly qualified) name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reference {
    pub name: SmolStr,
    pub span: Span,
}

impl Reference {
    pub fn new(name: impl Into<SmolStr>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }

    /// Last segment of a dotted name.
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(self.name.as_str())
    }
}

/// `version { major N minor M }`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

/// Named group of value-type declarations.
#[derive(Clone, Debug)]
pub struct TypeCollection {
    pub id: ElementId,
    pub name: SmolStr,
    pub version: Option<Version>,
    pub types: Vec<TypeDecl>,
    pub span: Span,
}

impl TypeCollection {
    /// The collection itself followed by its structs, enumerations and their members.
    pub fn elements(&self) -> Vec<Element<'_>> {
        let mut out = vec![Element::TypeCollection(self)];
        push_type_elements(&self.types, &mut out);
        out
    }
}

/// Type collection specialization with methods, attributes and broadcasts.
#[derive(Clone, Debug)]
pub struct Interface {
    pub id: ElementId,
    pub name: SmolStr,
    pub version: Option<Version>,
    pub base: Option<Reference>,
    pub manages: Vec<Reference>,
    pub attributes: Vec<Attribute>,
    pub methods: Vec<Method>,
    pub broadcasts: Vec<Broadcast>,
    pub types: Vec<TypeDecl>,
    pub span: Span,
}

impl Interface {
    /// The interface itself followed by every member in declaration order.
    pub fn elements(&self) -> Vec<Element<'_>> {
        let mut out = vec![Element::Interface(self)];
        out.extend(self.attributes.iter().map(Element::Attribute));
        for method in &self.methods {
            out.push(Element::Method(method));
            out.extend(method.in_args.iter().map(Element::Argument));
            out.extend(method.out_args.iter().map(Element::Argument));
        }
        for broadcast in &self.broadcasts {
            out.push(Element::Broadcast(broadcast));
            out.extend(broadcast.out_args.iter().map(Element::Argument));
        }
        push_type_elements(&self.types, &mut out);
        out
    }
}

/// Shared view of type collections and interfaces for container-level rules.
pub trait TypeContainer {
    fn id(&self) -> ElementId;
    fn name(&self) -> &str;
    fn types(&self) -> &[TypeDecl];
    fn span(&self) -> Span;
    fn element(&self) -> Element<'_>;
}

impl TypeContainer for TypeCollection {
    fn id(&self) -> ElementId {
        self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn types(&self) -> &[TypeDecl] {
        &self.types
    }
    fn span(&self) -> Span {
        self.span
    }
    fn element(&self) -> Element<'_> {
        Element::TypeCollection(self)
    }
}

impl TypeContainer for Interface {
    fn id(&self) -> ElementId {
        self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn types(&self) -> &[TypeDecl] {
        &self.types
    }
    fn span(&self) -> Span {
        self.span
    }
    fn element(&self) -> Element<'_> {
        Element::Interface(self)
    }
}

/// A user-defined type declared inside a container.
#[derive(Clone, Debug)]
pub enum TypeDecl {
    Struct(StructType),
    Union(StructType),
    Enumeration(EnumerationType),
    Typedef(TypedefType),
    Array(ArrayType),
    Map(MapType),
}

impl TypeDecl {
    pub fn id(&self) -> ElementId {
        match self {
            TypeDecl::Struct(t) | TypeDecl::Union(t) => t.id,
            TypeDecl::Enumeration(t) => t.id,
            TypeDecl::Typedef(t) => t.id,
            TypeDecl::Array(t) => t.id,
            TypeDecl::Map(t) => t.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            TypeDecl::Struct(t) | TypeDecl::Union(t) => &t.name,
            TypeDecl::Enumeration(t) => &t.name,
            TypeDecl::Typedef(t) => &t.name,
            TypeDecl::Array(t) => &t.name,
            TypeDecl::Map(t) => &t.name,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            TypeDecl::Struct(t) | TypeDecl::Union(t) => t.span,
            TypeDecl::Enumeration(t) => t.span,
            TypeDecl::Typedef(t) => t.span,
            TypeDecl::Array(t) => t.span,
            TypeDecl::Map(t) => t.span,
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            TypeDecl::Struct(_) => ElementKind::Struct,
            TypeDecl::Union(_) => ElementKind::Union,
            TypeDecl::Enumeration(_) => ElementKind::Enumeration,
            TypeDecl::Typedef(_) => ElementKind::Typedef,
            TypeDecl::Array(_) => ElementKind::Array,
            TypeDecl::Map(_) => ElementKind::Map,
        }
    }

    pub fn to_ref(&self) -> ElementRef {
        ElementRef::new(self.kind(), self.id(), self.name())
    }
}

#[derive(Clone, Debug)]
pub struct StructType {
    pub id: ElementId,
    pub name: SmolStr,
    pub base: Option<Reference>,
    pub fields: Vec<Field>,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct EnumerationType {
    pub id: ElementId,
    pub name: SmolStr,
    pub base: Option<Reference>,
    pub enumerators: Vec<Enumerator>,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct Enumerator {
    pub id: ElementId,
    pub name: SmolStr,
    /// Literal value exactly as written (quotes stripped).
    pub value: Option<LiteralValue>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LiteralValue {
    pub text: String,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct TypedefType {
    pub id: ElementId,
    pub name: SmolStr,
    pub actual: TypeRef,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct ArrayType {
    pub id: ElementId,
    pub name: SmolStr,
    pub element: TypeRef,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct MapType {
    pub id: ElementId,
    pub name: SmolStr,
    pub key: TypeRef,
    pub value: TypeRef,
    pub span: Span,
}

/// Built-in primitive types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Boolean,
    Float,
    Double,
    String,
    ByteBuffer,
}

impl Primitive {
    pub fn from_name(name: &str) -> Option<Self> {
        let primitive = match name {
            "Int8" => Primitive::Int8,
            "UInt8" => Primitive::UInt8,
            "Int16" => Primitive::Int16,
            "UInt16" => Primitive::UInt16,
            "Int32" => Primitive::Int32,
            "UInt32" => Primitive::UInt32,
            "Int64" => Primitive::Int64,
            "UInt64" => Primitive::UInt64,
            "Boolean" => Primitive::Boolean,
            "Float" => Primitive::Float,
            "Double" => Primitive::Double,
            "String" => Primitive::String,
            "ByteBuffer" => Primitive::ByteBuffer,
            _ => return None,
        };
        Some(primitive)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeRefKind {
    Predefined(Primitive),
    /// Reference to a user-defined type, possibly qualified.
    Derived(SmolStr),
}

/// Declared type of an argument, field, attribute or alias.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeRef {
    pub kind: TypeRefKind,
    /// `Type[]` shorthand.
    pub implicit_array: bool,
    pub span: Span,
}

impl TypeRef {
    pub fn derived_name(&self) -> Option<&str> {
        match &self.kind {
            TypeRefKind::Derived(name) => Some(name),
            TypeRefKind::Predefined(_) => None,
        }
    }
}

/// A name with a declared type: method/broadcast arguments and struct fields.
#[derive(Clone, Debug)]
pub struct TypedElement {
    pub id: ElementId,
    pub name: SmolStr,
    pub ty: TypeRef,
    pub span: Span,
}

pub type Argument = TypedElement;
pub type Field = TypedElement;

#[derive(Clone, Debug)]
pub struct Method {
    pub id: ElementId,
    pub name: SmolStr,
    pub in_args: Vec<Argument>,
    pub out_args: Vec<Argument>,
    pub fire_and_forget: bool,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct Attribute {
    pub id: ElementId,
    pub name: SmolStr,
    pub ty: TypeRef,
    pub readonly: bool,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct Broadcast {
    pub id: ElementId,
    pub name: SmolStr,
    pub out_args: Vec<Argument>,
    pub selective: bool,
    pub span: Span,
}

impl Document {
    /// Names of all top-level declarations, type collections first.
    pub fn top_level_names(&self) -> impl Iterator<Item = &str> {
        self.type_collections
            .iter()
            .map(|tc| tc.name.as_str())
            .chain(self.interfaces.iter().map(|i| i.name.as_str()))
    }

    pub fn interface(&self, name: &str) -> Option<&Interface> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    pub fn type_collection(&self, name: &str) -> Option<&TypeCollection> {
        self.type_collections.iter().find(|tc| tc.name == name)
    }

    /// Every element of the document in declaration order.
    pub fn elements(&self) -> Vec<Element<'_>> {
        let mut out = Vec::new();
        for tc in &self.type_collections {
            out.extend(tc.elements());
        }
        for iface in &self.interfaces {
            out.extend(iface.elements());
        }
        out
    }

    pub fn find(&self, id: ElementId) -> Option<Element<'_>> {
        self.elements().into_iter().find(|e| e.id() == id)
    }

    /// Locate an element for mutation.
    pub fn find_mut(&mut self, id: ElementId) -> Option<ElementMut<'_>> {
        for tc in &mut self.type_collections {
            if tc.id == id {
                return Some(ElementMut::TypeCollection(tc));
            }
            if let Some(found) = find_type_mut(&mut tc.types, id) {
                return Some(found);
            }
        }
        for iface in &mut self.interfaces {
            if iface.id == id {
                return Some(ElementMut::Interface(iface));
            }
            if let Some(found) = find_member_mut(iface, id) {
                return Some(found);
            }
        }
        None
    }
}

fn push_type_elements<'a>(types: &'a [TypeDecl], out: &mut Vec<Element<'a>>) {
    for decl in types {
        match decl {
            TypeDecl::Struct(s) | TypeDecl::Union(s) => {
                out.push(Element::Struct(s));
                out.extend(s.fields.iter().map(Element::Field));
            }
            TypeDecl::Enumeration(e) => {
                out.push(Element::Enumeration(e));
                out.extend(e.enumerators.iter().map(Element::Enumerator));
            }
            TypeDecl::Typedef(_) | TypeDecl::Array(_) | TypeDecl::Map(_) => {}
        }
    }
}

fn find_member_mut(iface: &mut Interface, id: ElementId) -> Option<ElementMut<'_>> {
    for attribute in &mut iface.attributes {
        if attribute.id == id {
            return Some(ElementMut::Attribute(attribute));
        }
    }
    for method in &mut iface.methods {
        if method.id == id {
            return Some(ElementMut::Method(method));
        }
        let args = method.in_args.iter_mut().chain(method.out_args.iter_mut());
        for arg in args {
            if arg.id == id {
                return Some(ElementMut::Argument(arg));
            }
        }
    }
    for broadcast in &mut iface.broadcasts {
        if broadcast.id == id {
            return Some(ElementMut::Broadcast(broadcast));
        }
        for arg in &mut broadcast.out_args {
            if arg.id == id {
                return Some(ElementMut::Argument(arg));
            }
        }
    }
    find_type_mut(&mut iface.types, id)
}

fn find_type_mut(types: &mut [TypeDecl], id: ElementId) -> Option<ElementMut<'_>> {
    for decl in types {
        match decl {
            TypeDecl::Struct(s) | TypeDecl::Union(s) => {
                if s.id == id {
                    return Some(ElementMut::Struct(s));
                }
                for field in &mut s.fields {
                    if field.id == id {
                        return Some(ElementMut::Field(field));
                    }
                }
            }
            TypeDecl::Enumeration(e) => {
                if e.id == id {
                    return Some(ElementMut::Enumeration(e));
                }
                for enumerator in &mut e.enumerators {
                    if enumerator.id == id {
                        return Some(ElementMut::Enumerator(enumerator));
                    }
                }
            }
            TypeDecl::Typedef(_) | TypeDecl::Array(_) | TypeDecl::Map(_) => {}
        }
    }
    None
}
