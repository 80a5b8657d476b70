//! Structural recursion in value types.
//!
//! A struct that contains itself by value (directly, through other structs,
//! through a base type, or through a typedef) has no finite layout. Arrays,
//! `Type[]` and maps hold their elements indirectly and break recursion.

use std::path::Path;

use super::cycles::find_cycle;
use super::scope::{ModelScope, TypeHandle};
use crate::syntax::{ElementId, TypeDecl, TypeRef};

/// What is wrong with a derived type reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeProblem {
    /// The name does not resolve.
    Undefined(String),
    /// The referenced type reaches itself by value. `chain` lists type names.
    Recursive(Vec<String>),
}

impl TypeProblem {
    pub fn message(&self) -> String {
        match self {
            TypeProblem::Undefined(name) => format!("derives from an undefined type '{name}'"),
            TypeProblem::Recursive(chain) => {
                format!("has a type with a recursive definition: {}", chain.join(" -> "))
            }
        }
    }
}

pub struct TypeGraph<'s> {
    scope: &'s ModelScope<'s>,
}

impl<'s> TypeGraph<'s> {
    pub fn new(scope: &'s ModelScope<'s>) -> Self {
        Self { scope }
    }

    /// Check a type reference written inside `container` of `file`.
    ///
    /// Predefined types are always fine.
    pub fn check(&self, file: &Path, container: &str, ty: &TypeRef) -> Option<TypeProblem> {
        let name = ty.derived_name()?;
        self.check_name(file, container, name)
    }

    /// Check a derived type name written inside `container` of `file`.
    pub fn check_name(&self, file: &Path, container: &str, name: &str) -> Option<TypeProblem> {
        let Some(target) = self.scope.resolve_type(file, container, name) else {
            return Some(TypeProblem::Undefined(name.to_string()));
        };
        let root = target.decl.id();
        let first = self.by_value_edges(target);
        let cycle = find_cycle(root, first, |id| {
            self.scope
                .type_by_id(*id)
                .map(|handle| self.by_value_edges(handle))
                .unwrap_or_default()
        })?;

        let chain = cycle
            .nodes
            .iter()
            .map(|id| {
                self.scope
                    .type_by_id(*id)
                    .map(|h| h.decl.name().to_string())
                    .unwrap_or_default()
            })
            .collect();
        Some(TypeProblem::Recursive(chain))
    }

    /// Types held by value by `handle`. Unresolvable names are skipped;
    /// they are reported where they are written.
    fn by_value_edges(&self, handle: TypeHandle<'_>) -> Vec<((), ElementId)> {
        fn by_value(ty: &TypeRef) -> Option<&str> {
            if ty.implicit_array {
                None
            } else {
                ty.derived_name()
            }
        }

        let mut names: Vec<&str> = Vec::new();

        match handle.decl {
            TypeDecl::Struct(s) | TypeDecl::Union(s) => {
                names.extend(s.base.as_ref().map(|b| b.name.as_str()));
                names.extend(s.fields.iter().filter_map(|f| by_value(&f.ty)));
            }
            TypeDecl::Enumeration(e) => {
                names.extend(e.base.as_ref().map(|b| b.name.as_str()));
            }
            TypeDecl::Typedef(t) => names.extend(by_value(&t.actual)),
            TypeDecl::Array(_) | TypeDecl::Map(_) => {}
        }

        names
            .into_iter()
            .filter_map(|name| self.scope.resolve_type(handle.file, handle.container, name))
            .map(|target| ((), target.decl.id()))
            .collect()
    }
}
