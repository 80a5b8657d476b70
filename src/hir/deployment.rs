//! Deployment cross-validation.
//!
//! A deployment document owns no model elements. Each `define` names a
//! target interface or type collection in the deployment's import closure,
//! and nested blocks name members of that target. This module links those
//! names to model elements and runs the model rules on every deployed
//! container, reporting the results against the deployment.

use std::path::Path;

use rustc_hash::FxHashSet;

use super::diagnostics::{Diagnostic, Feature, codes};
use super::import_graph::ImportGraph;
use super::scope::ModelScope;
use super::symbol_index::SymbolIndex;
use super::validate::ModelChecker;
use crate::base::normalize_path;
use crate::project::{DocumentLoader, ValidatorOptions};
use crate::syntax::{
    DeployedElement, DeployedKind, DeploymentDefinition, DeploymentDocument,
    DeploymentTargetKind, Document, Element, ElementId, Interface, TypeCollection, TypeDecl,
};

// ============================================================================
// RESOLUTION
// ============================================================================

/// The model container a definition deploys.
#[derive(Clone, Copy, Debug)]
pub enum DeployedContainer<'m> {
    Interface(&'m Interface),
    TypeCollection(&'m TypeCollection),
}

impl<'m> DeployedContainer<'m> {
    pub fn id(&self) -> ElementId {
        match self {
            DeployedContainer::Interface(i) => i.id,
            DeployedContainer::TypeCollection(tc) => tc.id,
        }
    }

    pub fn name(&self) -> &'m str {
        match self {
            DeployedContainer::Interface(i) => &i.name,
            DeployedContainer::TypeCollection(tc) => &tc.name,
        }
    }

    fn types(&self) -> &'m [TypeDecl] {
        match self {
            DeployedContainer::Interface(i) => &i.types,
            DeployedContainer::TypeCollection(tc) => &tc.types,
        }
    }
}

/// A model element named by a deployed element.
#[derive(Clone, Copy, Debug)]
pub enum ResolvedMember<'m> {
    Element(Element<'m>),
    /// Typedefs, arrays and maps, which have no nested members.
    Type(&'m TypeDecl),
}

impl ResolvedMember<'_> {
    pub fn id(&self) -> ElementId {
        match self {
            ResolvedMember::Element(element) => element.id(),
            ResolvedMember::Type(decl) => decl.id(),
        }
    }
}

/// Find the member of `container` (or of `parent` inside it) that
/// `deployed` names.
///
/// `same_name(id, current, written)` decides whether a model element with
/// identity `id` and name `current` is the one written in the deployment.
pub fn find_member<'m>(
    container: DeployedContainer<'m>,
    parent: Option<ResolvedMember<'m>>,
    deployed: &DeployedElement,
    same_name: &dyn Fn(ElementId, &str, &str) -> bool,
) -> Option<ResolvedMember<'m>> {
    let written = deployed.target.simple_name();
    let hit = |id: ElementId, current: &str| same_name(id, current, written);
    let arg = |args: &'m [crate::syntax::TypedElement]| {
        args.iter()
            .find(|a| hit(a.id, &a.name))
            .map(|a| ResolvedMember::Element(Element::Argument(a)))
    };

    match (parent, deployed.kind) {
        (None, DeployedKind::Method) => match container {
            DeployedContainer::Interface(i) => i
                .methods
                .iter()
                .find(|m| hit(m.id, &m.name))
                .map(|m| ResolvedMember::Element(Element::Method(m))),
            DeployedContainer::TypeCollection(_) => None,
        },
        (None, DeployedKind::Attribute) => match container {
            DeployedContainer::Interface(i) => i
                .attributes
                .iter()
                .find(|a| hit(a.id, &a.name))
                .map(|a| ResolvedMember::Element(Element::Attribute(a))),
            DeployedContainer::TypeCollection(_) => None,
        },
        (None, DeployedKind::Broadcast) => match container {
            DeployedContainer::Interface(i) => i
                .broadcasts
                .iter()
                .find(|b| hit(b.id, &b.name))
                .map(|b| ResolvedMember::Element(Element::Broadcast(b))),
            DeployedContainer::TypeCollection(_) => None,
        },
        (None, kind) => container
            .types()
            .iter()
            .find(|decl| declares(decl, kind) && hit(decl.id(), decl.name()))
            .map(|decl| match decl {
                TypeDecl::Struct(s) | TypeDecl::Union(s) => {
                    ResolvedMember::Element(Element::Struct(s))
                }
                TypeDecl::Enumeration(e) => ResolvedMember::Element(Element::Enumeration(e)),
                other => ResolvedMember::Type(other),
            }),
        (Some(ResolvedMember::Element(Element::Method(m))), DeployedKind::InArgument) => {
            arg(&m.in_args)
        }
        (Some(ResolvedMember::Element(Element::Method(m))), DeployedKind::OutArgument) => {
            arg(&m.out_args)
        }
        (Some(ResolvedMember::Element(Element::Broadcast(b))), DeployedKind::OutArgument) => {
            arg(&b.out_args)
        }
        (Some(ResolvedMember::Element(Element::Struct(s))), DeployedKind::Field) => s
            .fields
            .iter()
            .find(|f| hit(f.id, &f.name))
            .map(|f| ResolvedMember::Element(Element::Field(f))),
        (Some(ResolvedMember::Element(Element::Enumeration(e))), DeployedKind::Enumerator) => e
            .enumerators
            .iter()
            .find(|en| hit(en.id, &en.name))
            .map(|en| ResolvedMember::Element(Element::Enumerator(en))),
        (Some(_), _) => None,
    }
}

/// Whether a top-level deployment block of `kind` can name `decl`.
fn declares(decl: &TypeDecl, kind: DeployedKind) -> bool {
    matches!(
        (decl, kind),
        (TypeDecl::Struct(_), DeployedKind::Struct)
            | (TypeDecl::Union(_), DeployedKind::Union)
            | (TypeDecl::Enumeration(_), DeployedKind::Enumeration)
            | (TypeDecl::Typedef(_), DeployedKind::Typedef)
            | (TypeDecl::Array(_), DeployedKind::Array)
            | (TypeDecl::Map(_), DeployedKind::Map)
    )
}

/// Where a definition's target lives.
#[derive(Clone, Copy, Debug)]
pub struct ResolvedTarget<'s> {
    pub file: &'s Path,
    pub document: &'s Document,
    pub container: DeployedContainer<'s>,
}

/// One definition with its target and nested references resolved.
#[derive(Debug)]
pub struct ResolvedDefinition<'d, 's> {
    pub definition: &'d DeploymentDefinition,
    pub target: Option<ResolvedTarget<'s>>,
    /// Every nested element in document order. Children of an unresolved
    /// element are left out.
    pub members: Vec<(&'d DeployedElement, Option<ResolvedMember<'s>>)>,
}

/// Resolve every definition of `deployment` within `scope`.
pub fn resolve_deployment<'d, 's>(
    deployment: &'d DeploymentDocument,
    scope: &'s ModelScope<'s>,
) -> Vec<ResolvedDefinition<'d, 's>> {
    let from = normalize_path(&deployment.path);
    deployment
        .definitions
        .iter()
        .map(|definition| resolve_definition(&from, definition, scope))
        .collect()
}

fn resolve_definition<'d, 's>(
    from: &Path,
    definition: &'d DeploymentDefinition,
    scope: &'s ModelScope<'s>,
) -> ResolvedDefinition<'d, 's> {
    let name = &definition.target.name;
    let target = match definition.target_kind {
        DeploymentTargetKind::Interface => scope.resolve_interface(from, name).map(|h| {
            (h.file, DeployedContainer::Interface(h.interface))
        }),
        DeploymentTargetKind::TypeCollection => scope
            .resolve_type_collection(from, name)
            .map(|h| (h.file, DeployedContainer::TypeCollection(h.type_collection))),
    }
    .and_then(|(file, container)| {
        Some(ResolvedTarget {
            file,
            document: scope.document(file)?,
            container,
        })
    });

    let mut members = Vec::new();
    if let Some(target) = &target {
        let same_name = |_: ElementId, current: &str, written: &str| current == written;
        collect_members(target.container, None, &definition.elements, &same_name, &mut members);
    }
    ResolvedDefinition {
        definition,
        target,
        members,
    }
}

fn collect_members<'d, 's>(
    container: DeployedContainer<'s>,
    parent: Option<ResolvedMember<'s>>,
    elements: &'d [DeployedElement],
    same_name: &dyn Fn(ElementId, &str, &str) -> bool,
    out: &mut Vec<(&'d DeployedElement, Option<ResolvedMember<'s>>)>,
) {
    for element in elements {
        let member = find_member(container, parent, element, same_name);
        out.push((element, member));
        if member.is_some() {
            collect_members(container, member, &element.children, same_name, out);
        }
    }
}

// ============================================================================
// VALIDATOR
// ============================================================================

/// Validator for deployment documents.
pub struct DeploymentValidator<'a> {
    index: &'a SymbolIndex,
    loader: &'a dyn DocumentLoader,
    options: &'a ValidatorOptions,
}

impl<'a> DeploymentValidator<'a> {
    pub fn new(
        index: &'a SymbolIndex,
        loader: &'a dyn DocumentLoader,
        options: &'a ValidatorOptions,
    ) -> Self {
        Self {
            index,
            loader,
            options,
        }
    }

    pub fn validate(&self, deployment: &DeploymentDocument, path: &Path) -> Vec<Diagnostic> {
        let path = normalize_path(path);
        let mut graph = ImportGraph::seeded(&path, &deployment.imports);
        graph.resolve_transitive(self.loader);
        let scope = ModelScope::for_graph(&graph, self.loader);
        let index = self.options.check_cross_file_duplicates.then_some(self.index);

        let mut checker = ModelChecker::new(&path, &scope, None);
        checker.check_imports(&deployment.imports, self.loader);
        checker.check_import_cycles(&deployment.imports);
        let mut diagnostics = checker.finish();

        let mut deployed: FxHashSet<ElementId> = FxHashSet::default();
        for resolved in resolve_deployment(deployment, &scope) {
            let definition = resolved.definition;
            let Some(target) = resolved.target else {
                diagnostics.push(
                    Diagnostic::error(
                        &path,
                        definition.to_ref(),
                        format!(
                            "{} '{}' not found",
                            definition.target_kind.display(),
                            definition.target.name
                        ),
                    )
                    .with_span(definition.target.span)
                    .with_code(codes::UNDEFINED_REFERENCE)
                    .with_feature(Feature::Target),
                );
                continue;
            };

            let first = deployed.insert(target.container.id());
            if !first {
                diagnostics.push(
                    Diagnostic::error(
                        &path,
                        definition.to_ref(),
                        format!(
                            "{} '{}' is deployed more than once in this file",
                            definition.target_kind.display(),
                            definition.target.name
                        ),
                    )
                    .with_span(definition.target.span)
                    .with_code(codes::DUPLICATE_DEFINITION)
                    .with_feature(Feature::Target),
                );
            }

            for (element, member) in &resolved.members {
                if member.is_none() {
                    diagnostics.push(
                        Diagnostic::error(
                            &path,
                            element.to_ref(),
                            format!(
                                "{} '{}' not found in '{}'",
                                element.kind.display(),
                                element.target.name,
                                target.container.name()
                            ),
                        )
                        .with_span(element.target.span)
                        .with_code(codes::UNDEFINED_REFERENCE)
                        .with_feature(Feature::Target),
                    );
                }
            }

            if !first {
                continue;
            }
            let mut container = ModelChecker::new(target.file, &scope, index);
            match target.container {
                DeployedContainer::Interface(iface) => {
                    container.check_interface(target.document, iface)
                }
                DeployedContainer::TypeCollection(tc) => {
                    container.check_type_collection(target.document, tc)
                }
            }
            diagnostics.extend(
                container
                    .finish()
                    .into_iter()
                    .map(|d| d.rehome(&path, definition.span)),
            );
        }

        tracing::debug!(
            "validated deployment {}: {} definitions, {} diagnostics",
            path.display(),
            deployment.definitions.len(),
            diagnostics.len()
        );
        diagnostics
    }
}
