//! Structural and naming validation of one model document.
//!
//! ```text
//! Document ──► ImportGraph::seeded ──► resolve_transitive ──► ModelScope
//!                                                                │
//!        imports · import cycles · containers · members ◄────────┘
//!                                                                │
//!                                                      Vec<Diagnostic>
//! ```
//!
//! The validator never mutates the document and never stops early: every
//! problem found in model data becomes a diagnostic.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexSet;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use super::cycles::{
    ManagementCycle, ManagementEdge, find_import_cycle, find_management_cycles,
    render_import_trail,
};
use super::diagnostics::{Diagnostic, DiagnosticCollector, Feature, codes};
use super::identifiers::{NameCheck, check_name};
use super::import_graph::ImportGraph;
use super::literals::{LiteralProblem, check_enumerator_literal};
use super::scope::ModelScope;
use super::symbol_index::SymbolIndex;
use super::type_graph::{TypeGraph, TypeProblem};
use crate::base::{Span, normalize_path};
use crate::project::{DocumentLoader, LoadError, ValidatorOptions, resolve_import_uri};
use crate::syntax::{
    Document, Element, ElementRef, Import, Interface, TypeCollection, TypeContainer, TypeDecl,
    TypeRef, TypedElement,
};

// ============================================================================
// MODEL VALIDATOR
// ============================================================================

/// Read-only validator for model documents.
pub struct ModelValidator<'a> {
    index: &'a SymbolIndex,
    loader: &'a dyn DocumentLoader,
    options: &'a ValidatorOptions,
}

impl<'a> ModelValidator<'a> {
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

    /// Validate `document`, stored at `path`, against its import closure and
    /// the symbol index.
    pub fn validate(&self, document: &Document, path: &Path) -> Vec<Diagnostic> {
        let path = normalize_path(path);
        let mut graph = ImportGraph::seeded(&path, &document.imports);
        graph.resolve_transitive(self.loader);
        let scope = ModelScope::for_document(&path, document, &graph, self.loader);

        let index = self.options.check_cross_file_duplicates.then_some(self.index);
        let mut checker = ModelChecker::new(&path, &scope, index);
        checker.check_imports(&document.imports, self.loader);
        checker.check_import_cycles(&document.imports);
        for tc in &document.type_collections {
            checker.check_type_collection(document, tc);
        }
        for iface in &document.interfaces {
            checker.check_interface(document, iface);
        }

        let diagnostics = checker.finish();
        tracing::debug!(
            "validated {}: {} diagnostics ({} errors)",
            path.display(),
            diagnostics.len(),
            diagnostics.iter().filter(|d| d.is_error()).count()
        );
        diagnostics
    }
}

// ============================================================================
// CHECKER
// ============================================================================

/// Rule implementations shared by model and deployment validation.
///
/// All diagnostics are attached to `file`.
pub(crate) struct ModelChecker<'s> {
    file: &'s Path,
    scope: &'s ModelScope<'s>,
    types: TypeGraph<'s>,
    index: Option<&'s SymbolIndex>,
    collector: DiagnosticCollector,
}

impl<'s> ModelChecker<'s> {
    pub(crate) fn new(
        file: &'s Path,
        scope: &'s ModelScope<'s>,
        index: Option<&'s SymbolIndex>,
    ) -> Self {
        Self {
            file,
            scope,
            types: TypeGraph::new(scope),
            index,
            collector: DiagnosticCollector::new(),
        }
    }

    pub(crate) fn finish(self) -> Vec<Diagnostic> {
        self.collector.into_vec()
    }

    fn error(
        &self,
        element: ElementRef,
        message: impl Into<Arc<str>>,
        span: Span,
        code: &'static str,
        feature: Feature,
    ) -> Diagnostic {
        Diagnostic::error(self.file, element, message)
            .with_span(span)
            .with_code(code)
            .with_feature(feature)
    }

    fn push(&mut self, diagnostic: Diagnostic) {
        self.collector.add(diagnostic);
    }

    // ------------------------------------------------------------------------
    // Imports
    // ------------------------------------------------------------------------

    /// Self imports, unloadable targets and repeated imports.
    pub(crate) fn check_imports(&mut self, imports: &[Import], loader: &dyn DocumentLoader) {
        let mut self_import_reported = false;
        let mut seen: FxHashSet<(PathBuf, Option<SmolStr>)> = FxHashSet::default();

        for (index, import) in imports.iter().enumerate() {
            let Some(target) = resolve_import_uri(self.file, &import.uri) else {
                continue;
            };
            let file = self.file;
            let invalid = |code: &'static str, message: String| {
                Diagnostic::error(file, import.to_ref(), message)
                    .with_span(import.span)
                    .with_code(code)
                    .with_feature(Feature::ImportUri)
                    .with_index(index)
            };

            if target == self.file {
                if !self_import_reported {
                    self_import_reported = true;
                    let message = format!("File imports itself ('{}')", import.uri);
                    self.push(invalid(codes::INVALID_IMPORT, message));
                }
                continue;
            }

            if !seen.insert((target.clone(), import.namespace.clone())) {
                let what = match &import.namespace {
                    Some(namespace) => format!("'{namespace}' from '{}'", import.uri),
                    None => format!("'{}'", import.uri),
                };
                let message = format!("Duplicate import of {what}");
                self.push(invalid(codes::DUPLICATE_DEFINITION, message));
                continue;
            }

            if let Err(err) = loader.load(&target) {
                let message = match err {
                    LoadError::NotFound(_) => {
                        format!("Imported file '{}' does not exist", import.uri)
                    }
                    other => format!("Imported file '{}' cannot be loaded: {other}", import.uri),
                };
                self.push(invalid(codes::INVALID_IMPORT, message));
            }
        }
    }

    /// One diagnostic per import statement through which a cycle is entered.
    pub(crate) fn check_import_cycles(&mut self, imports: &[Import]) {
        let graph = self.scope.graph();
        for (index, import) in imports.iter().enumerate() {
            let Some(target) = resolve_import_uri(self.file, &import.uri) else {
                continue;
            };
            if target == self.file {
                continue;
            }
            if let Some(cycle) = find_import_cycle(graph, self.file, &target) {
                let message = format!("Cyclic imports: {}", render_import_trail(&cycle));
                let diagnostic = self.error(
                    import.to_ref(),
                    message,
                    import.span,
                    codes::CIRCULAR_DEPENDENCY,
                    Feature::ImportUri,
                );
                self.push(diagnostic.with_index(index));
            }
        }
    }

    // ------------------------------------------------------------------------
    // Containers
    // ------------------------------------------------------------------------

    pub(crate) fn check_type_collection(&mut self, document: &Document, tc: &TypeCollection) {
        self.check_top_level(document, tc);
        self.check_types(&tc.name, &tc.types);
        for element in tc.elements() {
            self.check_element(&tc.name, element);
        }
    }

    pub(crate) fn check_interface(&mut self, document: &Document, iface: &Interface) {
        self.check_top_level(document, iface);
        let element = iface.element().to_ref();

        if iface.version.is_none() {
            self.push(self.error(
                element.clone(),
                format!("Interface '{}' requires a version", iface.name),
                iface.span,
                codes::MISSING_REQUIRED,
                Feature::Version,
            ));
        }

        if let Some(base) = &iface.base {
            if self.scope.resolve_interface(self.file, &base.name).is_none() {
                self.push(self.error(
                    element.clone(),
                    format!("Base interface '{}' not found", base.name),
                    base.span,
                    codes::UNDEFINED_REFERENCE,
                    Feature::Base,
                ));
            }
        }

        let mut managed = IndexSet::new();
        for (index, reference) in iface.manages.iter().enumerate() {
            let key = match self.scope.resolve_interface(self.file, &reference.name) {
                Some(target) => format!("{}.{}", target.package, target.interface.name),
                None => {
                    let diagnostic = self.error(
                        element.clone(),
                        format!("Managed interface '{}' not found", reference.name),
                        reference.span,
                        codes::UNDEFINED_REFERENCE,
                        Feature::Manages,
                    );
                    self.push(diagnostic.with_index(index));
                    continue;
                }
            };
            if !managed.insert(key) {
                let diagnostic = self.error(
                    element.clone(),
                    format!("Interface '{}' is managed more than once", reference.name),
                    reference.span,
                    codes::DUPLICATE_DEFINITION,
                    Feature::Manages,
                );
                self.push(diagnostic.with_index(index));
            }
        }

        self.check_management_cycles(iface);
        self.check_unique(
            iface.attributes.iter().map(|a| (a.name.as_str(), a.span, Element::Attribute(a))),
            "Attribute",
            &iface.name,
        );
        self.check_types(&iface.name, &iface.types);
        for element in iface.elements() {
            self.check_element(&iface.name, element);
        }
    }

    /// One diagnostic per outgoing edge through which a cycle is entered.
    fn check_management_cycles(&mut self, iface: &Interface) {
        for cycle in find_management_cycles(self.scope, iface.id) {
            self.report_management_cycle(iface, &cycle);
        }
    }

    fn report_management_cycle(&mut self, iface: &Interface, cycle: &ManagementCycle) {
        let chain = cycle.render(self.scope);
        let message = if !cycle.closes_on_owner {
            format!("Management cycle detected: {chain}")
        } else if cycle
            .path
            .edges
            .iter()
            .all(|edge| *edge == ManagementEdge::Extends)
        {
            format!("Interface '{}' extends itself ({chain})", iface.name)
        } else {
            format!("Interface '{}' manages itself ({chain})", iface.name)
        };

        let element = iface.element().to_ref();
        let diagnostic = match cycle.first_edge() {
            Some(ManagementEdge::Manages(i)) => {
                let span = iface.manages.get(i).map_or(iface.span, |r| r.span);
                self.error(element, message, span, codes::CIRCULAR_DEPENDENCY, Feature::Manages)
                    .with_index(i)
            }
            _ => {
                let span = iface.base.as_ref().map_or(iface.span, |b| b.span);
                self.error(element, message, span, codes::CIRCULAR_DEPENDENCY, Feature::Base)
            }
        };
        self.push(diagnostic);
    }

    /// Naming and duplicate rules for a type collection or interface.
    fn check_top_level(&mut self, document: &Document, container: &dyn TypeContainer) {
        let element = container.element();
        let name = container.name();
        self.check_name(element.to_ref(), container.span());

        if document.top_level_names().filter(|n| *n == name).count() > 1 {
            self.push(self.error(
                element.to_ref(),
                format!("Name '{name}' is not unique in this file"),
                container.span(),
                codes::DUPLICATE_DEFINITION,
                Feature::Name,
            ));
        }

        let Some(index) = self.index else {
            return;
        };
        let graph = self.scope.graph();
        let others: Vec<_> = index
            .files_declaring(name, &document.package)
            .filter(|other| other.as_path() != self.file)
            .cloned()
            .collect();
        for other in others {
            let message = format!(
                "{} '{name}' has the same name and same package as a declaration in {}",
                element.kind().display(),
                other.display()
            );
            let diagnostic = if graph.transitively_imports(self.file, &other) {
                Diagnostic::error(self.file, element.to_ref(), message)
                    .with_code(codes::DUPLICATE_DEFINITION)
            } else {
                Diagnostic::warning(self.file, element.to_ref(), message)
                    .with_code(codes::DUPLICATE_ACROSS_FILES)
            };
            self.push(
                diagnostic
                    .with_span(container.span())
                    .with_feature(Feature::Name),
            );
        }
    }

    // ------------------------------------------------------------------------
    // Types and members
    // ------------------------------------------------------------------------

    /// Names, uniqueness and type references of the declarations in `container`.
    fn check_types(&mut self, container: &str, types: &[TypeDecl]) {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        for decl in types {
            self.check_name(decl.to_ref(), decl.span());
            if !seen.insert(decl.name()) {
                self.push(self.error(
                    decl.to_ref(),
                    format!("Type name '{}' is not unique in '{container}'", decl.name()),
                    decl.span(),
                    codes::DUPLICATE_DEFINITION,
                    Feature::Name,
                ));
            }

            match decl {
                TypeDecl::Struct(s) | TypeDecl::Union(s) => {
                    if let Some(base) = &s.base {
                        self.check_base(container, decl.to_ref(), &base.name, base.span);
                    }
                }
                TypeDecl::Enumeration(e) => {
                    if let Some(base) = &e.base {
                        self.check_base(container, decl.to_ref(), &base.name, base.span);
                    }
                }
                TypeDecl::Typedef(t) => self.check_type_ref(container, decl.to_ref(), &t.actual),
                TypeDecl::Array(a) => self.check_type_ref(container, decl.to_ref(), &a.element),
                TypeDecl::Map(m) => {
                    self.check_type_ref(container, decl.to_ref(), &m.key);
                    self.check_type_ref(container, decl.to_ref(), &m.value);
                }
            }
        }
    }

    /// Per-element rules. Container-level rules run separately.
    fn check_element(&mut self, container: &str, element: Element<'_>) {
        match element {
            Element::TypeCollection(_) | Element::Interface(_) => {}
            Element::Struct(s) => {
                self.check_unique(
                    s.fields.iter().map(|f| (f.name.as_str(), f.span, Element::Field(f))),
                    "Field",
                    &s.name,
                );
            }
            Element::Enumeration(e) => {
                self.check_unique(
                    e.enumerators
                        .iter()
                        .map(|en| (en.name.as_str(), en.span, Element::Enumerator(en))),
                    "Enumerator",
                    &e.name,
                );
            }
            Element::Method(m) => {
                self.check_name(element.to_ref(), m.span);
                self.check_arguments(&m.in_args, &m.name);
                self.check_arguments(&m.out_args, &m.name);
            }
            Element::Broadcast(b) => {
                self.check_name(element.to_ref(), b.span);
                self.check_arguments(&b.out_args, &b.name);
            }
            Element::Attribute(a) => {
                self.check_name(element.to_ref(), a.span);
                self.check_type_ref(container, element.to_ref(), &a.ty);
            }
            Element::Argument(t) | Element::Field(t) => {
                self.check_name(element.to_ref(), t.span);
                self.check_type_ref(container, element.to_ref(), &t.ty);
            }
            Element::Enumerator(en) => {
                self.check_name(element.to_ref(), en.span);
                if let Some(value) = &en.value {
                    if let Some(problem) = check_enumerator_literal(&value.text) {
                        let message = match problem {
                            LiteralProblem::Missing => {
                                format!("Enumerator '{}' has a missing value", en.name)
                            }
                            other => format!(
                                "Value '{}' of enumerator '{}' {other}",
                                value.text, en.name
                            ),
                        };
                        self.push(
                            Diagnostic::warning(self.file, element.to_ref(), message)
                                .with_span(value.span)
                                .with_code(codes::INVALID_LITERAL)
                                .with_feature(Feature::Value),
                        );
                    }
                }
            }
        }
    }

    fn check_arguments(&mut self, args: &[TypedElement], owner: &str) {
        self.check_unique(
            args.iter().map(|a| (a.name.as_str(), a.span, Element::Argument(a))),
            "Argument",
            owner,
        );
    }

    /// Report every repeat of a name among siblings.
    fn check_unique<'e>(
        &mut self,
        items: impl Iterator<Item = (&'e str, Span, Element<'e>)>,
        what: &str,
        owner: &str,
    ) {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        for (name, span, element) in items {
            if !seen.insert(name) {
                self.push(self.error(
                    element.to_ref(),
                    format!("{what} name '{name}' is not unique in '{owner}'"),
                    span,
                    codes::DUPLICATE_DEFINITION,
                    Feature::Name,
                ));
            }
        }
    }

    fn check_name(&mut self, element: ElementRef, span: Span) {
        if check_name(element.kind, &element.name) == NameCheck::Keyword {
            let message = format!(
                "{} name '{}' is a reserved keyword",
                element.kind.display(),
                element.name
            );
            self.push(self.error(element, message, span, codes::RESERVED_KEYWORD, Feature::Name));
        }
    }

    fn check_base(&mut self, container: &str, element: ElementRef, name: &str, span: Span) {
        if let Some(problem) = self.types.check_name(self.file, container, name) {
            let message = format!(
                "{} '{}' {}",
                element.kind.display(),
                element.name,
                problem.message()
            );
            self.push(self.error(element, message, span, problem_code(&problem), Feature::Base));
        }
    }

    fn check_type_ref(&mut self, container: &str, element: ElementRef, ty: &TypeRef) {
        if let Some(problem) = self.types.check(self.file, container, ty) {
            let message = format!(
                "{} '{}' {}",
                element.kind.display(),
                element.name,
                problem.message()
            );
            self.push(self.error(element, message, ty.span, problem_code(&problem), Feature::Type));
        }
    }
}

fn problem_code(problem: &TypeProblem) -> &'static str {
    match problem {
        TypeProblem::Undefined(_) => codes::UNDEFINED_REFERENCE,
        TypeProblem::Recursive(_) => codes::CIRCULAR_DEPENDENCY,
    }
}
