//! Identifier normalization.
//!
//! The only pass that mutates a model. It renames elements whose names would
//! make generated code fail to compile:
//!
//! 1. An out-argument named like an in-argument of the same method gets a
//!    trailing separator (`value` → `value_`).
//! 2. An enumerator named like its enumeration gets a trailing separator.
//! 3. Arguments, fields, attributes and enumerators named after a reserved
//!    word get that word's substitute (`new` → `new_`).
//! 4. An out-argument that still equals an in-argument after step 3 gets one
//!    more separator.
//!
//! Step 1 compares the names as they were before the pass, and step 3 sees
//! the names produced by steps 1 and 2. Every rename is recorded in a
//! [`RenameLedger`] and never applied twice to the same element, so running
//! the pass again (or reaching an element through a deployment) is a no-op.

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

use super::deployment::{DeployedContainer, ResolvedMember, find_member};
use super::identifiers::reserved_substitute;
use super::scope::names_match;
use crate::base::constants::RENAME_SEPARATOR;
use crate::syntax::{
    DeployedElement, DeploymentDocument, DeploymentTargetKind, Document, ElementId,
    EnumerationType, Interface, Method, TypeDecl, TypedElement,
};

/// Why an element was renamed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenameRule {
    /// Out-argument shares its name with an in-argument.
    InOutCollision,
    /// Enumerator shares its name with its enumeration.
    EnumerationName,
    /// Name is a reserved word.
    ReservedWord,
    /// Out-argument equals an in-argument after reserved-word substitution.
    ReservedCollision,
}

/// One applied rename.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rename {
    pub id: ElementId,
    pub rule: RenameRule,
    pub from: SmolStr,
    pub to: SmolStr,
}

/// Every rename applied during one validation run.
#[derive(Clone, Debug, Default)]
pub struct RenameLedger {
    applied: FxHashSet<(ElementId, RenameRule)>,
    original: FxHashMap<ElementId, SmolStr>,
    history: Vec<Rename>,
}

impl RenameLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: ElementId, rule: RenameRule) -> bool {
        self.applied.contains(&(id, rule))
    }

    /// The name `id` had before its first rename.
    pub fn original_name(&self, id: ElementId) -> Option<&str> {
        self.original.get(&id).map(SmolStr::as_str)
    }

    pub fn is_renamed(&self, id: ElementId) -> bool {
        self.original.contains_key(&id)
    }

    /// Renames in the order they were applied.
    pub fn history(&self) -> &[Rename] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Apply `rule` to `name` unless it was applied to `id` before.
    fn apply(&mut self, id: ElementId, rule: RenameRule, name: &mut SmolStr, to: SmolStr) -> bool {
        if *name == to || !self.applied.insert((id, rule)) {
            return false;
        }
        self.original.entry(id).or_insert_with(|| name.clone());
        self.history.push(Rename {
            id,
            rule,
            from: name.clone(),
            to: to.clone(),
        });
        *name = to;
        true
    }
}

fn suffixed(name: &str) -> SmolStr {
    let mut out = String::with_capacity(name.len() + 1);
    out.push_str(name);
    out.push(RENAME_SEPARATOR);
    SmolStr::from(out)
}

/// Renaming pass with a ledger scoped to one validation run.
#[derive(Debug, Default)]
pub struct Normalizer {
    ledger: RenameLedger,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ledger(&self) -> &RenameLedger {
        &self.ledger
    }

    pub fn into_ledger(self) -> RenameLedger {
        self.ledger
    }

    /// Normalize every element of `document`. Returns the number of renames.
    pub fn normalize(&mut self, document: &mut Document) -> usize {
        let renamed = self.normalize_selected(document, None);
        if renamed > 0 {
            tracing::debug!(
                "normalized {}: {renamed} renames",
                document.path.display()
            );
        }
        renamed
    }

    /// Normalize the elements of `model` that `deployment` refers to, then
    /// point the deployment's references at the new names.
    ///
    /// Elements already renamed through the model (or another deployment)
    /// are not renamed again. Returns the number of renames applied to
    /// `model`.
    pub fn normalize_deployment(
        &mut self,
        deployment: &mut DeploymentDocument,
        model: &mut Document,
    ) -> usize {
        let links = self.link_deployment(deployment, model);
        if links.is_empty() {
            return 0;
        }
        let selected: FxHashSet<ElementId> = links.values().copied().collect();
        let renamed = self.normalize_selected(model, Some(&selected));

        let names: FxHashMap<ElementId, SmolStr> = model
            .elements()
            .into_iter()
            .filter(|e| selected.contains(&e.id()))
            .map(|e| (e.id(), SmolStr::from(e.name())))
            .collect();
        for definition in &mut deployment.definitions {
            retarget(&mut definition.elements, &links, &names);
        }

        tracing::debug!(
            "normalized {} through {}: {renamed} renames",
            model.path.display(),
            deployment.path.display()
        );
        renamed
    }

    /// Deployed element id → model element id, for members of `model`.
    fn link_deployment(
        &self,
        deployment: &DeploymentDocument,
        model: &Document,
    ) -> IndexMap<ElementId, ElementId> {
        let same_name = |id: ElementId, current: &str, written: &str| {
            current == written || self.ledger.original_name(id) == Some(written)
        };

        let mut links = IndexMap::new();
        for definition in &deployment.definitions {
            let target = &definition.target.name;
            let container = match definition.target_kind {
                DeploymentTargetKind::Interface => model
                    .interfaces
                    .iter()
                    .find(|i| names_match(target, &model.package, &i.name))
                    .map(DeployedContainer::Interface),
                DeploymentTargetKind::TypeCollection => model
                    .type_collections
                    .iter()
                    .find(|tc| names_match(target, &model.package, &tc.name))
                    .map(DeployedContainer::TypeCollection),
            };
            if let Some(container) = container {
                link_members(container, None, &definition.elements, &same_name, &mut links);
            }
        }
        links
    }

    fn normalize_selected(
        &mut self,
        document: &mut Document,
        only: Option<&FxHashSet<ElementId>>,
    ) -> usize {
        let before = self.ledger.len();
        for tc in &mut document.type_collections {
            self.normalize_types(&mut tc.types, only);
        }
        for iface in &mut document.interfaces {
            self.normalize_interface(iface, only);
        }
        self.ledger.len() - before
    }

    fn normalize_interface(&mut self, iface: &mut Interface, only: Option<&FxHashSet<ElementId>>) {
        for method in &mut iface.methods {
            self.normalize_method(method, only);
        }
        for attribute in &mut iface.attributes {
            if selected(only, attribute.id) {
                self.substitute_reserved(attribute.id, &mut attribute.name);
            }
        }
        for broadcast in &mut iface.broadcasts {
            self.normalize_arguments(&mut broadcast.out_args, only);
        }
        self.normalize_types(&mut iface.types, only);
    }

    fn normalize_method(&mut self, method: &mut Method, only: Option<&FxHashSet<ElementId>>) {
        let in_names: FxHashSet<SmolStr> =
            method.in_args.iter().map(|a| a.name.clone()).collect();
        for arg in &mut method.out_args {
            if selected(only, arg.id) && in_names.contains(&arg.name) {
                let to = suffixed(&arg.name);
                self.ledger
                    .apply(arg.id, RenameRule::InOutCollision, &mut arg.name, to);
            }
        }

        self.normalize_arguments(&mut method.in_args, only);
        self.normalize_arguments(&mut method.out_args, only);

        let in_names: FxHashSet<SmolStr> =
            method.in_args.iter().map(|a| a.name.clone()).collect();
        for arg in &mut method.out_args {
            if selected(only, arg.id) && in_names.contains(&arg.name) {
                let to = suffixed(&arg.name);
                self.ledger
                    .apply(arg.id, RenameRule::ReservedCollision, &mut arg.name, to);
            }
        }
    }

    fn normalize_arguments(
        &mut self,
        args: &mut [TypedElement],
        only: Option<&FxHashSet<ElementId>>,
    ) {
        for arg in args {
            if selected(only, arg.id) {
                self.substitute_reserved(arg.id, &mut arg.name);
            }
        }
    }

    fn normalize_types(&mut self, types: &mut [TypeDecl], only: Option<&FxHashSet<ElementId>>) {
        for decl in types {
            match decl {
                TypeDecl::Struct(s) | TypeDecl::Union(s) => {
                    self.normalize_arguments(&mut s.fields, only)
                }
                TypeDecl::Enumeration(e) => self.normalize_enumeration(e, only),
                TypeDecl::Typedef(_) | TypeDecl::Array(_) | TypeDecl::Map(_) => {}
            }
        }
    }

    fn normalize_enumeration(
        &mut self,
        enumeration: &mut EnumerationType,
        only: Option<&FxHashSet<ElementId>>,
    ) {
        for enumerator in &mut enumeration.enumerators {
            if !selected(only, enumerator.id) {
                continue;
            }
            if enumerator.name == enumeration.name {
                let to = suffixed(&enumerator.name);
                self.ledger.apply(
                    enumerator.id,
                    RenameRule::EnumerationName,
                    &mut enumerator.name,
                    to,
                );
            }
            self.substitute_reserved(enumerator.id, &mut enumerator.name);
        }
    }

    fn substitute_reserved(&mut self, id: ElementId, name: &mut SmolStr) {
        if let Some(substitute) = reserved_substitute(name) {
            self.ledger
                .apply(id, RenameRule::ReservedWord, name, SmolStr::new_static(substitute));
        }
    }
}

fn selected(only: Option<&FxHashSet<ElementId>>, id: ElementId) -> bool {
    only.is_none_or(|set| set.contains(&id))
}

fn link_members<'m>(
    container: DeployedContainer<'m>,
    parent: Option<ResolvedMember<'m>>,
    elements: &[DeployedElement],
    same_name: &dyn Fn(ElementId, &str, &str) -> bool,
    links: &mut IndexMap<ElementId, ElementId>,
) {
    for element in elements {
        if let Some(member) = find_member(container, parent, element, same_name) {
            links.insert(element.id, member.id());
            link_members(container, Some(member), &element.children, same_name, links);
        }
    }
}

fn retarget(
    elements: &mut [DeployedElement],
    links: &IndexMap<ElementId, ElementId>,
    names: &FxHashMap<ElementId, SmolStr>,
) {
    for element in elements {
        let name = links.get(&element.id).and_then(|id| names.get(id));
        if let Some(name) = name {
            if element.target.simple_name() != name.as_str() {
                element.target.name = name.clone();
            }
        }
        retarget(&mut element.children, links, names);
    }
}
