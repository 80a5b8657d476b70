//! Analysis layer: indexing, graphs and validation over parsed documents.
//!
//! Everything here consumes the document model from [`crate::syntax`] and
//! reads other files only through a [`crate::project::DocumentLoader`].
//!
//! ## Key Types
//!
//! - [`SymbolIndex`] - Workspace-wide index of top-level declarations
//! - [`ImportGraph`] - File → directly imported files, expanded lazily
//! - [`ModelScope`] - Name resolution across an import closure
//! - [`ModelValidator`] / [`DeploymentValidator`] - Rule checks
//! - [`Normalizer`] - The one mutating pass, with its [`RenameLedger`]
//!
//! ## Pass Order
//!
//! ```text
//! SymbolIndex::build_index(root)      ← workspace scan (memoized per root)
//!     │
//!     ▼
//! Normalizer::normalize(document)     ← renames, recorded in the ledger
//!     │
//!     ▼
//! ImportGraph::resolve_transitive     ← import closure of the document
//!     │
//!     ▼
//! ModelScope                          ← loaded closure, name resolution
//!     │
//!     ▼
//! ModelValidator::validate            ← Vec<Diagnostic>
//! ```

mod cycles;
mod deployment;
mod diagnostics;
mod identifiers;
mod import_graph;
mod literals;
mod normalize;
mod scope;
mod symbol_index;
mod type_graph;
mod validate;

pub use cycles::{
    CyclePath, ManagementCycle, ManagementEdge, find_import_cycle,
    find_management_cycle_through, find_management_cycles, management_edges,
    render_import_trail,
};
pub use deployment::{
    DeployedContainer, DeploymentValidator, ResolvedDefinition, ResolvedMember, ResolvedTarget,
    find_member, resolve_deployment,
};
pub use diagnostics::{Diagnostic, DiagnosticCollector, Feature, Severity, codes};
pub use identifiers::{
    KEYWORDS, NameCheck, RESERVED_WORDS, check_name, is_keyword, is_renamable,
    reserved_substitute,
};
pub use import_graph::{ImportGraph, direct_imports};
pub use literals::{LiteralProblem, check_enumerator_literal};
pub use normalize::{Normalizer, Rename, RenameLedger, RenameRule};
pub use scope::{InterfaceHandle, ModelScope, TypeCollectionHandle, TypeHandle};
pub use symbol_index::{FastIndex, SymbolIndex, SymbolIndexEntry};
pub use type_graph::{TypeGraph, TypeProblem};
pub use validate::ModelValidator;
