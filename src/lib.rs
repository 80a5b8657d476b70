//! # franca-base
//!
//! Core library for Franca IDL and deployment models: reading, indexing,
//! normalization and validation.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! project   → Document loading, options, validation session
//!   ↓
//! hir       → Symbol index, import graph, cycle detection, validators
//!   ↓
//! syntax    → Document model, element identities, Span/Position
//!   ↓
//! parser    → Logos lexer, recursive-descent readers (.fidl, .fdepl)
//!   ↓
//! base      → Primitives (Span, LineIndex, path normalization)
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → syntax → hir → project)
// ============================================================================

/// Foundation types: spans, line index, path normalization, constants
pub mod base;

/// Parser: Logos lexer and recursive-descent readers
pub mod parser;

/// Syntax: document model and the element sum type
pub mod syntax;

/// Analysis: indexing, import graphs, cycle detection, validation
pub mod hir;

/// Project management: loaders, options, validation session
pub mod project;

// Re-export commonly needed items
pub use parser::keywords;

// Re-export foundation types
pub use base::{LineCol, LineIndex, Position, Span, TextRange, TextSize};

// Re-export the validation entry points
pub use hir::{Diagnostic, Normalizer, Severity, SymbolIndex};
pub use project::{
    DocumentLoader, FileLoader, LoadError, MemoryLoader, ValidationReport, ValidationSession,
    ValidatorOptions,
};
