//! Diagnostics: validation error reporting.
//!
//! Every rule violation found in a model becomes a [`Diagnostic`]; nothing
//! found in model data aborts a validation pass.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::base::Span;
use crate::syntax::ElementRef;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        f.write_str(text)
    }
}

/// Which feature of the source element a diagnostic is about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Feature {
    Name,
    Version,
    ImportUri,
    Manages,
    Base,
    Type,
    Value,
    Target,
}

/// A diagnostic message with location.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    /// The file containing this diagnostic.
    pub file: PathBuf,
    /// Source range (0-indexed lines and columns).
    pub span: Span,
    /// Severity level.
    pub severity: Severity,
    /// Error/warning code (e.g., "E0001").
    pub code: Option<Arc<str>>,
    /// The diagnostic message.
    pub message: Arc<str>,
    /// The element the diagnostic is attached to.
    pub element: ElementRef,
    /// The offending feature of `element`, if narrower than the whole element.
    pub feature: Option<Feature>,
    /// Position within a multi-valued feature.
    pub index: Option<usize>,
}

impl Diagnostic {
    fn new(
        severity: Severity,
        file: &Path,
        element: ElementRef,
        message: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            file: file.to_path_buf(),
            span: Span::default(),
            severity,
            code: None,
            message: message.into(),
            element,
            feature: None,
            index: None,
        }
    }

    /// Create a new error diagnostic.
    pub fn error(file: &Path, element: ElementRef, message: impl Into<Arc<str>>) -> Self {
        Self::new(Severity::Error, file, element, message)
    }

    /// Create a new warning diagnostic.
    pub fn warning(file: &Path, element: ElementRef, message: impl Into<Arc<str>>) -> Self {
        Self::new(Severity::Warning, file, element, message)
    }

    /// Create a new informational diagnostic.
    pub fn info(file: &Path, element: ElementRef, message: impl Into<Arc<str>>) -> Self {
        Self::new(Severity::Info, file, element, message)
    }

    /// Set the span (range) for this diagnostic.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Set the error code.
    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Narrow the diagnostic to one feature of its element.
    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.feature = Some(feature);
        self
    }

    /// Position within a multi-valued feature.
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Move the diagnostic onto another file and range, keeping the element.
    pub fn rehome(mut self, file: &Path, span: Span) -> Self {
        self.file = file.to_path_buf();
        self.span = span;
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}",
            self.file.display(),
            self.span.start.line + 1,
            self.span.start.column + 1,
            self.severity
        )?;
        if let Some(code) = &self.code {
            write!(f, "[{code}]")?;
        }
        write!(f, ": {}", self.message)
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Standard diagnostic codes for validation errors.
///
/// ## Error Code Ranges
///
/// - **E0001-E0099**: Model errors (resolution, duplicates, cycles, naming)
/// - **W0001-W0099**: Warnings (latent ambiguity, lexical problems)
pub mod codes {
    // ========================================================================
    // ERRORS (E0001-E0099)
    // ========================================================================

    /// Undefined reference (name not found).
    pub const UNDEFINED_REFERENCE: &str = "E0001";
    /// Duplicate definition.
    pub const DUPLICATE_DEFINITION: &str = "E0004";
    /// Missing required element.
    pub const MISSING_REQUIRED: &str = "E0005";
    /// Circular dependency detected.
    pub const CIRCULAR_DEPENDENCY: &str = "E0007";
    /// Invalid import statement.
    pub const INVALID_IMPORT: &str = "E0014";
    /// Name collides with a reserved keyword of a target language.
    pub const RESERVED_KEYWORD: &str = "E0015";

    // ========================================================================
    // WARNINGS (W0001-W0099)
    // ========================================================================

    /// Same name and package declared in another workspace file.
    pub const DUPLICATE_ACROSS_FILES: &str = "W0004";
    /// Literal value with an unexpected lexical form.
    pub const INVALID_LITERAL: &str = "W0005";
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics during validation.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Add every diagnostic from `other`.
    pub fn extend(&mut self, other: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(other);
    }

    /// Get all diagnostics.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Get diagnostics for a specific file.
    pub fn diagnostics_for_file(&self, file: &Path) -> Vec<&Diagnostic> {
        self.diagnostics.iter().filter(|d| d.file == file).collect()
    }

    /// Get the number of errors.
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    /// Get the number of warnings.
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Take all diagnostics, leaving the collector empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Consume the collector.
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
