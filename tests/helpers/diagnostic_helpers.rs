//! Helpers for running validation over in-memory sources and inspecting
//! the diagnostics.

use std::path::Path;

use franca::hir::{Diagnostic, Severity};
use franca::{MemoryLoader, ValidationReport, ValidationSession, ValidatorOptions};

/// Builds a loader holding every `(path, source)` pair.
pub fn loader_from_sources(files: &[(&str, &str)]) -> MemoryLoader {
    files
        .iter()
        .fold(MemoryLoader::new(), |loader, (path, source)| {
            loader.with_file(path, *source)
        })
}

/// Validates `path` in a session over the given in-memory files.
pub fn report_from_sources(files: &[(&str, &str)], path: &str) -> ValidationReport {
    let mut session =
        ValidationSession::with_loader(loader_from_sources(files), ValidatorOptions::default());
    session
        .validate_path(Path::new(path))
        .unwrap_or_else(|e| panic!("'{path}' should load: {e}"))
}

/// Diagnostics of validating `path` over the given in-memory files.
pub fn diagnostics_from_sources(files: &[(&str, &str)], path: &str) -> Vec<Diagnostic> {
    report_from_sources(files, path).diagnostics
}

/// Diagnostics of validating a single model file at `/ws/Test.fidl`.
pub fn diagnostics_from_fidl(source: &str) -> Vec<Diagnostic> {
    diagnostics_from_sources(&[("/ws/Test.fidl", source)], "/ws/Test.fidl")
}

pub fn errors(diagnostics: &[Diagnostic]) -> Vec<&Diagnostic> {
    with_severity(diagnostics, Severity::Error)
}

pub fn warnings(diagnostics: &[Diagnostic]) -> Vec<&Diagnostic> {
    with_severity(diagnostics, Severity::Warning)
}

fn with_severity(diagnostics: &[Diagnostic], severity: Severity) -> Vec<&Diagnostic> {
    diagnostics.iter().filter(|d| d.severity == severity).collect()
}

pub fn messages(diagnostics: &[Diagnostic]) -> Vec<String> {
    diagnostics.iter().map(|d| d.message.to_string()).collect()
}

pub fn has_error_containing(diagnostics: &[Diagnostic], text: &str) -> bool {
    errors(diagnostics).iter().any(|d| d.message.contains(text))
}

pub fn has_warning_containing(diagnostics: &[Diagnostic], text: &str) -> bool {
    warnings(diagnostics).iter().any(|d| d.message.contains(text))
}

/// Diagnostics carrying `code`.
pub fn with_code<'a>(diagnostics: &'a [Diagnostic], code: &str) -> Vec<&'a Diagnostic> {
    diagnostics
        .iter()
        .filter(|d| d.code.as_deref() == Some(code))
        .collect()
}

/// Asserts that there are no errors, listing them if there are.
pub fn assert_no_errors(diagnostics: &[Diagnostic]) {
    let errors = errors(diagnostics);
    if !errors.is_empty() {
        let formatted: Vec<_> = errors
            .iter()
            .map(|d| format!("  line {}: {}", d.span.start.line + 1, d.message))
            .collect();
        panic!(
            "Expected no errors, found {}:\n{}",
            errors.len(),
            formatted.join("\n")
        );
    }
}

/// Asserts that no diagnostic at all was produced.
pub fn assert_clean(diagnostics: &[Diagnostic]) {
    assert!(
        diagnostics.is_empty(),
        "Expected no diagnostics, found:\n{}",
        messages(diagnostics).join("\n")
    );
}
