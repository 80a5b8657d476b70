//! Validation sessions over a workspace on disk.

use franca::hir::{Severity, codes};
use franca::LoadError;

use crate::helpers::diagnostic_helpers::*;
use crate::helpers::source_fixtures::{
    DOOR_FDEPL, DOOR_FIDL, interface_source, interface_source_importing,
};
use crate::helpers::workspace::TestWorkspace;

// ============================================================================
// CROSS-FILE DUPLICATES
// ============================================================================

#[test]
fn test_duplicate_in_unrelated_file_is_a_warning() {
    let ws = TestWorkspace::new()
        .with_file("pkg/A.fidl", interface_source("org.example", "Foo"))
        .with_file("pkg/B.fidl", interface_source("org.example", "Foo"));
    let mut session = ws.session();

    let report = session.validate_path(&ws.path("pkg/A.fidl")).unwrap();

    assert_eq!(report.diagnostics.len(), 1, "{:?}", messages(&report.diagnostics));
    let duplicate = &report.diagnostics[0];
    assert_eq!(duplicate.severity, Severity::Warning);
    assert_eq!(duplicate.code.as_deref(), Some(codes::DUPLICATE_ACROSS_FILES));
    assert_eq!(
        duplicate.message.to_string(),
        format!(
            "Interface 'Foo' has the same name and same package as a declaration in {}",
            ws.path("pkg/B.fidl").display()
        )
    );
    assert!(!report.has_errors());
}

#[test]
fn test_duplicate_becomes_an_error_once_imported() {
    let ws = TestWorkspace::new()
        .with_file("pkg/A.fidl", interface_source("org.example", "Foo"))
        .with_file("pkg/B.fidl", interface_source("org.example", "Foo"));
    let mut session = ws.session();
    let a = ws.path("pkg/A.fidl");

    let before = session.validate_path(&a).unwrap();
    assert_eq!(warnings(&before.diagnostics).len(), 1);

    ws.write(
        "pkg/A.fidl",
        interface_source_importing("org.example", "Foo", "B.fidl"),
    );
    let after = session.validate_path(&a).unwrap();

    assert_eq!(after.diagnostics.len(), 1, "{:?}", messages(&after.diagnostics));
    assert_eq!(after.diagnostics[0].severity, Severity::Error);
    assert_eq!(
        after.diagnostics[0].code.as_deref(),
        Some(codes::DUPLICATE_DEFINITION)
    );
    assert!(after.has_errors());

    // B does not import A, so from B's side it stays a warning.
    let b = session.validate_path(&ws.path("pkg/B.fidl")).unwrap();
    assert_eq!(b.diagnostics.len(), 1);
    assert_eq!(b.diagnostics[0].severity, Severity::Warning);
}

#[test]
fn test_same_name_in_other_package_is_fine() {
    let ws = TestWorkspace::new()
        .with_file("a/A.fidl", interface_source("org.a", "Foo"))
        .with_file("b/B.fidl", interface_source("org.b", "Foo"));
    let mut session = ws.session();

    let report = session.validate_path(&ws.path("a/A.fidl")).unwrap();
    assert_clean(&report.diagnostics);
}

#[test]
fn test_cross_file_check_can_be_disabled() {
    let ws = TestWorkspace::new()
        .with_file("A.fidl", interface_source("p", "Foo"))
        .with_file("B.fidl", interface_source("p", "Foo"));
    let options = franca::ValidatorOptions {
        check_cross_file_duplicates: false,
        ..Default::default()
    }
    .with_workspace_root(ws.root());
    let mut session = franca::ValidationSession::new(options);

    let report = session.validate_path(&ws.path("A.fidl")).unwrap();
    assert_clean(&report.diagnostics);
}

#[test]
fn test_deleted_file_leaves_the_index() {
    let ws = TestWorkspace::new()
        .with_file("A.fidl", interface_source("p", "Foo"))
        .with_file("B.fidl", interface_source("p", "Foo"));
    let mut session = ws.session();
    let a = ws.path("A.fidl");

    assert_eq!(session.validate_path(&a).unwrap().diagnostics.len(), 1);

    let b = ws.remove("B.fidl");
    session.file_changed(&b);

    assert_clean(&session.validate_path(&a).unwrap().diagnostics);
}

// ============================================================================
// REPORTS
// ============================================================================

#[test]
fn test_missing_file_is_a_load_error() {
    let ws = TestWorkspace::new();
    let mut session = ws.session();

    let result = session.validate_path(&ws.path("Nope.fidl"));
    assert!(matches!(result, Err(LoadError::NotFound(_))));
}

#[test]
fn test_syntax_error_is_a_load_error() {
    let ws = TestWorkspace::new().with_file("Broken.fidl", "package p interface {");
    let mut session = ws.session();

    let result = session.validate_path(&ws.path("Broken.fidl"));
    assert!(result.is_err());
}

#[test]
fn test_commented_model_validates() {
    let ws = TestWorkspace::new().with_file(
        "Door.fidl",
        r#"/*
 * Copyright (c) 2024 Example Corp.
 **/
package org.example /* inline */

interface Door {
    version { major 1 minor 0 } /***/
    attribute Int32 width /* mm */
}"#,
    );
    let mut session = ws.session();

    let report = session.validate_path(&ws.path("Door.fidl")).unwrap();

    assert_clean(&report.diagnostics);
    assert_eq!(report.models.len(), 1);
}

#[test]
fn test_deployment_on_disk() {
    let ws = TestWorkspace::new()
        .with_file("Door.fidl", DOOR_FIDL)
        .with_file("Door.fdepl", DOOR_FDEPL);
    let mut session = ws.session();

    let report = session.validate_path(&ws.path("Door.fdepl")).unwrap();

    assert_clean(&report.diagnostics);
    assert_eq!(report.models.len(), 1);
    assert!(!report.ledger.is_empty());
}

#[test]
fn test_validate_workspace_covers_every_model() {
    let ws = TestWorkspace::new()
        .with_file("A.fidl", interface_source("p", "A"))
        .with_file("nested/B.fidl", interface_source("p", "B"))
        .with_file("bin/C.fidl", interface_source("p", "C"))
        .with_file("Door.fdepl", DOOR_FDEPL);
    let mut session = ws.session();

    let reports = session.validate_workspace();

    let mut paths: Vec<_> = reports
        .into_iter()
        .map(|r| r.expect("should load").path)
        .collect();
    paths.sort();
    assert_eq!(paths, vec![ws.path("A.fidl"), ws.path("nested/B.fidl")]);
}
