//! Deployment documents checked against the models they deploy.

use franca::hir::{Feature, codes};

use crate::helpers::diagnostic_helpers::*;
use crate::helpers::source_fixtures::{DOOR_FDEPL, DOOR_FIDL};

fn deploy(deployment: &str) -> Vec<franca::hir::Diagnostic> {
    diagnostics_from_sources(
        &[("/ws/Door.fidl", DOOR_FIDL), ("/ws/Door.fdepl", deployment)],
        "/ws/Door.fdepl",
    )
}

#[test]
fn test_complete_deployment_is_clean() {
    assert_clean(&deploy(DOOR_FDEPL));
}

#[test]
fn test_unknown_interface() {
    let diagnostics = deploy(
        r#"import "Door.fidl"
        define spec for interface org.example.Window { }"#,
    );

    assert_eq!(messages(&diagnostics), vec!["Interface 'org.example.Window' not found"]);
    assert_eq!(diagnostics[0].code.as_deref(), Some(codes::UNDEFINED_REFERENCE));
    assert_eq!(diagnostics[0].feature, Some(Feature::Target));
}

#[test]
fn test_target_outside_imports_is_not_found() {
    let diagnostics = diagnostics_from_sources(
        &[("/ws/Door.fidl", DOOR_FIDL), ("/ws/Door.fdepl", "define spec for interface Door { }")],
        "/ws/Door.fdepl",
    );
    assert_eq!(messages(&diagnostics), vec!["Interface 'Door' not found"]);
}

#[test]
fn test_members_are_resolved_by_kind() {
    let diagnostics = deploy(
        r#"import "Door.fidl"
        define spec for interface Door {
            attribute setValue { }
            method width { }
            broadcast opened { out { value } }
            method setValue { in { count } }
        }"#,
    );

    assert_eq!(
        messages(&diagnostics),
        vec![
            "Attribute 'setValue' not found in 'Door'",
            "Method 'width' not found in 'Door'",
            "Out-argument 'value' not found in 'Door'",
            "In-argument 'count' not found in 'Door'",
        ]
    );
    assert!(diagnostics.iter().all(|d| d.file.ends_with("Door.fdepl")));
}

#[test]
fn test_duplicate_definitions() {
    let diagnostics = deploy(
        r#"import "Door.fidl"
        define first for interface Door { }
        define second for interface org.example.Door { }"#,
    );

    assert_eq!(
        messages(&diagnostics),
        vec!["Interface 'org.example.Door' is deployed more than once in this file"]
    );
    assert_eq!(diagnostics[0].code.as_deref(), Some(codes::DUPLICATE_DEFINITION));
}

#[test]
fn test_model_rules_are_reported_on_the_deployment() {
    let diagnostics = diagnostics_from_sources(
        &[
            (
                "/ws/Lock.fidl",
                r#"package p
                interface Lock { method delete { } }"#,
            ),
            (
                "/ws/Lock.fdepl",
                r#"import "Lock.fidl"
                define spec for interface Lock { }"#,
            ),
        ],
        "/ws/Lock.fdepl",
    );

    assert!(has_error_containing(&diagnostics, "Interface 'Lock' requires a version"));
    assert!(has_error_containing(&diagnostics, "Method name 'delete' is a reserved keyword"));
    assert!(diagnostics.iter().all(|d| d.file.ends_with("Lock.fdepl")));
    assert!(diagnostics.iter().all(|d| d.span.start.line == 1));
}

#[test]
fn test_missing_deployment_import() {
    let diagnostics = deploy(
        r#"import "Door.fidl"
        import "Window.fidl"
        define spec for interface Door { }"#,
    );

    assert_eq!(
        messages(&diagnostics),
        vec!["Imported file 'Window.fidl' does not exist"]
    );
    assert_eq!(diagnostics[0].index, Some(1));
}
