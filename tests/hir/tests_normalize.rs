//! Identifier normalization seen through a validation session.

use std::path::Path;

use franca::hir::RenameRule;
use franca::syntax::Document;
use franca::{DocumentLoader, MemoryLoader, Normalizer, ValidationSession, ValidatorOptions};

use crate::helpers::diagnostic_helpers::*;
use crate::helpers::source_fixtures::{DOOR_FDEPL, DOOR_FIDL};

// ============================================================================
// HELPERS
// ============================================================================

fn arg_names(document: &Document) -> (Vec<String>, Vec<String>) {
    let method = &document.interfaces[0].methods[0];
    (
        method.in_args.iter().map(|a| a.name.to_string()).collect(),
        method.out_args.iter().map(|a| a.name.to_string()).collect(),
    )
}

fn door_session() -> ValidationSession<MemoryLoader> {
    ValidationSession::with_loader(
        loader_from_sources(&[("/ws/Door.fidl", DOOR_FIDL), ("/ws/Door.fdepl", DOOR_FDEPL)]),
        ValidatorOptions::default(),
    )
}

// ============================================================================
// MODEL
// ============================================================================

#[test]
fn test_model_report_is_normalized() {
    let report = report_from_sources(&[("/ws/Door.fidl", DOOR_FIDL)], "/ws/Door.fidl");

    assert_no_errors(&report.diagnostics);
    let document = report.file.as_model().expect("should be a model");
    assert_eq!(
        arg_names(document),
        (
            vec!["value".to_string(), "new_".to_string()],
            vec!["value_".to_string(), "new__".to_string()]
        )
    );
    let mode = &document.interfaces[0].types[0];
    let franca::syntax::TypeDecl::Enumeration(mode) = mode else {
        panic!("expected an enumeration");
    };
    assert_eq!(mode.enumerators[0].name, "Mode_");
    assert_eq!(report.ledger.len(), 5);
}

#[test]
fn test_each_run_starts_from_the_loaded_model() {
    let mut session = door_session();
    let path = Path::new("/ws/Door.fidl");

    let first = session.validate_path(path).expect("should load");
    let second = session.validate_path(path).expect("should load");

    assert_eq!(first.ledger.len(), second.ledger.len());
    assert_eq!(
        arg_names(first.file.as_model().unwrap()),
        arg_names(second.file.as_model().unwrap())
    );

    // The loader keeps the document as written.
    let loaded = session.loader().load(path).unwrap();
    assert_eq!(
        arg_names(loaded.as_model().unwrap()).1,
        vec!["value".to_string(), "new".to_string()]
    );
}

#[test]
fn test_normalizing_twice_changes_nothing() {
    let report = report_from_sources(&[("/ws/Door.fidl", DOOR_FIDL)], "/ws/Door.fidl");
    let mut document = report.file.as_model().unwrap().clone();

    assert_eq!(Normalizer::new().normalize(&mut document), 0);
    assert_eq!(arg_names(&document).1, vec!["value_".to_string(), "new__".to_string()]);
}

#[test]
fn test_ledger_records_original_names() {
    let report = report_from_sources(&[("/ws/Door.fidl", DOOR_FIDL)], "/ws/Door.fidl");
    let document = report.file.as_model().unwrap();
    let out_new = &document.interfaces[0].methods[0].out_args[1];

    assert_eq!(report.ledger.original_name(out_new.id), Some("new"));
    assert!(report.ledger.contains(out_new.id, RenameRule::InOutCollision));
    assert!(report.ledger.contains(out_new.id, RenameRule::ReservedCollision));
    assert!(!report.ledger.contains(out_new.id, RenameRule::ReservedWord));
}

// ============================================================================
// DEPLOYMENT
// ============================================================================

#[test]
fn test_deployment_follows_model_renames() {
    let mut session = door_session();
    let report = session
        .validate_path(Path::new("/ws/Door.fdepl"))
        .expect("should load");

    assert_clean(&report.diagnostics);
    assert_eq!(report.models.len(), 1);
    assert_eq!(report.ledger.len(), 5);

    let deployment = report.file.as_deployment().expect("should be a deployment");
    let method = deployment.definitions[0]
        .elements
        .iter()
        .find(|e| e.target.name == "setValue")
        .expect("method should be deployed");
    let names: Vec<_> = method
        .children
        .iter()
        .map(|c| c.target.name.to_string())
        .collect();
    assert_eq!(names, vec!["value", "new_", "value_", "new__"]);

    assert_eq!(arg_names(&report.models[0]).1, vec!["value_".to_string(), "new__".to_string()]);
}
