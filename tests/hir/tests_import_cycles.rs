//! Import resolution and import cycle reporting.

use franca::hir::{Feature, codes};

use crate::helpers::diagnostic_helpers::*;
use crate::helpers::source_fixtures::importing;

// ============================================================================
// CYCLES
// ============================================================================

#[test]
fn test_three_file_cycle_reported_once_with_trail() {
    let a = importing(&["B.fidl"]);
    let b = importing(&["C.fidl"]);
    let c = importing(&["A.fidl"]);
    let diagnostics = diagnostics_from_sources(
        &[("/ws/A.fidl", &a), ("/ws/B.fidl", &b), ("/ws/C.fidl", &c)],
        "/ws/A.fidl",
    );

    assert_eq!(diagnostics.len(), 1, "{:?}", messages(&diagnostics));
    let cycle = &diagnostics[0];
    assert_eq!(
        cycle.message.as_ref(),
        "Cyclic imports: /ws/A.fidl -> /ws/B.fidl -> /ws/C.fidl -> /ws/A.fidl"
    );
    assert_eq!(cycle.code.as_deref(), Some(codes::CIRCULAR_DEPENDENCY));
    assert_eq!(cycle.feature, Some(Feature::ImportUri));
    assert_eq!(cycle.index, Some(0));
    assert!(cycle.is_error());
}

#[test]
fn test_each_cyclic_import_statement_is_reported() {
    let a = importing(&["B.fidl", "C.fidl"]);
    let back = importing(&["A.fidl"]);
    let diagnostics = diagnostics_from_sources(
        &[("/ws/A.fidl", &a), ("/ws/B.fidl", &back), ("/ws/C.fidl", &back)],
        "/ws/A.fidl",
    );

    let cycles = with_code(&diagnostics, codes::CIRCULAR_DEPENDENCY);
    assert_eq!(cycles.len(), 2);
    assert_eq!(cycles[0].index, Some(0));
    assert_eq!(cycles[1].index, Some(1));
    assert!(cycles[1].message.contains("/ws/C.fidl -> /ws/A.fidl"));
}

#[test]
fn test_cycle_not_through_validated_file() {
    let a = importing(&["B.fidl"]);
    let b = importing(&["C.fidl"]);
    let c = importing(&["B.fidl"]);
    let diagnostics = diagnostics_from_sources(
        &[("/ws/A.fidl", &a), ("/ws/B.fidl", &b), ("/ws/C.fidl", &c)],
        "/ws/A.fidl",
    );

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].message.as_ref(),
        "Cyclic imports: /ws/A.fidl -> /ws/B.fidl -> /ws/C.fidl -> /ws/B.fidl"
    );
}

#[test]
fn test_acyclic_diamond_is_clean() {
    let a = importing(&["B.fidl", "C.fidl"]);
    let side = importing(&["D.fidl"]);
    let diagnostics = diagnostics_from_sources(
        &[
            ("/ws/A.fidl", &a),
            ("/ws/B.fidl", &side),
            ("/ws/C.fidl", &side),
            ("/ws/D.fidl", "package p"),
        ],
        "/ws/A.fidl",
    );
    assert_clean(&diagnostics);
}

#[test]
fn test_deep_import_chain_does_not_overflow() {
    const DEPTH: usize = 2_000;
    let sources: Vec<(String, String)> = (0..DEPTH)
        .map(|i| {
            let next = (i + 1) % DEPTH;
            (format!("/ws/F{i}.fidl"), importing(&[&format!("F{next}.fidl")]))
        })
        .collect();
    let files: Vec<(&str, &str)> = sources
        .iter()
        .map(|(path, source)| (path.as_str(), source.as_str()))
        .collect();

    let diagnostics = diagnostics_from_sources(&files, "/ws/F0.fidl");

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].message.starts_with("Cyclic imports: /ws/F0.fidl -> /ws/F1.fidl"));
    assert!(diagnostics[0].message.ends_with("/ws/F1999.fidl -> /ws/F0.fidl"));
}

// ============================================================================
// IMPORT PROBLEMS
// ============================================================================

#[test]
fn test_two_self_imports_reported_once() {
    let diagnostics = diagnostics_from_fidl(
        r#"package p
        import model "Test.fidl"
        import model "./Test.fidl""#,
    );

    assert_eq!(diagnostics.len(), 1, "{:?}", messages(&diagnostics));
    assert_eq!(
        diagnostics[0].message.as_ref(),
        "File imports itself ('Test.fidl')"
    );
    assert_eq!(diagnostics[0].code.as_deref(), Some(codes::INVALID_IMPORT));
}

#[test]
fn test_missing_import_does_not_stop_cycle_detection() {
    let a = importing(&["Gone.fidl", "B.fidl"]);
    let b = importing(&["A.fidl"]);
    let diagnostics =
        diagnostics_from_sources(&[("/ws/A.fidl", &a), ("/ws/B.fidl", &b)], "/ws/A.fidl");

    assert_eq!(
        messages(&diagnostics),
        vec![
            "Imported file 'Gone.fidl' does not exist".to_string(),
            "Cyclic imports: /ws/A.fidl -> /ws/B.fidl -> /ws/A.fidl".to_string(),
        ]
    );
    assert_eq!(diagnostics[0].index, Some(0));
    assert_eq!(diagnostics[1].index, Some(1));
}

#[test]
fn test_platform_uris_are_skipped() {
    let diagnostics = diagnostics_from_fidl(
        r#"package p
        import model "platform:/plugin/org.example/model/Base.fidl"
        import model "classpath:/Types.fidl""#,
    );
    assert_clean(&diagnostics);
}

#[test]
fn test_unparsable_import_is_reported_as_unloadable() {
    let a = importing(&["Broken.fidl"]);
    let diagnostics = diagnostics_from_sources(
        &[("/ws/A.fidl", &a), ("/ws/Broken.fidl", "package p interface {")],
        "/ws/A.fidl",
    );

    assert_eq!(diagnostics.len(), 1);
    assert!(
        diagnostics[0]
            .message
            .starts_with("Imported file 'Broken.fidl' cannot be loaded:"),
        "{}",
        diagnostics[0].message
    );
}
