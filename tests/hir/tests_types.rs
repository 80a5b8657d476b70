//! Type references: resolution across imports and recursive definitions.

use franca::hir::codes;

use crate::helpers::diagnostic_helpers::*;

const COMMON: &str = r#"package org.common
typeCollection Common {
    struct Point { Int32 x Int32 y }
    enumeration Unit { METER = 1 FOOT = 2 }
}"#;

#[test]
fn test_types_resolve_through_imports() {
    let diagnostics = diagnostics_from_sources(
        &[
            (
                "/ws/Shapes.fidl",
                r#"package org.shapes
                import org.common.* from "common/Common.fidl"
                typeCollection Shapes {
                    struct Line { Point start Point finish Common.Unit unit }
                    struct Polygon extends Line { Point[] corners }
                    array Path of org.common.Common.Point
                }"#,
            ),
            ("/ws/common/Common.fidl", COMMON),
        ],
        "/ws/Shapes.fidl",
    );
    assert_clean(&diagnostics);
}

#[test]
fn test_types_from_unimported_files_are_undefined() {
    let diagnostics = diagnostics_from_sources(
        &[
            (
                "/ws/Shapes.fidl",
                r#"package org.shapes
                typeCollection Shapes { struct Line { Point start } }"#,
            ),
            ("/ws/common/Common.fidl", COMMON),
        ],
        "/ws/Shapes.fidl",
    );

    assert_eq!(
        messages(&diagnostics),
        vec!["Field 'start' derives from an undefined type 'Point'"]
    );
    assert_eq!(
        diagnostics[0].code.as_deref(),
        Some(codes::UNDEFINED_REFERENCE)
    );
}

#[test]
fn test_recursion_across_files() {
    let diagnostics = diagnostics_from_sources(
        &[
            (
                "/ws/A.fidl",
                r#"package p
                import model "B.fidl"
                typeCollection TA { struct Outer { Inner inner } }"#,
            ),
            (
                "/ws/B.fidl",
                r#"package p
                typeCollection TB {
                    struct Inner { Middle middle }
                    struct Middle { Inner back }
                }"#,
            ),
        ],
        "/ws/A.fidl",
    );

    assert_eq!(
        messages(&diagnostics),
        vec!["Field 'inner' has a type with a recursive definition: Inner -> Middle -> Inner"]
    );
    assert_eq!(
        diagnostics[0].code.as_deref(),
        Some(codes::CIRCULAR_DEPENDENCY)
    );
}

#[test]
fn test_collections_break_recursion() {
    let diagnostics = diagnostics_from_fidl(
        r#"package p
        typeCollection T {
            struct Tree { String label Tree[] children Forest more }
            array Forest of Tree
            map Lookup { String to Tree }
            struct Holder { Lookup lookup }
        }"#,
    );
    assert_clean(&diagnostics);
}

#[test]
fn test_struct_extending_its_own_field_type() {
    let diagnostics = diagnostics_from_fidl(
        r#"package p
        typeCollection T {
            struct Base { Derived d }
            struct Derived extends Base { }
        }"#,
    );
    assert!(has_error_containing(
        &diagnostics,
        "has a type with a recursive definition"
    ));
}

#[test]
fn test_interface_elements_use_derived_types() {
    let diagnostics = diagnostics_from_fidl(
        r#"package p
        interface Door {
            version { major 1 minor 0 }
            attribute Missing width
            method open { in { Ghost g } out { Int32 done } }
            broadcast opened { out { Phantom p } }
        }"#,
    );

    assert_eq!(
        messages(&diagnostics),
        vec![
            "Attribute 'width' derives from an undefined type 'Missing'",
            "Argument 'g' derives from an undefined type 'Ghost'",
            "Argument 'p' derives from an undefined type 'Phantom'",
        ]
    );
}
