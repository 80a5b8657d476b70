//! Enumerator values as reported by model validation.

use franca::hir::{Feature, Severity, codes};
use rstest::rstest;

use crate::helpers::diagnostic_helpers::*;

fn enumeration_with_value(value: &str) -> String {
    format!(
        r#"package p
        typeCollection T {{
            enumeration Flags {{ A = "{value}" }}
        }}"#
    )
}

#[rstest]
#[case("9", None)]
#[case("123", None)]
#[case("0b101", None)]
#[case("0x1F", None)]
#[case("0X1f", None)]
#[case("017", None)]
#[case("0", None)]
#[case("a", Some("Value 'a' of enumerator 'A' is not a valid number"))]
#[case("12a", Some("Value '12a' of enumerator 'A' is not a valid number"))]
#[case("0b102", Some("Value '0b102' of enumerator 'A' should be binary"))]
#[case("0x1G", Some("Value '0x1G' of enumerator 'A' should be hexadecimal"))]
#[case("019", Some("Value '019' of enumerator 'A' should be octal"))]
fn test_enumerator_value_policy(#[case] value: &str, #[case] expected: Option<&str>) {
    let diagnostics = diagnostics_from_fidl(&enumeration_with_value(value));

    match expected {
        None => assert_clean(&diagnostics),
        Some(message) => {
            assert_eq!(diagnostics.len(), 1, "{:?}", messages(&diagnostics));
            let warning = &diagnostics[0];
            assert_eq!(warning.message.as_ref(), message);
            assert_eq!(warning.severity, Severity::Warning);
            assert_eq!(warning.code.as_deref(), Some(codes::INVALID_LITERAL));
            assert_eq!(warning.feature, Some(Feature::Value));
        }
    }
}

#[test]
fn test_empty_value_is_a_warning_and_absent_value_is_not() {
    let diagnostics = diagnostics_from_fidl(
        r#"package p
        typeCollection T { enumeration Flags { A = "" B = 2 C } }"#,
    );

    assert_eq!(messages(&diagnostics), vec!["Enumerator 'A' has a missing value"]);
    assert_no_errors(&diagnostics);
}

#[test]
fn test_unquoted_number_values() {
    let diagnostics = diagnostics_from_fidl(
        r#"package p
        typeCollection T { enumeration Flags { A = 1 B = 2 C = -3 } }"#,
    );

    assert!(has_warning_containing(&diagnostics, "Value '-3' of enumerator 'C'"));
    assert_eq!(warnings(&diagnostics).len(), 1);
}
