//! Management and inheritance cycles between interfaces.

use franca::hir::{Feature, codes};

use crate::helpers::diagnostic_helpers::*;

#[test]
fn test_interface_managing_itself() {
    let diagnostics = diagnostics_from_fidl(
        r#"package p
        interface Hub manages Hub { version { major 1 minor 0 } }"#,
    );

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].message.contains("manages itself"));
    assert_eq!(
        diagnostics[0].code.as_deref(),
        Some(codes::CIRCULAR_DEPENDENCY)
    );
}

#[test]
fn test_inherited_management_cycle() {
    let diagnostics = diagnostics_from_fidl(
        r#"package p
        interface Entry manages Door { version { major 1 minor 0 } }
        interface Door extends Entry { version { major 1 minor 0 } }"#,
    );

    let cycles = with_code(&diagnostics, codes::CIRCULAR_DEPENDENCY);
    let door = cycles
        .iter()
        .find(|d| d.message.starts_with("Interface 'Door'"))
        .expect("Door should report the cycle");
    assert_eq!(
        door.message.as_ref(),
        "Interface 'Door' manages itself (Door -[extends]-> Entry -[manages]-> Door)"
    );
    assert_eq!(door.feature, Some(Feature::Base));
    assert!(door.message.contains("-[extends]->"));

    let entry = cycles
        .iter()
        .find(|d| d.message.starts_with("Interface 'Entry'"))
        .expect("Entry should report the cycle");
    assert_eq!(entry.feature, Some(Feature::Manages));
    assert_eq!(entry.index, Some(0));
}

#[test]
fn test_cycle_behind_managed_interface() {
    let diagnostics = diagnostics_from_fidl(
        r#"package p
        interface Root manages Left { version { major 1 minor 0 } }
        interface Left manages Right { version { major 1 minor 0 } }
        interface Right manages Left { version { major 1 minor 0 } }"#,
    );

    let root: Vec<_> = diagnostics
        .iter()
        .filter(|d| d.message.contains("Management cycle detected"))
        .collect();
    assert_eq!(root.len(), 1, "{:?}", messages(&diagnostics));
    assert_eq!(
        root[0].message.as_ref(),
        "Management cycle detected: Root -[manages]-> Left -[manages]-> Right -[manages]-> Left"
    );
}

#[test]
fn test_inheritance_cycle() {
    let diagnostics = diagnostics_from_fidl(
        r#"package p
        interface A extends B { version { major 1 minor 0 } }
        interface B extends A { version { major 1 minor 0 } }"#,
    );

    assert!(has_error_containing(
        &diagnostics,
        "Interface 'A' extends itself (A -[extends]-> B -[extends]-> A)"
    ));
    assert!(has_error_containing(&diagnostics, "Interface 'B' extends itself"));
}

#[test]
fn test_management_across_files() {
    let diagnostics = diagnostics_from_sources(
        &[
            (
                "/ws/Hub.fidl",
                r#"package p
                import model "Device.fidl"
                interface Hub manages Device, Sensor { version { major 1 minor 0 } }
                interface Sensor { version { major 1 minor 0 } }"#,
            ),
            (
                "/ws/Device.fidl",
                r#"package p
                interface Device { version { major 1 minor 0 } }"#,
            ),
        ],
        "/ws/Hub.fidl",
    );
    assert_clean(&diagnostics);
}

#[test]
fn test_managed_interface_problems() {
    let diagnostics = diagnostics_from_fidl(
        r#"package p
        interface Hub manages Device, Ghost, Device { version { major 1 minor 0 } }
        interface Device { version { major 1 minor 0 } }"#,
    );

    assert_eq!(
        messages(&diagnostics),
        vec![
            "Managed interface 'Ghost' not found".to_string(),
            "Interface 'Device' is managed more than once".to_string(),
        ]
    );
    assert_eq!(diagnostics[0].index, Some(1));
    assert_eq!(diagnostics[1].index, Some(2));
    assert!(diagnostics.iter().all(|d| d.feature == Some(Feature::Manages)));
}

#[test]
fn test_each_cycling_managed_entry_is_reported() {
    let diagnostics = diagnostics_from_fidl(
        r#"package p
        interface Hub manages Left, Right { version { major 1 minor 0 } }
        interface Left manages Hub { version { major 1 minor 0 } }
        interface Right manages Hub { version { major 1 minor 0 } }"#,
    );

    let hub: Vec<_> = diagnostics
        .iter()
        .filter(|d| d.message.starts_with("Interface 'Hub'"))
        .collect();
    assert_eq!(hub.len(), 2, "{:?}", messages(&diagnostics));
    assert_eq!(
        hub[0].message.as_ref(),
        "Interface 'Hub' manages itself (Hub -[manages]-> Left -[manages]-> Hub)"
    );
    assert_eq!(
        hub[1].message.as_ref(),
        "Interface 'Hub' manages itself (Hub -[manages]-> Right -[manages]-> Hub)"
    );
    assert_eq!(hub[0].index, Some(0));
    assert_eq!(hub[1].index, Some(1));
    assert!(hub.iter().all(|d| d.feature == Some(Feature::Manages)));
}

#[test]
fn test_managed_and_base_edges_are_reported_separately() {
    let diagnostics = diagnostics_from_fidl(
        r#"package p
        interface Door extends Entry manages Entry { version { major 1 minor 0 } }
        interface Entry manages Door { version { major 1 minor 0 } }"#,
    );

    let door: Vec<_> = diagnostics
        .iter()
        .filter(|d| d.message.starts_with("Interface 'Door'"))
        .collect();
    assert_eq!(door.len(), 2, "{:?}", messages(&diagnostics));
    assert_eq!(door[0].feature, Some(Feature::Manages));
    assert_eq!(door[1].feature, Some(Feature::Base));
    assert!(door[1].message.contains("Door -[extends]-> Entry -[manages]-> Door"));
}
