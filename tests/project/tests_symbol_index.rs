//! Workspace scanning for the symbol index.

use franca::{FileLoader, SymbolIndex, ValidatorOptions};

use crate::helpers::source_fixtures::interface_source;
use crate::helpers::workspace::TestWorkspace;

fn build(ws: &TestWorkspace, index: &mut SymbolIndex) -> bool {
    index.build_index(ws.root(), &FileLoader::new(), &ValidatorOptions::default())
}

#[test]
fn test_scan_skips_build_output() {
    let ws = TestWorkspace::new()
        .with_file("model/Door.fidl", interface_source("org.example", "Door"))
        .with_file("bin/Door.fidl", interface_source("org.example", "Door"))
        .with_file("src-gen/Door.fidl", interface_source("org.example", "Door"))
        .with_file("target/Door.fidl", interface_source("org.example", "Door"))
        .with_file("model/Door.fdepl", "define spec for interface Door { }")
        .with_file("model/notes.txt", "not a model");
    let mut index = SymbolIndex::new();

    assert!(build(&ws, &mut index));

    assert_eq!(index.len(), 1);
    let files: Vec<_> = index.files_declaring("Door", "org.example").cloned().collect();
    assert_eq!(files, vec![ws.path("model/Door.fidl")]);
}

#[test]
fn test_scan_is_memoized_per_root() {
    let ws = TestWorkspace::new().with_file("A.fidl", interface_source("p", "A"));
    let other = TestWorkspace::new().with_file("B.fidl", interface_source("p", "B"));
    let mut index = SymbolIndex::new();

    assert!(build(&ws, &mut index));
    ws.write("Late.fidl", interface_source("p", "Late"));
    assert!(!build(&ws, &mut index));
    assert_eq!(index.files_declaring("Late", "p").count(), 0);

    assert!(build(&other, &mut index));
    assert_eq!(index.files_declaring("A", "p").count(), 0);
    assert_eq!(index.files_declaring("B", "p").count(), 1);

    index.invalidate();
    assert!(build(&other, &mut index));
}

#[test]
fn test_unparsable_files_are_skipped() {
    let ws = TestWorkspace::new()
        .with_file("Good.fidl", interface_source("p", "Good"))
        .with_file("Bad.fidl", "package p interface {");
    let mut index = SymbolIndex::new();

    build(&ws, &mut index);

    assert_eq!(index.len(), 1);
    assert!(index.entry(&ws.path("Good.fidl")).is_some());
}

#[test]
fn test_entries_list_type_collections_and_interfaces() {
    let ws = TestWorkspace::new().with_file(
        "Mixed.fidl",
        r#"package org.mixed
        typeCollection Types { }
        interface Door { version { major 1 minor 0 } }"#,
    );
    let mut index = SymbolIndex::new();

    build(&ws, &mut index);

    let entry = index.entry(&ws.path("Mixed.fidl")).expect("should be indexed");
    assert_eq!(entry.package, "org.mixed");
    assert!(entry.type_collections.contains("Types"));
    assert!(entry.interfaces.contains("Door"));
    let packages = index.lookup("Door").expect("Door should be indexed");
    assert!(packages.contains_key("org.mixed"));
}
