//! Reusable model and deployment sources.

/// An interface with an in/out name clash and a reserved-word argument.
pub const DOOR_FIDL: &str = r#"package org.example
interface Door {
    version { major 1 minor 0 }
    attribute Int32 width
    method setValue {
        in { Int32 value Boolean new }
        out { Int32 value Boolean new }
    }
    broadcast opened { out { Int32 count } }
    enumeration Mode { Mode = 0 OPEN = 1 CLOSED = 2 }
}"#;

/// A deployment covering every member of [`DOOR_FIDL`].
pub const DOOR_FDEPL: &str = r#"import "Door.fidl"
define spec for interface org.example.Door {
    attribute width { Id = 1 }
    method setValue {
        in { value new }
        out { value new }
    }
    broadcast opened { out { count } }
    enumeration Mode { Mode OPEN CLOSED }
}"#;

/// A versioned interface named `name` in package `package`.
pub fn interface_source(package: &str, name: &str) -> String {
    format!("package {package}\n{}", interface_body(name))
}

fn interface_body(name: &str) -> String {
    format!("interface {name} {{\n    version {{ major 1 minor 0 }}\n}}\n")
}

/// A versioned interface `name` with one import in front of it.
pub fn interface_source_importing(package: &str, name: &str, uri: &str) -> String {
    format!(
        "package {package}\nimport model \"{uri}\"\n{}",
        interface_body(name)
    )
}

/// A model file importing each of `uris`.
pub fn importing(uris: &[&str]) -> String {
    let imports: String = uris
        .iter()
        .map(|uri| format!("import model \"{uri}\"\n"))
        .collect();
    format!("package p\n{imports}")
}
