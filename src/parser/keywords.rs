//! Contextual keywords of the document languages.
//!
//! The lexer emits every word as an identifier; the readers compare text
//! against these lists where a keyword is expected.

/// Flags that may trail an attribute declaration.
pub const ATTRIBUTE_FLAGS: &[&str] = &["readonly", "noSubscriptions", "noRead"];

/// Flags that may trail a method name.
pub const METHOD_FLAGS: &[&str] = &["fireAndForget"];

/// Flags that may trail a broadcast name.
pub const BROADCAST_FLAGS: &[&str] = &["selective"];

/// Element-block keywords inside a deployment `define` body.
pub const FDEPL_ELEMENT_KEYWORDS: &[&str] = &[
    "method",
    "attribute",
    "broadcast",
    "struct",
    "union",
    "enumeration",
    "array",
    "typedef",
    "map",
];
