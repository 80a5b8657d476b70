//! Identifier rules: hard-reserved keywords and soft-reserved words.
//!
//! A keyword can never be used as a name; the generated code would not
//! compile. A reserved word is tolerated in the model and replaced with its
//! substitute by the [`Normalizer`](super::Normalizer) before generation.

use crate::syntax::ElementKind;

/// Keywords of the generated target language.
pub const KEYWORDS: &[&str] = &[
    "alignas",
    "alignof",
    "and",
    "and_eq",
    "asm",
    "auto",
    "bitand",
    "bitor",
    "bool",
    "break",
    "case",
    "catch",
    "char",
    "char16_t",
    "char32_t",
    "class",
    "compl",
    "const",
    "const_cast",
    "constexpr",
    "continue",
    "decltype",
    "default",
    "delete",
    "do",
    "double",
    "dynamic_cast",
    "else",
    "enum",
    "explicit",
    "export",
    "extern",
    "false",
    "float",
    "for",
    "friend",
    "goto",
    "if",
    "inline",
    "int",
    "long",
    "mutable",
    "namespace",
    "new",
    "noexcept",
    "not",
    "not_eq",
    "nullptr",
    "operator",
    "or",
    "or_eq",
    "private",
    "protected",
    "public",
    "register",
    "reinterpret_cast",
    "return",
    "short",
    "signed",
    "sizeof",
    "static",
    "static_assert",
    "static_cast",
    "struct",
    "switch",
    "template",
    "this",
    "thread_local",
    "throw",
    "true",
    "try",
    "typedef",
    "typeid",
    "typename",
    "union",
    "unsigned",
    "using",
    "virtual",
    "void",
    "volatile",
    "wchar_t",
    "while",
    "xor",
    "xor_eq",
];

/// Words that clash with generated members, paired with their substitute.
pub const RESERVED_WORDS: &[(&str, &str)] = &[
    ("auto", "auto_"),
    ("class", "class_"),
    ("default", "default_"),
    ("delete", "delete_"),
    ("errno", "errno_"),
    ("friend", "friend_"),
    ("instance", "instance_"),
    ("int", "int_"),
    ("long", "long_"),
    ("namespace", "namespace_"),
    ("new", "new_"),
    ("operator", "operator_"),
    ("private", "private_"),
    ("protected", "protected_"),
    ("public", "public_"),
    ("register", "register_"),
    ("short", "short_"),
    ("signed", "signed_"),
    ("template", "template_"),
    ("this", "this_"),
    ("typename", "typename_"),
    ("unsigned", "unsigned_"),
    ("virtual", "virtual_"),
];

pub fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(&name)
}

/// The designated substitute for a reserved word, if `name` is one.
pub fn reserved_substitute(name: &str) -> Option<&'static str> {
    RESERVED_WORDS
        .iter()
        .find(|(word, _)| *word == name)
        .map(|(_, substitute)| *substitute)
}

/// Element kinds the normalizer renames when they carry a reserved word.
pub fn is_renamable(kind: ElementKind) -> bool {
    matches!(
        kind,
        ElementKind::Argument
            | ElementKind::Field
            | ElementKind::Attribute
            | ElementKind::Enumerator
    )
}

/// Result of checking one name against the identifier rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NameCheck {
    Valid,
    /// Soft-reserved; the normalizer will substitute it.
    Renamed(&'static str),
    /// Hard-reserved; always an error.
    Keyword,
}

/// Classify the name of an element of the given kind.
pub fn check_name(kind: ElementKind, name: &str) -> NameCheck {
    if is_renamable(kind) {
        if let Some(substitute) = reserved_substitute(name) {
            return NameCheck::Renamed(substitute);
        }
    }
    if is_keyword(name) {
        NameCheck::Keyword
    } else {
        NameCheck::Valid
    }
}
