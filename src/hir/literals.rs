//! Lexical policy for enumerator literal values.
//!
//! Only the spelling is checked. Whether the value fits the backing
//! integer type is left to the generator.

use std::fmt;

/// Why a literal failed the lexical policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LiteralProblem {
    Missing,
    NotANumber,
    NotBinary,
    NotHexadecimal,
    NotOctal,
}

impl fmt::Display for LiteralProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            LiteralProblem::Missing => "missing value",
            LiteralProblem::NotANumber => "is not a valid number",
            LiteralProblem::NotBinary => "should be binary",
            LiteralProblem::NotHexadecimal => "should be hexadecimal",
            LiteralProblem::NotOctal => "should be octal",
        };
        f.write_str(text)
    }
}

/// Check the spelling of an enumerator value. Case-insensitive.
pub fn check_enumerator_literal(text: &str) -> Option<LiteralProblem> {
    let value = text.to_ascii_lowercase();
    let value = value.as_str();

    if value.is_empty() {
        return Some(LiteralProblem::Missing);
    }
    if value.len() == 1 {
        return (!all(value, char::is_ascii_digit)).then_some(LiteralProblem::NotANumber);
    }
    if value.len() > 2 {
        if let Some(rest) = value.strip_prefix("0b") {
            return (!all(rest, |c| matches!(*c, '0' | '1'))).then_some(LiteralProblem::NotBinary);
        }
        if let Some(rest) = value.strip_prefix("0x") {
            return (!all(rest, char::is_ascii_hexdigit)).then_some(LiteralProblem::NotHexadecimal);
        }
    }
    if let Some(rest) = value.strip_prefix('0') {
        return (!all(rest, |c| ('0'..='7').contains(c))).then_some(LiteralProblem::NotOctal);
    }
    (!all(value, char::is_ascii_digit)).then_some(LiteralProblem::NotANumber)
}

fn all(digits: &str, ok: fn(&char) -> bool) -> bool {
    digits.chars().all(|c| ok(&c))
}
