//! Syntax errors raised while reading a document.

use thiserror::Error;

use crate::base::LineCol;

/// A lexical or syntax error with its location.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{position}: {message}")]
pub struct ParseError {
    pub message: String,
    pub position: LineCol,
}

impl ParseError {
    pub fn syntax(message: impl Into<String>, position: LineCol) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }

    /// 1-indexed line for display.
    pub fn line(&self) -> u32 {
        self.position.line_one_indexed()
    }

    /// 1-indexed column for display.
    pub fn column(&self) -> u32 {
        self.position.col_one_indexed()
    }
}
