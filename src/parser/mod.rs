//! Readers for interface-description and deployment documents.
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → significant tokens with ranges
//!     ↓
//! Cursor → recursive descent over the token stream
//!     ↓
//! syntax::Document / syntax::DeploymentDocument
//! ```
//!
//! Readers stop at the first syntax error. Everything past syntax
//! (names, references, cycles) is the validator's job.

mod cursor;
mod error;
mod fdepl;
mod fidl;
pub mod keywords;
mod lexer;

pub use error::ParseError;
pub use fdepl::parse_fdepl;
pub use fidl::parse_fidl;
pub use lexer::{Token, TokenKind, tokenize};
