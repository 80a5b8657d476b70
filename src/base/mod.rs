//! Foundation types for the Franca toolchain.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - [`LineCol`], [`LineIndex`] - Line/column conversion
//! - [`Position`], [`Span`] - Line/column positions for model elements
//! - Path normalization for file identities
//! - Domain constants (file extensions, skipped directories)
//!
//! This module has NO dependencies on other franca modules.

pub mod constants;
mod paths;
mod position;
mod span;

pub use paths::{normalize_path, normalize_separators, resolve_relative};
pub use position::{Position, Span};
pub use span::{LineCol, LineIndex, TextRange, TextSize};

// Re-export text-size types for convenience
pub use text_size;
