//! Project layer: file loading, import-URI resolution, options and the
//! validation session that drives the analysis layer.

mod loader;
mod options;
mod session;

pub use loader::{
    DocumentLoader, FileLoader, LoadError, MemoryLoader, parse_source, resolve_import_uri,
};
pub use options::ValidatorOptions;
pub use session::{ValidationReport, ValidationSession};
