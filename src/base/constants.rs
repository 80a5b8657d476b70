//! Domain constants shared across the crate.

/// Extension of interface-description documents.
pub const FIDL_EXT: &str = "fidl";

/// Extension of deployment-annotation documents.
pub const FDEPL_EXT: &str = "fdepl";

/// Directory names skipped while scanning a workspace for documents.
///
/// These hold build output or VCS metadata, never hand-written models.
pub const SKIPPED_DIRS: &[&str] = &["bin", "target", "build", "src-gen", ".git"];

/// Separator appended to identifiers renamed by the normalizer.
pub const RENAME_SEPARATOR: char = '_';

/// URI scheme prefixes stripped from import URIs before resolution.
pub const URI_SCHEMES: &[&str] = &["file://", "file:"];

/// URI schemes that name plugin or classpath resources outside the workspace.
/// Imports using them are not followed.
pub const EXTERNAL_SCHEMES: &[&str] = &["platform:", "classpath:", "http:", "https:"];
