//! Post-processing of generated HTML trees.
//!
//! Two in-place rewrites run between site generation and deploy:
//!
//! - [`redirects`] replaces every page of a relocated version with a
//!   meta-refresh redirect to its new home;
//! - [`outdated`] splices a "you are viewing an outdated version" banner
//!   into pages that still exist in the latest version.
//!
//! Both rewrite files where they stand; no backups are kept.

pub mod outdated;
pub mod redirects;

use std::path::{Path, PathBuf};

/// Error from an HTML rewrite pass.
#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    /// The HTML directory to rewrite does not exist.
    #[error("the html directory doesn't exist: {}", .0.display())]
    MissingRoot(PathBuf),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid glob pattern (root path not expressible as a pattern).
    #[error("glob pattern error: {0}")]
    Pattern(#[from] glob::PatternError),

    /// A path matched by the walk could not be read.
    #[error("glob error: {0}")]
    Glob(#[from] glob::GlobError),

    /// The branch has no slug in the version registry.
    #[error("branch '{0}' is not in the version registry")]
    UnknownBranch(String),

    /// A placeholder block opened but never closed.
    #[error("unterminated outdated-version placeholder in {}", .0.display())]
    UnterminatedPlaceholder(PathBuf),
}

/// All `*.html` files under `root`, recursively.
pub(crate) fn html_files(root: &Path) -> Result<Vec<PathBuf>, RewriteError> {
    let pattern = format!("{}/**/*.html", root.display());
    let mut files = Vec::new();
    for entry in glob::glob(&pattern)? {
        files.push(entry?);
    }
    Ok(files)
}

/// Render a relative path with forward slashes, as used in URLs.
pub(crate) fn url_path(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
