//! Source resolution error types.

use std::path::PathBuf;

/// Error resolving directive content.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Path escapes its configured root.
    #[error("path {path:?} escapes the {root} directory")]
    PathEscapesRoot {
        /// Offending path as written in the directive.
        path: String,
        /// Human name of the root ("partials" or "examples").
        root: &'static str,
    },

    /// File missing or unreadable.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// Resolved filesystem path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// External fetch failed.
    #[error("failed to fetch {org}/{repo}@{commit} {path}: {message}")]
    Fetch {
        /// GitHub organization.
        org: String,
        /// Repository name.
        repo: String,
        /// Pinned commit.
        commit: String,
        /// File path within the repository.
        path: String,
        /// Transport or HTTP status detail.
        message: String,
    },
}
