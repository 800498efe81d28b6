//! Rooted filesystem access for partials and example files.

use std::path::{Path, PathBuf};

use crate::error::SourceError;

/// Root directory for `$Partial` documents.
#[derive(Debug, Clone)]
pub struct PartialsRoot {
    dir: PathBuf,
}

impl PartialsRoot {
    /// Create a root at the given directory.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Read a partial by its directive path.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::PathEscapesRoot`] for traversal attempts and
    /// [`SourceError::Read`] when the file cannot be read.
    pub fn read(&self, path: &str) -> Result<String, SourceError> {
        read_contained(&self.dir, path, "partials")
    }
}

/// Root directory for internal `$CodeSample` files.
#[derive(Debug, Clone)]
pub struct ExamplesRoot {
    dir: PathBuf,
}

impl ExamplesRoot {
    /// Create a root at the given directory.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Read an example source file by its directive path.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::PathEscapesRoot`] for traversal attempts and
    /// [`SourceError::Read`] when the file cannot be read.
    pub fn read(&self, path: &str) -> Result<String, SourceError> {
        read_contained(&self.dir, path, "examples")
    }
}

/// Read `path` under `root`, rejecting anything that could escape it.
///
/// Rejects `..` components outright rather than canonicalizing, matching
/// the fail-fast contract for authoring errors: a directive path should
/// never need traversal.
fn read_contained(root: &Path, path: &str, root_name: &'static str) -> Result<String, SourceError> {
    let relative = path.trim_start_matches('/');
    let escapes = Path::new(relative).components().any(|c| {
        !matches!(
            c,
            std::path::Component::Normal(_) | std::path::Component::CurDir
        )
    });
    if escapes || relative.is_empty() {
        return Err(SourceError::PathEscapesRoot {
            path: path.to_owned(),
            root: root_name,
        });
    }

    let resolved = root.join(relative);
    tracing::debug!(path = %resolved.display(), root = root_name, "reading source file");
    std::fs::read_to_string(&resolved).map_err(|source| SourceError::Read {
        path: resolved,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fixture() -> (tempfile::TempDir, PartialsRoot) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/greeting.mdx"), "Hello\n").unwrap();
        let root = PartialsRoot::new(dir.path());
        (dir, root)
    }

    #[test]
    fn test_read_inside_root() {
        let (_dir, root) = fixture();
        assert_eq!(root.read("/sub/greeting.mdx").unwrap(), "Hello\n");
        // Leading slash optional
        assert_eq!(root.read("sub/greeting.mdx").unwrap(), "Hello\n");
    }

    #[test]
    fn test_rejects_traversal() {
        let (_dir, root) = fixture();
        let err = root.read("/sub/../../etc/passwd").unwrap_err();
        assert!(matches!(err, SourceError::PathEscapesRoot { .. }));

        let err = root.read("..").unwrap_err();
        assert!(matches!(err, SourceError::PathEscapesRoot { .. }));
    }

    #[test]
    fn test_rejects_empty_path() {
        let (_dir, root) = fixture();
        assert!(matches!(
            root.read("/").unwrap_err(),
            SourceError::PathEscapesRoot { .. }
        ));
    }

    #[test]
    fn test_missing_file() {
        let (_dir, root) = fixture();
        assert!(matches!(
            root.read("/nope.mdx").unwrap_err(),
            SourceError::Read { .. }
        ));
    }
}
