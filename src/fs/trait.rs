//! FileSystem trait definition

use anyhow::Result;
use std::path::{Path, PathBuf};

/// How far below a directory a file listing descends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    /// Only files directly inside the directory
    Shallow,
    /// Every file in the directory tree
    Recursive,
}

/// Abstraction over file system operations for testability
pub trait FileSystem: Send + Sync {
    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Check if path is a file
    fn is_file(&self, path: &Path) -> bool;

    /// Read file contents as string
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Write a string to a file, replacing any previous content
    fn write_string(&self, path: &Path, content: &str) -> Result<()>;

    /// Create a directory and all missing parents
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// List regular files below `dir` whose extension equals `extension`.
    ///
    /// A missing directory yields an empty list. Order is unspecified.
    fn list_files(&self, dir: &Path, extension: &str, depth: Depth) -> Result<Vec<PathBuf>>;
}

/// Returns true when `path` carries exactly the given extension
pub(crate) fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == extension)
        .unwrap_or(false)
}
