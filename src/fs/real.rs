use super::r#trait::has_extension;
use super::{Depth, FileSystem};
use anyhow::{Context, Result};
use ignore::WalkBuilder;
use std::fs;
use std::path::{Path, PathBuf};

pub struct RealFileSystem;

impl RealFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RealFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).context(format!("Failed to read file {:?}", path))
    }

    fn write_string(&self, path: &Path, content: &str) -> Result<()> {
        fs::write(path, content).context(format!("Failed to write file {:?}", path))
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).context(format!("Failed to create directory {:?}", path))
    }

    fn list_files(&self, dir: &Path, extension: &str, depth: Depth) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let max_depth = match depth {
            Depth::Shallow => Some(1),
            Depth::Recursive => None,
        };

        // Documentation corpora are walked verbatim: no ignore files, hidden entries included.
        let mut files = Vec::new();
        for result in WalkBuilder::new(dir)
            .standard_filters(false)
            .max_depth(max_depth)
            .build()
        {
            let entry = result.context(format!("Failed to walk directory {:?}", dir))?;
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if is_file && has_extension(entry.path(), extension) {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }
}
