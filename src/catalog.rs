//! Recursive file enumeration.
//!
//! The catalog walks a directory tree depth-first in pre-order. Inside each
//! directory entries are visited in byte-wise file name order, with files
//! and subdirectories interleaved, so the same tree always yields the same
//! sequence. Subtitle matching relies on this order to break ties.

use crate::config::CompiledFilters;
use crate::media::lowercase_extension;
use std::collections::HashSet;
use std::fs::{self, DirEntry};
use std::path::{Path, PathBuf};

/// Errors raised while walking a directory tree.
#[derive(Debug)]
pub enum CatalogError {
    /// A directory (or one of its entries) could not be read.
    DirectoryReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectoryReadFailed { path, source } => {
                write!(f, "Error reading directory {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for CatalogError {}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Enumerates files under a root whose extension is in a given set.
pub struct FileCatalog<'a> {
    filters: &'a CompiledFilters,
}

impl<'a> FileCatalog<'a> {
    pub fn new(filters: &'a CompiledFilters) -> Self {
        Self { filters }
    }

    /// Returns every matching file under `root`, at any depth.
    ///
    /// `extensions` must be lowercase without a leading dot; file extensions
    /// are compared case-insensitively. Directories are recursed into
    /// unconditionally, but symlinks to directories are not followed.
    ///
    /// # Errors
    ///
    /// Fails on the first directory that cannot be read.
    pub fn enumerate(&self, root: &Path, extensions: &HashSet<String>) -> CatalogResult<Vec<PathBuf>> {
        let mut found = Vec::new();
        self.walk(root, root, extensions, &mut found)?;
        Ok(found)
    }

    fn walk(
        &self,
        root: &Path,
        dir: &Path,
        extensions: &HashSet<String>,
        found: &mut Vec<PathBuf>,
    ) -> CatalogResult<()> {
        let read_failed = |source| CatalogError::DirectoryReadFailed {
            path: dir.to_path_buf(),
            source,
        };

        let mut entries: Vec<DirEntry> = fs::read_dir(dir)
            .map_err(read_failed)?
            .collect::<Result<_, _>>()
            .map_err(read_failed)?;
        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let path = entry.path();
            let file_type = entry.file_type().map_err(read_failed)?;

            if file_type.is_dir() {
                self.walk(root, &path, extensions, found)?;
                continue;
            }

            let matches = lowercase_extension(&path).is_some_and(|ext| extensions.contains(&ext));
            let relative = path.strip_prefix(root).unwrap_or(&path);
            if matches && self.filters.should_include(relative) {
                found.push(path);
            }
        }

        Ok(())
    }
}
