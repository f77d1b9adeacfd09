use crate::category::MediaCategory;
use crate::error::{RenameError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Files to process, sorted by name.
    pub included: Vec<PathBuf>,
    /// Every other directory entry, sorted by name.
    pub excluded: Vec<PathBuf>,
}

/// Lists the immediate children of `dir` that belong to `category`.
///
/// A missing directory yields an empty selection.
pub fn select_files(dir: &Path, category: &MediaCategory) -> Result<Selection> {
    let mut selection = Selection::default();
    if !dir.exists() {
        debug!(dir = %dir.display(), "directory does not exist");
        return Ok(selection);
    }

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();
    for entry in walker {
        let entry = entry.map_err(|source| RenameError::ListDirectory {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy();
        if path.is_file() && category.matches_extension(&name) {
            selection.included.push(path.to_path_buf());
        } else {
            selection.excluded.push(path.to_path_buf());
        }
    }

    info!(count = selection.included.len(), "included files");
    info!(excluded = ?selection.excluded, "excluded files");
    Ok(selection)
}
