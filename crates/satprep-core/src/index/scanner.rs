//! PDF discovery for ingestion

use crate::error::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Scan options
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub follow_symlinks: bool,
    /// File extension to match, compared case-insensitively
    pub extension: String,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            follow_symlinks: true,
            extension: "pdf".to_string(),
        }
    }
}

/// Recursively collect every `.pdf` file (any case) under `root`, sorted.
pub fn discover_pdfs(root: &Path) -> Result<Vec<PathBuf>> {
    scan_files(root, &ScanOptions::default())
}

/// Scan directory for files with the configured extension.
///
/// Nothing is excluded: hidden and nested directories are searched too.
/// The result is sorted so repeated runs over the same tree visit files in
/// the same order.
pub fn scan_files(root: &Path, options: &ScanOptions) -> Result<Vec<PathBuf>> {
    let mut results = Vec::new();

    let walker = WalkDir::new(root).follow_links(options.follow_symlinks);

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let matches = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&options.extension));
        if matches {
            results.push(path.to_path_buf());
        }
    }

    results.sort();
    Ok(results)
}
