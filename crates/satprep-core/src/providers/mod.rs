//! Document loading
//!
//! A [`DocumentLoader`] turns a file path into per-page plain text. The
//! ingestion pipeline only depends on this trait, so tests can substitute
//! loaders that fail on chosen paths.

use crate::error::Result;
use std::path::{Path, PathBuf};

pub mod pdf;

pub use pdf::PdfLoader;

/// Loader trait - every document source must implement this
#[async_trait::async_trait]
pub trait DocumentLoader: Send + Sync {
    /// Loader type identifier (e.g., "pdf")
    fn loader_type(&self) -> &'static str;

    /// Extract the text of one document
    async fn load(&self, path: &Path) -> Result<LoadedDocument>;
}

/// Text extracted from one source document
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    /// Source path
    pub path: PathBuf,

    /// Extracted text, one entry per page
    pub pages: Vec<String>,
}

impl LoadedDocument {
    pub fn new(path: impl Into<PathBuf>, pages: Vec<String>) -> Self {
        Self {
            path: path.into(),
            pages,
        }
    }

    /// Concatenated text of all pages, separated by newlines
    pub fn text(&self) -> String {
        self.pages.join("\n")
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Source path as a display string, used in index metadata
    pub fn source(&self) -> String {
        self.path.to_string_lossy().to_string()
    }
}
