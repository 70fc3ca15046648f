//! PDF loader for extracting text from PDF files

use crate::error::{Result, SatPrepError};
use crate::providers::{DocumentLoader, LoadedDocument};
use async_trait::async_trait;
use std::fs;
use std::path::Path;

/// Page separator emitted by the text extractor between pages
const PAGE_BREAK: char = '\u{000C}';

/// Loader for extracting text from PDF files
pub struct PdfLoader;

impl Default for PdfLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfLoader {
    /// Create a new PdfLoader
    pub fn new() -> Self {
        Self
    }

    /// Extract text from a PDF file
    fn extract_text_from_pdf(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).map_err(|e| {
            SatPrepError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read PDF file {:?}: {}", path, e),
            ))
        })?;

        // pdf-extract panics on some malformed inputs
        let text = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(&bytes))
            .map_err(|_| SatPrepError::Pdf(format!("PDF parser panicked on {:?}", path)))?
            .map_err(|e| {
                SatPrepError::Pdf(format!("Failed to extract text from PDF {:?}: {}", path, e))
            })?;

        if text.trim().is_empty() {
            return Err(SatPrepError::Pdf(format!(
                "PDF file {:?} contains no extractable text (may be image-based)",
                path
            )));
        }

        Ok(text)
    }
}

/// Split extracted text into pages, dropping blank trailing pages
fn split_pages(text: &str) -> Vec<String> {
    let mut pages: Vec<String> = text.split(PAGE_BREAK).map(str::to_string).collect();
    while pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
        pages.pop();
    }
    pages
}

#[async_trait]
impl DocumentLoader for PdfLoader {
    fn loader_type(&self) -> &'static str {
        "pdf"
    }

    async fn load(&self, path: &Path) -> Result<LoadedDocument> {
        let text = self.extract_text_from_pdf(path)?;
        Ok(LoadedDocument::new(path, split_pages(&text)))
    }
}
