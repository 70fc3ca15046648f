//! Ingestion pipeline: discover, load, chunk, embed, upsert
//!
//! Files are processed one after another. A failure anywhere in a file's
//! load/chunk/embed/upsert sequence skips that whole file and is recorded
//! in the [`IngestReport`]; it never stops the batch.

use super::chunker::chunk_by_chars;
use super::scanner::discover_pdfs;
use crate::config::ChunkingConfig;
use crate::db::{hash_content, EntryMetadata, IndexEntry, VectorIndex};
use crate::error::{Result, SatPrepError};
use crate::llm::Embedder;
use crate::providers::DocumentLoader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const BATCH_SIZE: usize = 32;

/// Progress after each file
#[derive(Debug, Clone)]
pub struct IngestProgress {
    pub total_files: usize,
    pub processed_files: usize,
    pub path: PathBuf,
    pub succeeded: bool,
}

/// Callback invoked after each file
pub type ProgressCallback = Box<dyn Fn(IngestProgress) + Send + Sync>;

/// Result of ingesting one file
///
/// `Failed` means the file did not complete. Upserts are sent in batches,
/// so a failure in a later batch can leave the earlier batches of that file
/// in the index; nothing is rolled back.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    Ingested { path: PathBuf, chunks: usize },
    Failed { path: PathBuf, error: String },
}

impl FileOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Ingested { path, .. } | Self::Failed { path, .. } => path,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Ingested { .. })
    }
}

/// Per-file outcomes of one ingestion run, in processing order
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    pub outcomes: Vec<FileOutcome>,
}

impl IngestReport {
    pub fn total_files(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total_files() - self.succeeded()
    }

    pub fn total_chunks(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match o {
                FileOutcome::Ingested { chunks, .. } => *chunks,
                FileOutcome::Failed { .. } => 0,
            })
            .sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }
}

/// Offline pipeline that populates the vector index from a directory of PDFs
pub struct IngestionPipeline {
    loader: Arc<dyn DocumentLoader>,
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    chunking: ChunkingConfig,
}

impl IngestionPipeline {
    pub fn new(
        loader: Arc<dyn DocumentLoader>,
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        chunking: ChunkingConfig,
    ) -> Self {
        Self {
            loader,
            embedder,
            index,
            chunking,
        }
    }

    /// Every PDF under `root`, sorted.
    ///
    /// Fails with [`SatPrepError::NoInput`] when there are none. Callers
    /// run this before building any loader, embedder or index so an empty
    /// tree never reaches a provider.
    pub fn discover(root: &Path) -> Result<Vec<PathBuf>> {
        if !root.is_dir() {
            return Err(SatPrepError::Config(format!(
                "ROOT_DIRECTORY {} is not a directory",
                root.display()
            )));
        }

        let paths = discover_pdfs(root)?;
        if paths.is_empty() {
            return Err(SatPrepError::NoInput(root.to_path_buf()));
        }
        Ok(paths)
    }

    /// Ingest every PDF under `root`.
    ///
    /// Fails with [`SatPrepError::NoInput`] before touching the loader,
    /// embedder or index when the walk finds no PDFs.
    pub async fn run(
        &self,
        root: &Path,
        progress: Option<ProgressCallback>,
    ) -> Result<IngestReport> {
        let paths = Self::discover(root)?;

        tracing::info!(
            root = %root.display(),
            files = paths.len(),
            index = self.index.name(),
            "starting ingestion"
        );

        Ok(self.ingest_paths(&paths, progress).await)
    }

    /// Ingest the given files in order, isolating failures per file
    pub async fn ingest_paths(
        &self,
        paths: &[PathBuf],
        progress: Option<ProgressCallback>,
    ) -> IngestReport {
        let total_files = paths.len();
        let mut report = IngestReport::default();

        for (i, path) in paths.iter().enumerate() {
            let outcome = match self.ingest_file(path).await {
                Ok(chunks) => {
                    tracing::info!(path = %path.display(), chunks, "ingested");
                    FileOutcome::Ingested {
                        path: path.clone(),
                        chunks,
                    }
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to process PDF");
                    FileOutcome::Failed {
                        path: path.clone(),
                        error: e.to_string(),
                    }
                }
            };

            if let Some(ref cb) = progress {
                cb(IngestProgress {
                    total_files,
                    processed_files: i + 1,
                    path: path.clone(),
                    succeeded: outcome.is_success(),
                });
            }
            report.outcomes.push(outcome);
        }

        tracing::info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            chunks = report.total_chunks(),
            "ingestion finished"
        );
        report
    }

    /// Load, chunk, embed and upsert one file. Returns the chunk count.
    pub async fn ingest_file(&self, path: &Path) -> Result<usize> {
        let document = self.loader.load(path).await?;
        let text = document.text();
        let doc_hash = hash_content(&text);
        let source = document.source();

        let chunks = chunk_by_chars(&text, self.chunking.chunk_size, self.chunking.chunk_overlap);
        if chunks.is_empty() {
            return Ok(0);
        }

        let mut entries = Vec::with_capacity(chunks.len());
        for batch in chunks.chunks(BATCH_SIZE) {
            let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
            let embeddings = self.embedder.embed_batch(&texts).await?;
            if embeddings.len() != batch.len() {
                return Err(SatPrepError::Llm(format!(
                    "embedder returned {} vectors for {} chunks",
                    embeddings.len(),
                    batch.len()
                )));
            }

            for (chunk, embedding) in batch.iter().zip(embeddings) {
                entries.push(IndexEntry::new(
                    embedding,
                    chunk.text.clone(),
                    EntryMetadata {
                        source: source.clone(),
                        position: chunk.position,
                        seq: chunk.seq,
                        page_count: document.page_count(),
                        doc_hash: doc_hash.clone(),
                    },
                ));
            }
        }

        self.index.upsert(&entries).await?;
        Ok(entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts() {
        let report = IngestReport {
            outcomes: vec![
                FileOutcome::Ingested {
                    path: "a.pdf".into(),
                    chunks: 4,
                },
                FileOutcome::Failed {
                    path: "b.pdf".into(),
                    error: "bad xref".into(),
                },
                FileOutcome::Ingested {
                    path: "c.pdf".into(),
                    chunks: 2,
                },
            ],
        };
        assert_eq!(report.total_files(), 3);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.total_chunks(), 6);
        let failed: Vec<_> = report.failures().map(|o| o.path().to_path_buf()).collect();
        assert_eq!(failed, vec![PathBuf::from("b.pdf")]);
    }

    #[test]
    fn test_discover_empty_tree_is_no_input() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join("notes.txt"), "x").unwrap();
        let err = IngestionPipeline::discover(temp.path()).unwrap_err();
        assert!(matches!(err, SatPrepError::NoInput(_)));
    }

    #[test]
    fn test_discover_missing_root_is_config_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let err = IngestionPipeline::discover(&temp.path().join("gone")).unwrap_err();
        assert!(matches!(err, SatPrepError::Config(_)));
    }

    #[test]
    fn test_discover_finds_nested_pdfs() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("a/b")).unwrap();
        std::fs::write(temp.path().join("a/b/q.PDF"), "x").unwrap();
        let paths = IngestionPipeline::discover(temp.path()).unwrap();
        assert_eq!(paths, vec![temp.path().join("a/b/q.PDF")]);
    }
}
