//! Satprep Core Library
//!
//! Retrieval-augmented generation of SAT math practice questions.
//!
//! # Features
//! - Recursive PDF discovery and text extraction
//! - Fixed-size overlapping character chunking
//! - Embeddings and chat completions over OpenAI-compatible HTTP APIs
//! - Pinecone or local SQLite vector index
//! - Marker-based answer extraction with raw-text fallback

pub mod config;
pub mod db;
pub mod error;
pub mod index;
pub mod llm;
pub mod providers;
pub mod rag;
pub mod render;

pub use config::{
    ChunkingConfig, Config, IndexBackend, IndexConfig, LLMServiceConfig, RetrievalConfig,
};
pub use db::{
    open_index, EntryMetadata, IndexEntry, PineconeIndex, ScoredEntry, SqliteIndex, VectorIndex,
};
pub use error::{Error, Result, SatPrepError};
pub use index::{
    chunk_by_chars, discover_pdfs, Chunk, FileOutcome, IngestProgress, IngestReport,
    IngestionPipeline,
};
pub use llm::{
    ChatMessage, Embedder, GenerationOptions, Generator, HttpEmbedder, HttpGenerator, LLMClient,
    OpenAIClient,
};
pub use providers::{DocumentLoader, LoadedDocument, PdfLoader};
pub use rag::{
    extract_answer, normalize_code_fences, Difficulty, GeneratedAnswer, Language,
    QuestionGenerator, QuestionRequest,
};

/// Default cache directory name
pub const CACHE_DIR_NAME: &str = "satprep";

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "satprep";
