//! Indexing pipeline
//!
//! PDF discovery, chunking and the ingestion pipeline that fills the
//! vector index.

mod chunker;
mod ingest;
mod scanner;

pub use chunker::*;
pub use ingest::*;
pub use scanner::*;
