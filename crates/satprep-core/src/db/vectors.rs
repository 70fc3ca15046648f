//! Vector storage operations
//!
//! Stores embeddings as BLOBs and computes cosine similarity in Rust.

use super::{EntryMetadata, IndexEntry, ScoredEntry, SqliteIndex, VectorIndex};
use crate::error::{Result, SatPrepError};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::params;

impl SqliteIndex {
    /// Number of entries stored under this index name
    pub fn count(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM entries WHERE index_name = ?1",
            params![self.name],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn insert_entries(&self, entries: &[IndexEntry]) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let mut conn = self.lock()?;

        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO entries
                 (id, index_name, text, metadata, embedding, dimensions, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for entry in entries {
                let metadata = serde_json::to_string(&entry.metadata)?;
                stmt.execute(params![
                    entry.id,
                    self.name,
                    entry.text,
                    metadata,
                    embedding_to_bytes(&entry.embedding),
                    entry.embedding.len() as i64,
                    now
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<ScoredEntry>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, text, metadata, embedding FROM entries WHERE index_name = ?1",
        )?;

        let rows = stmt
            .query_map(params![self.name], |row| {
                let id: String = row.get(0)?;
                let text: String = row.get(1)?;
                let metadata: String = row.get(2)?;
                let bytes: Vec<u8> = row.get(3)?;
                Ok((id, text, metadata, bytes_to_embedding(&bytes)))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut scored = Vec::with_capacity(rows.len());
        for (id, text, metadata, stored) in rows {
            let metadata: EntryMetadata = serde_json::from_str(&metadata)?;
            scored.push(ScoredEntry {
                id,
                text,
                metadata,
                score: cosine_similarity(embedding, &stored),
            });
        }

        // Sort by similarity (descending)
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(top_k);
        Ok(scored)
    }
}

#[async_trait]
impl VectorIndex for SqliteIndex {
    fn name(&self) -> &str {
        &self.name
    }

    async fn upsert(&self, entries: &[IndexEntry]) -> Result<()> {
        if let Some(bad) = entries.iter().find(|e| e.embedding.is_empty()) {
            return Err(SatPrepError::Index(format!(
                "entry {} has an empty embedding",
                bad.id
            )));
        }
        self.insert_entries(entries)
    }

    async fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<ScoredEntry>> {
        self.search(embedding, top_k)
    }
}

/// Convert f32 embedding to bytes (little-endian)
pub fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert bytes to f32 embedding
pub fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

/// Compute cosine similarity between two embeddings
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(text: &str, embedding: Vec<f32>) -> IndexEntry {
        IndexEntry::new(
            embedding,
            text.to_string(),
            EntryMetadata {
                source: format!("{text}.pdf"),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_embedding_bytes() {
        let original = vec![1.0f32, 2.0, 3.0, -1.5];
        let bytes = embedding_to_bytes(&original);
        assert_eq!(bytes.len(), 16);
        assert_eq!(bytes_to_embedding(&bytes), original);
    }

    #[test]
    fn test_cosine_similarity_identical() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        let sim = cosine_similarity(&a, &b);
        assert!((sim - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        let sim = cosine_similarity(&a, &b);
        assert!(sim.abs() < 0.0001);
    }

    #[test]
    fn test_cosine_similarity_mismatched_dims() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0]), 0.0);
    }

    #[tokio::test]
    async fn test_empty_index_returns_nothing() {
        let index = SqliteIndex::open_in_memory("sat-math").unwrap();
        let results = index.query(&[1.0, 0.0], 3).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_query_orders_best_first_and_limits() {
        let index = SqliteIndex::open_in_memory("sat-math").unwrap();
        index
            .upsert(&[
                entry("far", vec![0.0, 1.0]),
                entry("near", vec![1.0, 0.1]),
                entry("exact", vec![1.0, 0.0]),
                entry("mid", vec![1.0, 1.0]),
            ])
            .await
            .unwrap();

        let results = index.query(&[1.0, 0.0], 3).await.unwrap();
        let texts: Vec<&str> = results.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["exact", "near", "mid"]);
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(results[0].metadata.source, "exact.pdf");
    }

    #[tokio::test]
    async fn test_fewer_entries_than_k() {
        let index = SqliteIndex::open_in_memory("sat-math").unwrap();
        index.upsert(&[entry("only", vec![0.5, 0.5])]).await.unwrap();
        assert_eq!(index.query(&[1.0, 0.0], 3).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicates_are_not_merged() {
        let index = SqliteIndex::open_in_memory("sat-math").unwrap();
        index.upsert(&[entry("same", vec![1.0, 0.0])]).await.unwrap();
        index.upsert(&[entry("same", vec![1.0, 0.0])]).await.unwrap();
        assert_eq!(index.count().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_indexes_are_isolated_by_name() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("index.sqlite");
        let algebra = SqliteIndex::open(&path, "algebra").unwrap();
        let geometry = SqliteIndex::open(&path, "geometry").unwrap();

        algebra.upsert(&[entry("x", vec![1.0])]).await.unwrap();
        assert_eq!(algebra.count().unwrap(), 1);
        assert_eq!(geometry.count().unwrap(), 0);
        assert!(geometry.query(&[1.0], 3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_embedding_rejected() {
        let index = SqliteIndex::open_in_memory("sat-math").unwrap();
        let err = index.upsert(&[entry("bad", vec![])]).await.unwrap_err();
        assert!(matches!(err, SatPrepError::Index(_)));
    }
}
