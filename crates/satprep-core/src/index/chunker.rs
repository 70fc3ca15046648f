//! Document chunking for embedding

/// Chunking configuration
pub const CHUNK_SIZE_CHARS: usize = 512;
pub const CHUNK_OVERLAP_CHARS: usize = 50;

/// Document chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
    /// Offset of the first character within the document, in chars
    pub position: usize,
    /// Sequence number within the document
    pub seq: usize,
}

impl Chunk {
    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Fixed-size character chunking.
///
/// Every chunk but the last holds exactly `chunk_size` characters and
/// starts `chunk_size - overlap` characters after its predecessor, so
/// consecutive chunks share exactly `overlap` characters. Sizes count
/// Unicode scalar values, never bytes. An `overlap >= chunk_size` is clamped
/// to `chunk_size - 1`.
pub fn chunk_by_chars(content: &str, chunk_size: usize, overlap: usize) -> Vec<Chunk> {
    if content.is_empty() || chunk_size == 0 {
        return Vec::new();
    }

    let overlap = overlap.min(chunk_size - 1);
    let step = chunk_size - overlap;

    // Byte offset of every char boundary, including the end of the string
    let boundaries: Vec<usize> = content
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(content.len()))
        .collect();
    let total_chars = boundaries.len() - 1;

    let mut chunks = Vec::with_capacity(total_chars / step + 1);
    let mut start = 0;

    loop {
        let end = (start + chunk_size).min(total_chars);
        chunks.push(Chunk {
            text: content[boundaries[start]..boundaries[end]].to_string(),
            position: start,
            seq: chunks.len(),
        });

        if end >= total_chars {
            break;
        }
        start += step;
    }

    chunks
}
