//! Property tests for fixed-size character chunking

use proptest::prelude::*;
use satprep_core::chunk_by_chars;

proptest! {
    #[test]
    fn chunks_cover_text_with_exact_overlap(
        text in "[a-zA-Z0-9 éß∑\n]{0,2000}",
        size in 2usize..600,
        overlap_frac in 0usize..100,
    ) {
        let overlap = size * overlap_frac / 100;
        let overlap = overlap.min(size - 1);
        let chunks = chunk_by_chars(&text, size, overlap);
        let total: Vec<char> = text.chars().collect();

        if total.is_empty() {
            prop_assert!(chunks.is_empty());
            return Ok(());
        }

        for (i, chunk) in chunks.iter().enumerate() {
            prop_assert_eq!(chunk.seq, i);
            prop_assert!(chunk.char_len() <= size);
            if i + 1 < chunks.len() {
                prop_assert_eq!(chunk.char_len(), size);
            }
            let expected: String = total[chunk.position..chunk.position + chunk.char_len()]
                .iter()
                .collect();
            prop_assert_eq!(&chunk.text, &expected);
        }

        for pair in chunks.windows(2) {
            prop_assert_eq!(pair[1].position - pair[0].position, size - overlap);
        }

        let last = chunks.last().unwrap();
        prop_assert_eq!(last.position + last.char_len(), total.len());
    }
}

#[test]
fn default_sizes_on_long_text() {
    let text = "x".repeat(1200);
    let chunks = chunk_by_chars(&text, 512, 50);
    let starts: Vec<usize> = chunks.iter().map(|c| c.position).collect();
    assert_eq!(starts, vec![0, 462, 924]);
    assert_eq!(chunks[2].char_len(), 276);
}
