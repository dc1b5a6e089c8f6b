//! PDF text extraction and windowed chunking

use crate::DocumentChunker;
use async_trait::async_trait;
use awaas_core::{AwaasError, Result};
use tracing::debug;
use uuid::Uuid;

/// Characters per chunk
pub const CHUNK_SIZE: usize = 1500;
/// Characters of overlap between consecutive chunks
pub const CHUNK_OVERLAP: usize = 200;

/// Chunker for uploaded PDFs.
///
/// Only `.pdf` files (case-insensitive) produce chunks; any other file type
/// yields an empty split list.
pub struct PdfChunker {
    chunk_size: usize,
    overlap: usize,
}

impl Default for PdfChunker {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfChunker {
    /// Create a chunker with the production window
    pub fn new() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
            overlap: CHUNK_OVERLAP,
        }
    }
}

#[async_trait]
impl DocumentChunker for PdfChunker {
    async fn chunk(&self, bytes: &[u8], filename: &str) -> Result<Vec<String>> {
        if !filename.to_lowercase().ends_with(".pdf") {
            debug!("Skipping non-PDF file: {}", filename);
            return Ok(Vec::new());
        }

        let bytes = bytes.to_vec();
        let (chunk_size, overlap) = (self.chunk_size, self.overlap);

        // PDF parsing is CPU-bound; keep it off the reactor
        tokio::task::spawn_blocking(move || {
            let text = extract_text(&bytes)?;
            Ok(split_text(&text, chunk_size, overlap))
        })
        .await
        .map_err(|e| AwaasError::ingest(format!("Chunking task failed: {}", e)))?
    }
}

/// Extract text from PDF bytes.
///
/// pdf_extract works with paths, so the bytes round-trip through a temp file.
fn extract_text(bytes: &[u8]) -> Result<String> {
    let temp_path = std::env::temp_dir().join(format!("awaas_upload_{}.pdf", Uuid::new_v4()));

    std::fs::write(&temp_path, bytes)
        .map_err(|e| AwaasError::ingest(format!("Failed to write temp PDF file: {}", e)))?;

    let result = pdf_extract::extract_text(&temp_path)
        .map_err(|e| AwaasError::ingest(format!("PDF extraction error: {}", e)));

    let _ = std::fs::remove_file(&temp_path);

    result
}

/// Split content into overlapping character windows, preferring to break at
/// a sentence or line boundary past the window midpoint. Whitespace-only
/// chunks are dropped.
fn split_text(content: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = content.chars().collect();
    let total_len = chars.len();
    let mut splits = Vec::new();

    if total_len == 0 {
        return splits;
    }

    let mut start = 0;
    while start < total_len {
        let end = (start + chunk_size).min(total_len);

        let actual_end = if end < total_len {
            let boundary = chars[start..end]
                .iter()
                .rposition(|&c| c == '.' || c == '!' || c == '?' || c == '\n');
            match boundary {
                Some(pos) if pos > chunk_size / 2 => start + pos + 1,
                _ => end,
            }
        } else {
            end
        };

        let chunk: String = chars[start..actual_end].iter().collect();
        let trimmed = chunk.trim();
        if !trimmed.is_empty() {
            splits.push(trimmed.to_string());
        }

        start = if actual_end >= total_len {
            total_len
        } else {
            actual_end.saturating_sub(overlap)
        };
    }

    splits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_non_pdf_yields_no_chunks() {
        let chunker = PdfChunker::new();
        let splits = chunker.chunk(b"plain text", "notes.txt").await.unwrap();
        assert!(splits.is_empty());
    }

    #[tokio::test]
    async fn test_extension_check_is_case_insensitive() {
        let chunker = PdfChunker::new();
        // garbage bytes with a .PDF name reach extraction and fail there
        let result = chunker.chunk(b"not a real pdf", "SCHEME.PDF").await;
        assert!(result.is_err());
    }

    #[test]
    fn test_split_empty_content() {
        assert!(split_text("", 50, 10).is_empty());
        assert!(split_text("   \n  ", 50, 10).is_empty());
    }

    #[test]
    fn test_split_short_content_single_chunk() {
        let splits = split_text("  A short passage.  ", 50, 10);
        assert_eq!(splits, vec!["A short passage.".to_string()]);
    }

    #[test]
    fn test_split_breaks_at_sentence_boundary() {
        let text = "First sentence here. Second sentence there. Third one.";
        let splits = split_text(text, 50, 10);

        assert_eq!(splits.len(), 2);
        assert!(splits[0].ends_with("there."));
        assert!(splits[1].contains("Third one."));
    }

    #[test]
    fn test_split_overlap_repeats_tail() {
        let text = "First sentence here. Second sentence there. Third one.";
        let splits = split_text(text, 50, 10);

        // the second window starts `overlap` characters before the break
        assert!(splits[0].contains("there."));
        assert!(splits[1].contains("there."));
    }

    #[test]
    fn test_split_without_boundaries_cuts_at_window() {
        let text = "a".repeat(120);
        let splits = split_text(&text, 50, 10);

        assert_eq!(splits.len(), 3);
        assert_eq!(splits[0].len(), 50);
        assert_eq!(splits[1].len(), 50);
        assert_eq!(splits[2].len(), 40);
    }

    #[test]
    fn test_split_handles_multibyte_text() {
        // Devanagari sentences; boundary positions are char-based
        let sentence = "प्रधानमंत्री आवास योजना सबके लिए घर देती है। यह एक सरकारी योजना है।";
        let text = sentence.repeat(5);
        let splits = split_text(&text, 100, 20);

        assert!(splits.len() > 1);
        for split in &splits {
            assert!(!split.trim().is_empty());
        }
    }
}
