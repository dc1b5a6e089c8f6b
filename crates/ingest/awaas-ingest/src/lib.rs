//! Document Ingestion for AwaasChat
//!
//! Turns uploaded scheme documents into indexed chunks the RAG backend can
//! retrieve. Two narrow collaborators keep the upload route testable:
//!
//! - `DocumentChunker` — raw bytes to ordered text splits
//! - `VectorIndex` — splits to the vector collection, returning a count
//!
//! Production wiring: `PdfChunker` (PDF text extraction plus windowed
//! splitting) into `HttpVectorIndex` (the vector service's JSON API).

use async_trait::async_trait;
use awaas_core::Result;

mod chunker;
mod vector;

pub use chunker::PdfChunker;
pub use vector::{HttpVectorIndex, COLLECTION_NAME};

/// Splits an uploaded document into ordered text chunks
#[async_trait]
pub trait DocumentChunker: Send + Sync {
    /// Chunk the raw file bytes.
    ///
    /// An unsupported file type yields an empty list, not an error; the
    /// caller decides how to report it.
    async fn chunk(&self, bytes: &[u8], filename: &str) -> Result<Vec<String>>;
}

/// Indexes text chunks into the vector collection
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Add the splits for one file, returning how many chunks were indexed
    async fn add(&self, splits: &[String], filename: &str) -> Result<usize>;
}
