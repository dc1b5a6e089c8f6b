//! Vector service client

use crate::VectorIndex;
use async_trait::async_trait;
use awaas_core::{get_env_or, AwaasError, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

/// Collection all scheme documents are indexed into
pub const COLLECTION_NAME: &str = "rag_app";

#[derive(Debug, Deserialize)]
struct AddResponse {
    chunks_added: Option<usize>,
}

/// Stable per-file chunk ids, `doc_<filename>_<i>`
fn chunk_ids(filename: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("doc_{}_{}", filename, i)).collect()
}

/// Client for the vector service's collection API
pub struct HttpVectorIndex {
    /// HTTP client (reused for connection pooling)
    client: Client,
    /// Vector service base URL
    endpoint: String,
}

impl HttpVectorIndex {
    /// Create a client for the given vector service base URL
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to create HTTP client"),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    /// Create a client from `AWAAS_VECTOR_URL` (default `http://localhost:8000`)
    pub fn from_env() -> Self {
        Self::new(&get_env_or("AWAAS_VECTOR_URL", "http://localhost:8000"))
    }
}

#[async_trait]
impl VectorIndex for HttpVectorIndex {
    async fn add(&self, splits: &[String], filename: &str) -> Result<usize> {
        let ids = chunk_ids(filename, splits.len());

        let resp = self
            .client
            .post(format!("{}/collections/add", self.endpoint))
            .json(&serde_json::json!({
                "collection": COLLECTION_NAME,
                "filename": filename,
                "ids": ids,
                "documents": splits,
            }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(AwaasError::index(format!(
                "Vector service returned {}: {}",
                status, body
            )));
        }

        // A response without a count falls back to what we submitted
        let added = resp
            .json::<AddResponse>()
            .await
            .ok()
            .and_then(|r| r.chunks_added)
            .unwrap_or(splits.len());

        info!("Indexed {} chunks from {}", added, filename);
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trailing_slash_is_trimmed() {
        let index = HttpVectorIndex::new("http://localhost:8000/");
        assert_eq!(index.endpoint, "http://localhost:8000");
    }

    #[test]
    fn test_chunk_ids_are_per_file_and_ordered() {
        assert_eq!(
            chunk_ids("pmay.pdf", 3),
            vec!["doc_pmay.pdf_0", "doc_pmay.pdf_1", "doc_pmay.pdf_2"]
        );
        assert!(chunk_ids("x.pdf", 0).is_empty());
    }

    #[test]
    fn test_add_response_tolerates_missing_count() {
        let with: AddResponse = serde_json::from_str(r#"{"chunks_added": 7}"#).unwrap();
        assert_eq!(with.chunks_added, Some(7));

        let without: AddResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(without.chunks_added, None);
    }
}
