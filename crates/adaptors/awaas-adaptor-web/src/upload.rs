//! The `/api/upload` route
//!
//! Multipart field `file` → chunker → vector index → chunk count. The route
//! only orchestrates; extraction and indexing live behind the ingest traits
//! so the contract here is testable with mocks.

use crate::{ApiError, ChatUiServer};
use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Json, Response};
use awaas_ingest::{DocumentChunker, VectorIndex};
use serde::Serialize;
use tracing::{error, info};

/// Success body for an indexed upload
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Human-readable confirmation
    pub message: String,
    /// Number of chunks the index reported adding
    pub chunks_added: usize,
}

/// `POST /api/upload`
pub(crate) async fn upload_handler(
    State(state): State<ChatUiServer>,
    mut multipart: Multipart,
) -> Response {
    let mut file: Option<(String, Vec<u8>)> = None;

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                match field.bytes().await {
                    Ok(bytes) => {
                        file = Some((filename, bytes.to_vec()));
                        break;
                    }
                    Err(e) => {
                        error!("Error reading upload body: {}", e);
                        return ApiError::Internal("Internal server error".to_string())
                            .into_response();
                    }
                }
            }
            Ok(Some(_)) => continue,
            Ok(None) => break,
            Err(e) => {
                error!("Error reading multipart form: {}", e);
                return ApiError::BadRequest("No file provided".to_string()).into_response();
            }
        }
    }

    let Some((filename, bytes)) = file.filter(|(name, _)| !name.is_empty()) else {
        return ApiError::BadRequest("No file provided".to_string()).into_response();
    };

    match process_upload(state.chunker(), state.index(), &bytes, &filename).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Chunk and index one uploaded document.
///
/// Zero splits is a client error (unsupported or empty document); any
/// collaborator failure collapses to a generic 500 with the detail kept in
/// the logs only.
pub(crate) async fn process_upload(
    chunker: &dyn DocumentChunker,
    index: &dyn VectorIndex,
    bytes: &[u8],
    filename: &str,
) -> std::result::Result<UploadResponse, ApiError> {
    let splits = chunker.chunk(bytes, filename).await.map_err(|e| {
        error!("Error in upload endpoint: {}", e);
        ApiError::Internal("Internal server error".to_string())
    })?;

    if splits.is_empty() {
        return Err(ApiError::BadRequest("Invalid or empty document".to_string()));
    }

    let chunks_added = index.add(&splits, filename).await.map_err(|e| {
        error!("Error in upload endpoint: {}", e);
        ApiError::Internal("Internal server error".to_string())
    })?;

    info!("Processed {} into {} chunks", filename, chunks_added);
    Ok(UploadResponse {
        message: format!("Successfully processed {}", filename),
        chunks_added,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use awaas_core::{AwaasError, Result};
    use mockall::mock;

    mock! {
        Chunker {}

        #[async_trait]
        impl DocumentChunker for Chunker {
            async fn chunk(&self, bytes: &[u8], filename: &str) -> Result<Vec<String>>;
        }
    }

    mock! {
        Index {}

        #[async_trait]
        impl VectorIndex for Index {
            async fn add(&self, splits: &[String], filename: &str) -> Result<usize>;
        }
    }

    #[tokio::test]
    async fn test_zero_chunks_is_invalid_document() {
        let mut chunker = MockChunker::new();
        chunker.expect_chunk().returning(|_, _| Ok(Vec::new()));
        let mut index = MockIndex::new();
        index.expect_add().never();

        let err = process_upload(&chunker, &index, b"bytes", "scan.txt")
            .await
            .unwrap_err();
        match err {
            ApiError::BadRequest(msg) => assert_eq!(msg, "Invalid or empty document"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_successful_upload_reports_index_count() {
        let mut chunker = MockChunker::new();
        chunker
            .expect_chunk()
            .withf(|_, filename| filename == "pmay.pdf")
            .returning(|_, _| Ok(vec!["first chunk".into(), "second chunk".into()]));
        let mut index = MockIndex::new();
        index
            .expect_add()
            .withf(|splits, filename| splits.len() == 2 && filename == "pmay.pdf")
            .returning(|splits, _| Ok(splits.len()));

        let response = process_upload(&chunker, &index, b"%PDF-", "pmay.pdf")
            .await
            .unwrap();
        assert_eq!(response.message, "Successfully processed pmay.pdf");
        assert_eq!(response.chunks_added, 2);
    }

    #[tokio::test]
    async fn test_chunker_failure_collapses_to_internal_error() {
        let mut chunker = MockChunker::new();
        chunker
            .expect_chunk()
            .returning(|_, _| Err(AwaasError::ingest("corrupt xref table")));
        let index = MockIndex::new();

        let err = process_upload(&chunker, &index, b"%PDF-", "broken.pdf")
            .await
            .unwrap_err();
        match err {
            ApiError::Internal(msg) => {
                assert_eq!(msg, "Internal server error");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_index_failure_collapses_to_internal_error() {
        let mut chunker = MockChunker::new();
        chunker
            .expect_chunk()
            .returning(|_, _| Ok(vec!["chunk".into()]));
        let mut index = MockIndex::new();
        index
            .expect_add()
            .returning(|_, _| Err(AwaasError::index("vector service unreachable")));

        let err = process_upload(&chunker, &index, b"%PDF-", "pmay.pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Internal(_)));
    }
}
