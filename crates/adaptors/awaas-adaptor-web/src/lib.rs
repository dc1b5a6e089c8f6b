//! Web UI adaptor for AwaasChat
//!
//! Serves the embedded chat page at `/` and exposes the two API routes the
//! page talks to:
//!
//! - `POST /api/chat` — forwards the latest user message to the backend
//!   gateway and streams its SSE reply straight through (see [`proxy`])
//! - `POST /api/upload` — chunks an uploaded scheme document and indexes it
//!   through the ingest collaborators (see [`upload`])
//!
//! All RAG logic lives behind those collaborators; this crate is
//! presentation plus request forwarding.

#![warn(missing_docs)]
#![warn(clippy::all)]

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use awaas_core::{get_env_or, Result};
use awaas_ingest::{DocumentChunker, HttpVectorIndex, PdfChunker, VectorIndex};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

mod proxy;
mod template;
mod upload;

pub use proxy::GatewayClient;
pub use template::render_page;

/// Uploads above this are rejected by the HTTP layer
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Web UI server configuration
#[derive(Clone)]
pub struct ChatUiConfig {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Backend gateway base URL (its `/chat` endpoint is consumed)
    pub backend_url: String,
}

impl Default for ChatUiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3000,
            backend_url: "http://localhost:8000".into(),
        }
    }
}

impl ChatUiConfig {
    /// Build the configuration from `AWAAS_*` environment variables
    pub fn from_env() -> Self {
        Self {
            host: get_env_or("AWAAS_UI_HOST", "127.0.0.1"),
            port: awaas_core::get_env_int("AWAAS_UI_PORT", 3000),
            backend_url: get_env_or("AWAAS_BACKEND_URL", "http://localhost:8000"),
        }
    }
}

/// The chat UI server: configuration plus the route collaborators
#[derive(Clone)]
pub struct ChatUiServer {
    /// Server configuration
    pub config: Arc<ChatUiConfig>,
    gateway: GatewayClient,
    chunker: Arc<dyn DocumentChunker>,
    index: Arc<dyn VectorIndex>,
}

impl ChatUiServer {
    /// Create a server with the production collaborators (PDF chunker, HTTP
    /// vector index)
    pub fn new(config: ChatUiConfig) -> Self {
        let gateway = GatewayClient::new(&config.backend_url);
        Self {
            config: Arc::new(config),
            gateway,
            chunker: Arc::new(PdfChunker::new()),
            index: Arc::new(HttpVectorIndex::from_env()),
        }
    }

    /// Create a server with injected collaborators, for tests and alternate
    /// ingestion backends
    pub fn with_collaborators(
        config: ChatUiConfig,
        chunker: Arc<dyn DocumentChunker>,
        index: Arc<dyn VectorIndex>,
    ) -> Self {
        let gateway = GatewayClient::new(&config.backend_url);
        Self {
            config: Arc::new(config),
            gateway,
            chunker,
            index,
        }
    }

    fn router(&self) -> Router {
        Router::new()
            .route("/", get(index))
            .route("/api/chat", post(proxy::chat_handler))
            .route(
                "/api/upload",
                post(upload::upload_handler).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
            )
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(self.clone())
    }

    /// Bind the configured address and serve until ctrl-c
    pub async fn start(&self) -> Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!("AwaasChat UI listening on http://{}", addr);
        let router = self.router();
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await?;
        Ok(())
    }

    /// Gateway client used by the chat proxy
    pub(crate) fn gateway(&self) -> &GatewayClient {
        &self.gateway
    }

    /// Document chunker used by the upload route
    pub(crate) fn chunker(&self) -> &dyn DocumentChunker {
        self.chunker.as_ref()
    }

    /// Vector index used by the upload route
    pub(crate) fn index(&self) -> &dyn VectorIndex {
        self.index.as_ref()
    }
}

async fn index() -> Html<String> {
    Html(render_page())
}

/// Route-level errors, rendered as `{ "error": <message> }` JSON bodies
#[derive(Debug)]
pub enum ApiError {
    /// Client input error, HTTP 400
    BadRequest(String),
    /// Everything else, HTTP 500
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        let body = Json(serde_json::json!({ "error": message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    #[test]
    fn test_api_error_status_codes() {
        let resp = ApiError::BadRequest("No file provided".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = ApiError::Internal("Internal server error".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_default_config() {
        let config = ChatUiConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.backend_url, "http://localhost:8000");
    }

    #[tokio::test]
    #[ignore]
    async fn chat_ui_serves_index() {
        // bind an ephemeral port
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let ui = ChatUiServer::new(ChatUiConfig {
            host: "127.0.0.1".to_string(),
            port,
            backend_url: "http://127.0.0.1:8000".to_string(),
        });
        let _ = tokio::spawn(async move {
            let _ = ui.start().await;
        });
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;

        let body = reqwest::get(format!("http://127.0.0.1:{}/", port))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(body.contains("PMAY Chatbot"));
        assert!(body.contains("Ask about PMAY scheme..."));
    }
}
