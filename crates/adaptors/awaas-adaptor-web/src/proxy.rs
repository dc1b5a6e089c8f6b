//! The `/api/chat` proxy route
//!
//! Picks the latest user message out of the posted transcript, forwards only
//! its content to the backend gateway's `/chat` endpoint, and passes the
//! gateway's SSE body straight through as the response. Nothing is buffered:
//! the first byte reaches the browser as soon as the gateway emits it.

use crate::{ApiError, ChatUiServer};
use axum::body::Body;
use axum::extract::{Json, State};
use axum::http::{header, HeaderName, HeaderValue};
use axum::response::{IntoResponse, Response};
use awaas_core::{last_user_message, AwaasError, ChatMessage, Result};
use reqwest::Client;
use serde::Deserialize;
use std::sync::OnceLock;
use tracing::error;

/// Streaming-protocol version header passed through from the gateway
pub const STREAM_PROTOCOL_HEADER: &str = "x-vercel-ai-data-stream";

/// Protocol version assumed when the gateway does not send one
pub const STREAM_PROTOCOL_DEFAULT: &str = "v1";

/// Shared HTTP client for connection pooling.
///
/// No request timeout: the SSE body stays open for as long as the gateway
/// streams, and a hung gateway holding the connection is accepted behavior.
static HTTP_CLIENT: OnceLock<Client> = OnceLock::new();

fn get_http_client() -> Client {
    HTTP_CLIENT
        .get_or_init(|| {
            Client::builder()
                .pool_max_idle_per_host(50)
                .pool_idle_timeout(std::time::Duration::from_secs(300))
                .tcp_keepalive(std::time::Duration::from_secs(60))
                .build()
                .expect("Failed to create HTTP client")
        })
        .clone()
}

/// Request body accepted by `/api/chat`
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The transcript so far; only the last user message is forwarded
    pub messages: Vec<ChatMessage>,
}

/// Client for the backend gateway's `/chat` endpoint
#[derive(Clone)]
pub struct GatewayClient {
    client: Client,
    endpoint: String,
}

impl GatewayClient {
    /// Create a client for the given gateway base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            client: get_http_client(),
            endpoint: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Post one user message, returning the gateway response with its SSE
    /// body still unread.
    ///
    /// A non-success status is read as text (best effort) and wrapped into a
    /// gateway error carrying the literal status code.
    pub async fn chat(&self, message: &str) -> Result<reqwest::Response> {
        let resp = self
            .client
            .post(format!("{}/chat", self.endpoint))
            .json(&serde_json::json!({ "message": message }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_else(|_| "null".to_string());
            return Err(AwaasError::gateway(backend_failure_message(status, &body)));
        }

        Ok(resp)
    }
}

/// Error message surfaced when the gateway answers with a non-success status
pub(crate) fn backend_failure_message(status: u16, body: &str) -> String {
    format!("Backend request failed with status {}: {}", status, body)
}

/// `POST /api/chat`
pub(crate) async fn chat_handler(
    State(state): State<ChatUiServer>,
    Json(request): Json<ChatRequest>,
) -> Response {
    let Some(last_user) = last_user_message(&request.messages) else {
        return ApiError::BadRequest("No user message found in the request.".to_string())
            .into_response();
    };

    match state.gateway().chat(&last_user.content).await {
        Ok(backend) => stream_through(backend),
        Err(AwaasError::Gateway(msg)) => {
            error!("Error in chat endpoint: {}", msg);
            ApiError::Internal(msg).into_response()
        }
        Err(e) => {
            error!("Error in chat endpoint: {}", e);
            ApiError::Internal("Internal server error".to_string()).into_response()
        }
    }
}

/// Relay the gateway body as an event stream, one chunk at a time
fn stream_through(backend: reqwest::Response) -> Response {
    let protocol_version = backend
        .headers()
        .get(STREAM_PROTOCOL_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(STREAM_PROTOCOL_DEFAULT)
        .to_string();

    let body = Body::from_stream(backend.bytes_stream());
    let mut response = Response::new(body);
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/event-stream"),
    );
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-transform"),
    );
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    // stop intermediaries from buffering the stream
    headers.insert(
        HeaderName::from_static("x-accel-buffering"),
        HeaderValue::from_static("no"),
    );
    if let Ok(value) = HeaderValue::from_str(&protocol_version) {
        headers.insert(HeaderName::from_static(STREAM_PROTOCOL_HEADER), value);
    }
    response
}
