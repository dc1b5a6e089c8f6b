//! Chat transcript and SSE wire types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Message author role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// End user input
    User,
    /// Streamed assistant reply
    Assistant,
    /// System-injected message
    System,
}

/// Optional descriptive fields attached to a cited document.
///
/// Unknown keys from the backend are ignored on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// Originating file or collection name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Document title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Document author
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Publication or ingestion date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Page number within the source document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

/// One cited source document, immutable once received
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Cited passage text
    pub text: String,
    /// Relevance score in 0..1
    pub score: f64,
    /// Descriptive metadata
    #[serde(default)]
    pub metadata: SourceMetadata,
}

/// A single transcript entry
///
/// For assistant messages created during a streamed turn the `id` is fixed
/// when the message is first inserted and reused for every partial update of
/// that turn, so at most one in-progress assistant message exists per turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique per-message id
    pub id: String,
    /// Author role
    pub role: Role,
    /// Message text; accumulates over time for assistant messages
    pub content: String,
    /// Citation list for assistant messages (full replacement, never merged)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<SourceDocument>>,
}

impl ChatMessage {
    /// Create a user message with a fresh id
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::User,
            content: content.into(),
            sources: None,
        }
    }

    /// Create an assistant message with an explicit id
    pub fn assistant(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: Role::Assistant,
            content: content.into(),
            sources: None,
        }
    }
}

/// Select the most recent user-role message, scanning from the end.
///
/// Non-user entries after the last user message are ignored. Returns `None`
/// when the list holds no user message at all.
pub fn last_user_message(messages: &[ChatMessage]) -> Option<&ChatMessage> {
    messages.iter().rev().find(|m| m.role == Role::User)
}

/// One parsed SSE frame payload, tagged by its `type` field.
///
/// A `text` frame carries an incremental string to append to the current
/// assistant turn; a `sources` frame carries the complete citation list for
/// the current answer. Payloads with any other tag fail to parse and are
/// skipped by the scanner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SseFrame {
    /// Incremental answer text
    Text {
        /// Text to append; an empty or missing value makes the frame a no-op
        #[serde(default)]
        content: String,
    },
    /// Complete citation list for the current turn
    Sources {
        /// Replacement source list; a missing value makes the frame a no-op
        #[serde(default)]
        sources: Option<Vec<SourceDocument>>,
    },
}

/// One selectable interface language
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LanguageOption {
    /// ISO 639-1 language code
    pub code: &'static str,
    /// English name
    pub name: &'static str,
    /// Native-script name
    #[serde(rename = "nativeName")]
    pub native_name: &'static str,
}

/// Languages offered by the language selector
pub const LANGUAGES: &[LanguageOption] = &[
    LanguageOption { code: "en", name: "English", native_name: "English" },
    LanguageOption { code: "hi", name: "Hindi", native_name: "हिंदी" },
    LanguageOption { code: "bn", name: "Bengali", native_name: "বাংলা" },
    LanguageOption { code: "te", name: "Telugu", native_name: "తెలుగు" },
    LanguageOption { code: "mr", name: "Marathi", native_name: "मराठी" },
    LanguageOption { code: "ta", name: "Tamil", native_name: "தமிழ்" },
    LanguageOption { code: "gu", name: "Gujarati", native_name: "ગુજરાતી" },
    LanguageOption { code: "kn", name: "Kannada", native_name: "ಕನ್ನಡ" },
    LanguageOption { code: "ml", name: "Malayalam", native_name: "മലയാളം" },
    LanguageOption { code: "pa", name: "Punjabi", native_name: "ਪੰਜਾਬੀ" },
];

/// One selectable answer model
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ModelOption {
    /// Backend model identifier
    pub id: &'static str,
    /// Display label
    pub label: &'static str,
    /// Short characterization shown next to the label
    pub note: &'static str,
}

/// Models offered by the model selector
pub const MODELS: &[ModelOption] = &[
    ModelOption {
        id: "us.amazon.nova-pro-v1:0",
        label: "Nova Pro",
        note: "High-quality responses",
    },
    ModelOption {
        id: "us.amazon.nova-lite-v1:0",
        label: "Nova Lite",
        note: "Fast responses",
    },
    ModelOption {
        id: "us.amazon.nova-micro-v1:0",
        label: "Nova Micro",
        note: "Lightweight model",
    },
    ModelOption {
        id: "anthropic.claude-3-sonnet-20240229-v1:0",
        label: "Claude 3 Sonnet",
        note: "Balanced performance",
    },
    ModelOption {
        id: "anthropic.claude-3-haiku-20240307-v1:0",
        label: "Claude 3 Haiku",
        note: "Fast and efficient",
    },
];

/// Model preselected when the page loads
pub const DEFAULT_MODEL: &str = "us.amazon.nova-lite-v1:0";
