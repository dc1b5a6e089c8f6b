//! AwaasChat Core
//!
//! This crate provides the shared types and pure logic for the PMAY
//! (Pradhan Mantri Awas Yojana) RAG chat frontends. It includes:
//!
//! - Chat transcript state with streamed assistant turns
//! - An incremental SSE frame scanner safe against chunk splits
//! - View-state derivation shared by the browser page and terminal client
//! - Markdown rendering with no raw-HTML passthrough
//! - Speech text preparation, locale mapping, and a subprocess synthesizer
//! - Theme selection with injected persistence
//!
//! # Example: folding a streamed reply
//!
//! ```
//! use awaas_core::{StreamConsumer, Transcript};
//!
//! let mut transcript = Transcript::new();
//! let mut consumer = StreamConsumer::with_turn_id(&mut transcript, "ai-response-0");
//! consumer.feed(b"data: {\"type\":\"text\",\"content\":\"Namaste\"}\n\n");
//! let turn = consumer.finish();
//! assert_eq!(turn.content(), "Namaste");
//! assert_eq!(transcript.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod markdown;
pub mod speech;
pub mod sse;
pub mod theme;
pub mod transcript;
pub mod types;
pub mod utils;
pub mod view;

pub use config::{get_env_bool, get_env_int, get_env_or, get_required_env, load_env};
pub use error::{AwaasError, Result};
pub use markdown::{AnsiRenderer, HtmlRenderer, MarkdownRenderer};
pub use speech::{
    locale_for, prepare_text, CommandSynthesizer, SpeechEvent, SpeechSynthesizer, DEFAULT_LOCALE,
    LOCALES,
};
pub use sse::{parse_data_frame, FrameScanner, DATA_PREFIX};
pub use theme::{MemoryThemeStore, Theme, ThemeManager, ThemeStore};
pub use transcript::{
    reserved_turn_id, AssistantTurn, StreamConsumer, Transcript, APOLOGY,
};
pub use types::{
    last_user_message, ChatMessage, LanguageOption, ModelOption, Role, SourceDocument,
    SourceMetadata, SseFrame, DEFAULT_MODEL, LANGUAGES, MODELS,
};
pub use utils::init_logging;
pub use view::{
    relevance_percent, show_thinking, source_display_name, source_panel_label, view_state,
    ViewState,
};
