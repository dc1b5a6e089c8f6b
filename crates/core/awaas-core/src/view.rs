//! View-state derivation and transcript display strings
//!
//! Pure functions only: the browser page and the terminal client both derive
//! what to show from `(messages, loading, streaming-started, error)` through
//! these helpers, so the two frontends cannot disagree.

use crate::types::SourceMetadata;

/// Welcome panel title
pub const WELCOME_TITLE: &str = "PMAY Chatbot";

/// Welcome panel body
pub const WELCOME_BODY: &str = "Ask questions about the Pradhan Mantri Awas Yojana (PMAY) scheme and get accurate, context-aware responses.";

/// Welcome panel footnote
pub const WELCOME_FOOTNOTE: &str = "Powered by RAG with cross-encoder re-ranking";

/// Error panel heading
pub const ERROR_TITLE: &str = "Oops! Something went wrong.";

/// Error panel detail shown when the stored error has no message
pub const ERROR_FALLBACK_DETAIL: &str = "Please try again later.";

/// Error panel retry affordance label
pub const ERROR_RETRY_LABEL: &str = "Refresh";

/// Chat input placeholder
pub const INPUT_PLACEHOLDER: &str = "Ask about PMAY scheme...";

/// What the main chat area shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// Centered welcome panel, before the first message
    Welcome,
    /// Full-area spinner while the first reply is pending
    Spinner,
    /// The message list
    Transcript,
    /// Error panel with the retry affordance
    Error,
}

/// Derive the view state for the main chat area.
///
/// Precedence: a stored error always wins, then the welcome panel (no
/// messages, idle), then the spinner (no messages, loading), then the
/// transcript.
pub fn view_state(message_count: usize, loading: bool, has_error: bool) -> ViewState {
    if has_error {
        ViewState::Error
    } else if message_count == 0 && !loading {
        ViewState::Welcome
    } else if message_count == 0 {
        ViewState::Spinner
    } else {
        ViewState::Transcript
    }
}

/// Whether the animated thinking indicator shows: a turn is in flight and no
/// answer text has streamed yet.
pub fn show_thinking(loading: bool, streaming_started: bool) -> bool {
    loading && !streaming_started
}

/// Toggle label for a source panel, e.g. `Show 3 sources` / `Hide 1 source`
pub fn source_panel_label(count: usize, expanded: bool) -> String {
    format!(
        "{} {} source{}",
        if expanded { "Hide" } else { "Show" },
        count,
        if count > 1 { "s" } else { "" }
    )
}

/// Display name for a cited document, falling back when the metadata carries
/// no usable source
pub fn source_display_name(metadata: &SourceMetadata) -> &str {
    match metadata.source.as_deref() {
        Some(s) if !s.is_empty() => s,
        _ => "Document",
    }
}

/// Relevance line for a cited document, score rendered as a whole percentage
pub fn relevance_percent(score: f64) -> String {
    format!("Relevance: {}%", (score * 100.0).round() as i64)
}
