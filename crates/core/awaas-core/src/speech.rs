//! Speech text preparation and synthesis
//!
//! The browser page drives the Web Speech API directly; this module owns
//! everything the page and the terminal client share: text sanitization,
//! the language-to-locale map, the playback parameters, and a subprocess
//! synthesizer for terminal use.

use crate::error::{AwaasError, Result};
use async_trait::async_trait;
use regex::Regex;

/// Locale used when a language code has no mapping
pub const DEFAULT_LOCALE: &str = "en-US";

/// Language code to speech-synthesis locale tag
pub const LOCALES: &[(&str, &str)] = &[
    ("en", "en-US"),
    ("hi", "hi-IN"),
    ("bn", "bn-IN"),
    ("te", "te-IN"),
    ("mr", "mr-IN"),
    ("ta", "ta-IN"),
    ("gu", "gu-IN"),
    ("kn", "kn-IN"),
    ("ml", "ml-IN"),
    ("pa", "pa-IN"),
];

/// Utterance rate
pub const SPEECH_RATE: f64 = 0.9;
/// Utterance pitch
pub const SPEECH_PITCH: f64 = 1.0;
/// Utterance volume
pub const SPEECH_VOLUME: f64 = 0.8;

/// Alert shown when the browser lacks speech synthesis
pub const UNSUPPORTED_ALERT: &str = "Text-to-speech is not supported in your browser";
/// Alert shown when an utterance errors
pub const FAILURE_ALERT: &str = "Error occurred during text-to-speech";

/// Speak button title while idle
pub const SPEAK_TITLE: &str = "Read aloud";
/// Speak button title while an utterance is playing
pub const STOP_TITLE: &str = "Stop speaking";

/// Map a language code to its synthesis locale, falling back to `en-US`
pub fn locale_for(code: &str) -> &'static str {
    LOCALES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, locale)| *locale)
        .unwrap_or(DEFAULT_LOCALE)
}

/// Strip markup from assistant text before synthesis.
///
/// Order matters: markdown symbols, then HTML tags, then newline runs
/// collapsed to a single space, then trim.
pub fn prepare_text(raw: &str) -> String {
    let markdown_re = Regex::new(r"[#*`]").unwrap();
    let t = markdown_re.replace_all(raw, "");
    let html_re = Regex::new(r"<[^>]*>").unwrap();
    let t = html_re.replace_all(&t, "");
    let newline_re = Regex::new(r"\n+").unwrap();
    let t = newline_re.replace_all(&t, " ");
    t.trim().to_string()
}

/// Synthesis lifecycle, in emission order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    /// Playback is about to begin
    Started,
    /// Playback completed
    Finished,
    /// Playback failed mid-utterance
    Failed(String),
}

/// Speaks prepared text in a given locale
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` aloud, returning the lifecycle events in order.
    ///
    /// Implementations emit `Started` before `Finished`, and report
    /// mid-utterance failures as `Failed` events rather than panicking.
    async fn synthesize(&self, text: &str, locale: &str) -> Result<Vec<SpeechEvent>>;
}

/// Synthesizer shelling out to a local TTS command, `espeak-ng` by default
#[derive(Debug, Clone)]
pub struct CommandSynthesizer {
    command: String,
}

impl Default for CommandSynthesizer {
    fn default() -> Self {
        Self::new("espeak-ng")
    }
}

impl CommandSynthesizer {
    /// Use a specific TTS command instead of `espeak-ng`
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for CommandSynthesizer {
    async fn synthesize(&self, text: &str, locale: &str) -> Result<Vec<SpeechEvent>> {
        use std::process::Stdio;
        use tokio::process::Command;

        let prepared = prepare_text(text);
        if prepared.is_empty() {
            return Ok(Vec::new());
        }

        let mut events = vec![SpeechEvent::Started];

        let output = Command::new(&self.command)
            .arg("-v")
            .arg(locale)
            .arg(&prepared)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                AwaasError::speech(format!("Failed to start {}: {}", self.command, e))
            })?;

        if output.status.success() {
            events.push(SpeechEvent::Finished);
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            events.push(SpeechEvent::Failed(stderr.trim().to_string()));
        }

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_mapping() {
        assert_eq!(locale_for("en"), "en-US");
        assert_eq!(locale_for("hi"), "hi-IN");
        assert_eq!(locale_for("ta"), "ta-IN");
        assert_eq!(locale_for("pa"), "pa-IN");
    }

    #[test]
    fn test_locale_fallback_for_unknown_codes() {
        assert_eq!(locale_for("fr"), "en-US");
        assert_eq!(locale_for(""), "en-US");
        assert_eq!(locale_for("en-GB"), "en-US");
    }

    #[test]
    fn test_prepare_text_strips_markdown() {
        assert_eq!(
            prepare_text("# Eligibility\n\n**Income** below `limit`"),
            "Eligibility Income below limit"
        );
    }

    #[test]
    fn test_prepare_text_strips_html_tags() {
        assert_eq!(
            prepare_text("apply <a href=\"x\">here</a> today"),
            "apply here today"
        );
    }

    #[test]
    fn test_prepare_text_collapses_newlines_and_trims() {
        assert_eq!(prepare_text("\n\nfirst\nsecond\n\n\nthird\n"), "first second third");
    }

    #[test]
    fn test_prepare_text_plain_passthrough() {
        assert_eq!(prepare_text("plain sentence"), "plain sentence");
    }

    #[tokio::test]
    async fn test_command_synthesizer_empty_text_is_silent() {
        let synth = CommandSynthesizer::default();
        let events = synth.synthesize("   \n  ", "en-US").await.unwrap();
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_command_synthesizer_missing_command_errors() {
        let synth = CommandSynthesizer::new("definitely-not-a-tts-binary");
        let err = synth.synthesize("hello", "en-US").await.unwrap_err();
        assert!(err.to_string().contains("Failed to start"));
    }

    #[tokio::test]
    async fn test_command_synthesizer_failure_event_carries_stderr() {
        // `false` exits non-zero without writing audio anywhere
        let synth = CommandSynthesizer::new("false");
        let events = synth.synthesize("hello", "en-US").await.unwrap();
        assert_eq!(events[0], SpeechEvent::Started);
        assert!(matches!(events[1], SpeechEvent::Failed(_)));
    }
}
