//! Terminal chat client for AwaasChat
//!
//! A stdin/stdout REPL against the web adaptor's `/api/chat` endpoint. Each
//! line becomes a user message; the streamed reply is printed token by token
//! as the Rust stream consumer folds it, followed by a source summary when
//! citations arrived. `exit`, `quit`, or EOF ends the session.

#![warn(missing_docs)]
#![warn(clippy::all)]

use awaas_core::view::INPUT_PLACEHOLDER;
use awaas_core::{
    locale_for, relevance_percent, source_display_name, ChatMessage, CommandSynthesizer, Result,
    SpeechSynthesizer, StreamConsumer, Transcript,
};
use futures_util::StreamExt;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

/// Terminal client configuration
#[derive(Clone)]
pub struct TerminalConfig {
    /// Base URL of the web adaptor
    pub api_url: String,
    /// Interface language code, used for speech locale selection
    pub language: String,
    /// Speak each completed reply through the local synthesizer
    pub speak: bool,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3000".into(),
            language: "en".into(),
            speak: false,
        }
    }
}

/// Interactive terminal chat session
pub struct TerminalAdaptor {
    config: TerminalConfig,
    client: reqwest::Client,
    transcript: Transcript,
}

impl TerminalAdaptor {
    /// Create a client for the configured web adaptor
    pub fn new(config: TerminalConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            transcript: Transcript::new(),
        }
    }

    /// Run the REPL until `exit`, `quit`, or EOF
    pub async fn start(&mut self) -> Result<()> {
        println!("AwaasChat terminal ({})", self.config.api_url);
        println!("{}  (exit/quit to leave)", INPUT_PLACEHOLDER);

        let stdin = BufReader::new(tokio::io::stdin());
        let mut lines = stdin.lines();

        loop {
            print!("> ");
            std::io::stdout().flush().ok();

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let text = line.trim();
            if text.is_empty() {
                continue;
            }
            if text == "exit" || text == "quit" {
                break;
            }

            self.transcript.push(ChatMessage::user(text));
            if let Err(e) = self.run_turn().await {
                // the consumer already appended the apology; keep accepting input
                debug!("Turn ended with error: {}", e);
            }
        }

        println!("Bye.");
        Ok(())
    }

    /// Post the running transcript and print the streamed reply
    async fn run_turn(&mut self) -> Result<()> {
        let response = self
            .client
            .post(format!(
                "{}/api/chat",
                self.config.api_url.trim_end_matches('/')
            ))
            .json(&serde_json::json!({ "messages": self.transcript.messages() }))
            .send()
            .await;

        let mut consumer = StreamConsumer::new(&mut self.transcript);

        let response = match response {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                let reason = format!("chat endpoint returned {}", r.status());
                consumer.fail(&reason);
                print_failure(&reason);
                return Ok(());
            }
            Err(e) => {
                let reason = e.to_string();
                consumer.fail(&reason);
                print_failure(&reason);
                return Ok(());
            }
        };

        let mut stream = response.bytes_stream();
        let mut printed = 0;
        let mut failed = None;
        while let Some(next) = stream.next().await {
            match next {
                Ok(chunk) => {
                    consumer.feed(&chunk);
                    let content = consumer.turn().content();
                    if content.len() > printed {
                        print!("{}", &content[printed..]);
                        std::io::stdout().flush().ok();
                        printed = content.len();
                    }
                }
                Err(e) => {
                    failed = Some(e.to_string());
                    break;
                }
            }
        }

        if let Some(reason) = failed {
            consumer.fail(&reason);
            println!();
            print_failure(&reason);
            return Ok(());
        }

        let turn = consumer.finish();
        println!();
        if let Some(sources) = turn.sources() {
            print!("{}", source_summary(sources));
        }

        if self.config.speak && !turn.content().is_empty() {
            let synth = CommandSynthesizer::default();
            let locale = locale_for(&self.config.language);
            if let Err(e) = synth.synthesize(turn.content(), locale).await {
                warn!("Speech synthesis failed: {}", e);
            }
        }

        Ok(())
    }
}

fn print_failure(reason: &str) {
    println!("[error] {}", reason);
    println!("{}", awaas_core::APOLOGY);
}

/// Source summary block: `[N sources]` plus one line per citation
fn source_summary(sources: &[awaas_core::SourceDocument]) -> String {
    let mut out = format!(
        "[{} source{}]\n",
        sources.len(),
        if sources.len() > 1 { "s" } else { "" }
    );
    for doc in sources {
        out.push_str(&format!(
            "  - {} ({})\n",
            source_display_name(&doc.metadata),
            relevance_percent(doc.score)
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use awaas_core::{SourceDocument, SourceMetadata};

    fn doc(source: Option<&str>, score: f64) -> SourceDocument {
        SourceDocument {
            text: "cited passage".into(),
            score,
            metadata: SourceMetadata {
                source: source.map(String::from),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_source_summary_counts_and_lines() {
        let summary = source_summary(&[doc(Some("pmay_guidelines.pdf"), 0.92), doc(None, 0.4)]);
        assert!(summary.starts_with("[2 sources]\n"));
        assert!(summary.contains("  - pmay_guidelines.pdf (Relevance: 92%)"));
        assert!(summary.contains("  - Document (Relevance: 40%)"));
    }

    #[test]
    fn test_source_summary_singular() {
        let summary = source_summary(&[doc(Some("faq.pdf"), 1.0)]);
        assert!(summary.starts_with("[1 source]\n"));
    }

    #[test]
    fn test_default_config() {
        let config = TerminalConfig::default();
        assert_eq!(config.api_url, "http://localhost:3000");
        assert_eq!(config.language, "en");
        assert!(!config.speak);
    }
}
