//! Transcript state and the SSE stream consumer
//!
//! One turn = one user submission plus its streamed assistant reply. The
//! consumer reads the proxied event stream chunk by chunk, folds `text`
//! frames into an accumulating assistant message and `sources` frames into
//! its citation list, and keeps the transcript's message for the turn
//! updated in place under a reserved id.

use crate::error::{AwaasError, Result};
use crate::sse::{parse_data_frame, FrameScanner};
use crate::types::{ChatMessage, Role, SourceDocument, SseFrame};
use bytes::Bytes;
use futures_util::{Stream, StreamExt};

/// Fixed assistant content appended when a turn fails
pub const APOLOGY: &str =
    "I apologize, but I encountered an error while processing your request. Please try again.";

/// Reserved id for the in-progress assistant message of a new turn
pub fn reserved_turn_id() -> String {
    format!("ai-response-{}", chrono::Utc::now().timestamp_millis())
}

fn error_message_id() -> String {
    format!("error-{}", chrono::Utc::now().timestamp_millis())
}

/// Ordered message list for one session.
///
/// Grows monotonically while the session lives; held only in transient state
/// and discarded on reload.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    /// Create an empty transcript
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages in order
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the transcript holds no messages yet
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Append a message
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Insert or update the assistant message with the given reserved id.
    ///
    /// The first effective frame of a turn inserts the message; every later
    /// frame updates `content` and `sources` in place. Idempotent under
    /// repeated identical updates, and the positions of all other messages
    /// are untouched.
    pub fn upsert_assistant(
        &mut self,
        id: &str,
        content: &str,
        sources: Option<&[SourceDocument]>,
    ) {
        if let Some(existing) = self.messages.iter_mut().find(|m| m.id == id) {
            existing.content = content.to_string();
            existing.sources = sources.map(|s| s.to_vec());
        } else {
            self.messages.push(ChatMessage {
                id: id.to_string(),
                role: Role::Assistant,
                content: content.to_string(),
                sources: sources.map(|s| s.to_vec()),
            });
        }
    }
}

/// Accumulator for the assistant reply of one turn
#[derive(Debug, Clone)]
pub struct AssistantTurn {
    id: String,
    content: String,
    sources: Option<Vec<SourceDocument>>,
    started: bool,
}

impl AssistantTurn {
    /// Create an accumulator bound to a reserved message id
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: String::new(),
            sources: None,
            started: false,
        }
    }

    /// Reserved message id for this turn
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Accumulated assistant text
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Citation list, if a `sources` frame arrived
    pub fn sources(&self) -> Option<&[SourceDocument]> {
        self.sources.as_deref()
    }

    /// Whether any answer text has streamed yet.
    ///
    /// Used only to gate the "thinking" indicator.
    pub fn has_started(&self) -> bool {
        self.started
    }

    /// Fold one frame into the turn, returning whether state changed.
    ///
    /// A `text` frame appends its content and marks streaming as started; an
    /// empty content is a no-op. A `sources` frame replaces (never merges)
    /// the citation list; a missing list is a no-op.
    pub fn apply(&mut self, frame: &SseFrame) -> bool {
        match frame {
            SseFrame::Text { content } if !content.is_empty() => {
                self.content.push_str(content);
                self.started = true;
                true
            }
            SseFrame::Text { .. } => false,
            SseFrame::Sources { sources: Some(list) } => {
                self.sources = Some(list.clone());
                true
            }
            SseFrame::Sources { .. } => false,
        }
    }
}

/// Stream consumer for one turn, folding SSE frames into a transcript
pub struct StreamConsumer<'a> {
    transcript: &'a mut Transcript,
    scanner: FrameScanner,
    turn: AssistantTurn,
}

impl<'a> StreamConsumer<'a> {
    /// Create a consumer with a fresh reserved turn id
    pub fn new(transcript: &'a mut Transcript) -> Self {
        let id = reserved_turn_id();
        Self::with_turn_id(transcript, id)
    }

    /// Create a consumer bound to an explicit turn id
    pub fn with_turn_id(transcript: &'a mut Transcript, id: impl Into<String>) -> Self {
        Self {
            transcript,
            scanner: FrameScanner::new(),
            turn: AssistantTurn::new(id),
        }
    }

    /// The turn being accumulated
    pub fn turn(&self) -> &AssistantTurn {
        &self.turn
    }

    /// Feed one chunk of response bytes.
    ///
    /// Frames completed by the chunk are parsed and folded; partial frames
    /// stay buffered in the scanner.
    pub fn feed(&mut self, chunk: &[u8]) {
        let frames = self.scanner.push(chunk);
        for frame in frames {
            self.fold(&frame);
        }
    }

    /// Record a turn failure: appends the fixed apology as a new assistant
    /// message, leaving any partially streamed content in place.
    pub fn fail(&mut self, reason: &str) {
        tracing::error!("Chat stream failed: {}", reason);
        self.transcript
            .push(ChatMessage::assistant(error_message_id(), APOLOGY));
    }

    /// Flush the scanner and return the completed turn
    pub fn finish(mut self) -> AssistantTurn {
        if let Some(tail) = self.scanner.finish() {
            self.fold(&tail);
        }
        self.turn
    }

    /// Drive an entire byte stream to completion.
    ///
    /// The stream ending is the only completion signal — there is no
    /// sentinel frame. A read error is handled once here: the apology is
    /// appended and the error returned for the caller to store. No retry.
    pub async fn consume<S, E>(mut self, stream: S) -> Result<AssistantTurn>
    where
        S: Stream<Item = std::result::Result<Bytes, E>>,
        E: std::fmt::Display,
    {
        let mut stream = std::pin::pin!(stream);
        while let Some(next) = stream.next().await {
            match next {
                Ok(chunk) => self.feed(&chunk),
                Err(e) => {
                    let reason = e.to_string();
                    self.fail(&reason);
                    return Err(AwaasError::stream(reason));
                }
            }
        }
        Ok(self.finish())
    }

    fn fold(&mut self, frame_text: &str) {
        if let Some(frame) = parse_data_frame(frame_text) {
            if self.turn.apply(&frame) {
                self.transcript
                    .upsert_assistant(self.turn.id(), self.turn.content(), self.turn.sources());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceMetadata;
    use futures_util::stream;

    fn text_frame(content: &str) -> Vec<u8> {
        format!(
            "data: {{\"type\":\"text\",\"content\":\"{}\"}}\n\n",
            content
        )
        .into_bytes()
    }

    fn sources_frame(names: &[&str]) -> Vec<u8> {
        let docs: Vec<String> = names
            .iter()
            .map(|n| {
                format!(
                    "{{\"text\":\"passage\",\"score\":0.8,\"metadata\":{{\"source\":\"{}\"}}}}",
                    n
                )
            })
            .collect();
        format!(
            "data: {{\"type\":\"sources\",\"sources\":[{}]}}\n\n",
            docs.join(",")
        )
        .into_bytes()
    }

    #[test]
    fn test_text_frames_accumulate_into_single_message() {
        let mut transcript = Transcript::new();
        let mut consumer = StreamConsumer::with_turn_id(&mut transcript, "ai-response-1");

        consumer.feed(&text_frame("Hello"));
        consumer.feed(&text_frame(" "));
        consumer.feed(&text_frame("world"));
        let turn = consumer.finish();

        assert_eq!(transcript.len(), 1, "message created once, not duplicated");
        let msg = &transcript.messages()[0];
        assert_eq!(msg.id, "ai-response-1");
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.content, "Hello world");
        assert!(turn.has_started());
    }

    #[test]
    fn test_sources_replace_not_merge() {
        let mut transcript = Transcript::new();
        let mut consumer = StreamConsumer::with_turn_id(&mut transcript, "ai-response-1");

        consumer.feed(&sources_frame(&["a.pdf"]));
        consumer.feed(&sources_frame(&["b.pdf"]));
        consumer.finish();

        let msg = &transcript.messages()[0];
        let sources = msg.sources.as_ref().unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].metadata.source.as_deref(), Some("b.pdf"));
    }

    #[test]
    fn test_malformed_frame_does_not_interrupt() {
        let mut transcript = Transcript::new();
        let mut consumer = StreamConsumer::with_turn_id(&mut transcript, "ai-response-1");

        consumer.feed(&text_frame("Hello"));
        consumer.feed(b"data: {broken json\n\n");
        consumer.feed(&text_frame(" world"));
        consumer.finish();

        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.messages()[0].content, "Hello world");
    }

    #[test]
    fn test_empty_text_frame_is_noop() {
        let mut transcript = Transcript::new();
        let mut consumer = StreamConsumer::with_turn_id(&mut transcript, "ai-response-1");

        consumer.feed(&text_frame(""));
        let turn = consumer.finish();

        assert!(transcript.is_empty(), "no message inserted for empty text");
        assert!(!turn.has_started());
    }

    #[test]
    fn test_sources_before_text_inserts_message_without_starting() {
        let mut transcript = Transcript::new();
        let mut consumer = StreamConsumer::with_turn_id(&mut transcript, "ai-response-1");

        consumer.feed(&sources_frame(&["scheme.pdf"]));
        assert!(!consumer.turn().has_started());
        consumer.feed(&text_frame("Answer"));
        let turn = consumer.finish();

        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.messages()[0].content, "Answer");
        assert!(turn.has_started());
    }

    #[test]
    fn test_positions_of_other_messages_preserved() {
        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::user("q1"));
        transcript.push(ChatMessage::assistant("a1", "old answer"));
        transcript.push(ChatMessage::user("q2"));

        let mut consumer = StreamConsumer::with_turn_id(&mut transcript, "ai-response-2");
        consumer.feed(&text_frame("a2 part"));
        consumer.feed(&text_frame(" two"));
        consumer.finish();

        let ids: Vec<&str> = transcript.messages().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids.len(), 4);
        assert_eq!(ids[1], "a1");
        assert_eq!(ids[3], "ai-response-2");
        assert_eq!(transcript.messages()[3].content, "a2 part two");
    }

    #[test]
    fn test_upsert_is_idempotent() {
        let mut transcript = Transcript::new();
        let doc = SourceDocument {
            text: "passage".into(),
            score: 0.5,
            metadata: SourceMetadata::default(),
        };

        transcript.upsert_assistant("id-1", "same", Some(&[doc.clone()]));
        transcript.upsert_assistant("id-1", "same", Some(&[doc]));

        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.messages()[0].content, "same");
    }

    #[test]
    fn test_frame_split_mid_delimiter_across_feeds() {
        let mut transcript = Transcript::new();
        let mut consumer = StreamConsumer::with_turn_id(&mut transcript, "ai-response-1");

        let frame = text_frame("chunked");
        let (a, b) = frame.split_at(frame.len() - 1); // delimiter split across reads
        consumer.feed(a);
        assert!(consumer.turn().content().is_empty());
        consumer.feed(b);
        consumer.finish();

        assert_eq!(transcript.messages()[0].content, "chunked");
    }

    #[tokio::test]
    async fn test_consume_stream_to_completion() {
        let mut transcript = Transcript::new();
        let chunks: Vec<std::result::Result<Bytes, std::io::Error>> = vec![
            Ok(Bytes::from(text_frame("Namaste"))),
            Ok(Bytes::from(sources_frame(&["pmay.pdf"]))),
        ];

        let consumer = StreamConsumer::with_turn_id(&mut transcript, "ai-response-1");
        let turn = consumer.consume(stream::iter(chunks)).await.unwrap();

        assert_eq!(turn.content(), "Namaste");
        assert_eq!(turn.sources().unwrap().len(), 1);
        assert_eq!(transcript.len(), 1);
    }

    #[tokio::test]
    async fn test_consume_error_appends_apology() {
        let mut transcript = Transcript::new();
        let chunks: Vec<std::result::Result<Bytes, std::io::Error>> = vec![
            Ok(Bytes::from(text_frame("partial"))),
            Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset",
            )),
        ];

        let consumer = StreamConsumer::with_turn_id(&mut transcript, "ai-response-1");
        let err = consumer.consume(stream::iter(chunks)).await.unwrap_err();

        assert!(err.to_string().contains("connection reset"));
        assert_eq!(transcript.len(), 2, "partial message kept, apology appended");
        assert_eq!(transcript.messages()[0].content, "partial");
        let apology = &transcript.messages()[1];
        assert_eq!(apology.role, Role::Assistant);
        assert_eq!(apology.content, APOLOGY);
        assert!(apology.id.starts_with("error-"));
    }

    #[test]
    fn test_reserved_turn_id_shape() {
        let id = reserved_turn_id();
        assert!(id.starts_with("ai-response-"));
    }
}
