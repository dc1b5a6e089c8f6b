//! Incremental SSE frame scanning
//!
//! The backend answers as a `text/event-stream`: frames prefixed with
//! `data: ` and separated by a blank line. Network chunks do not respect
//! frame boundaries — a delimiter, or a multi-byte UTF-8 character, can be
//! split across two reads. [`FrameScanner`] therefore buffers raw bytes and
//! only carves a frame off once its full `\n\n` delimiter has arrived;
//! complete frames are decoded as UTF-8 afterwards, so a split never
//! corrupts a character.

use crate::types::SseFrame;
use tracing::warn;

/// Frame payload prefix required by the wire format
pub const DATA_PREFIX: &str = "data: ";

/// Double-newline frame delimiter
const FRAME_DELIMITER: &[u8] = b"\n\n";

/// Stateful scanner that splits a byte stream into SSE frame texts
#[derive(Debug, Default)]
pub struct FrameScanner {
    buf: Vec<u8>,
}

impl FrameScanner {
    /// Create an empty scanner
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk of bytes, returning the frames it completed.
    ///
    /// Bytes that do not yet form a full frame stay buffered for the next
    /// call. Returned frames are decoded lossily, matching the browser
    /// decoder's replacement behavior for genuinely invalid bytes.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);

        let mut frames = Vec::new();
        while let Some(pos) = find_delimiter(&self.buf) {
            let frame: Vec<u8> = self.buf.drain(..pos + FRAME_DELIMITER.len()).collect();
            let text = String::from_utf8_lossy(&frame[..pos]).into_owned();
            frames.push(text);
        }
        frames
    }

    /// Flush whatever is still buffered when the stream ends.
    ///
    /// The backend terminates every frame with a delimiter, so this is
    /// normally empty; a truncated tail is still surfaced as a final frame
    /// rather than dropped.
    pub fn finish(&mut self) -> Option<String> {
        if self.buf.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.buf);
        Some(String::from_utf8_lossy(&rest).into_owned())
    }
}

fn find_delimiter(buf: &[u8]) -> Option<usize> {
    buf.windows(FRAME_DELIMITER.len())
        .position(|w| w == FRAME_DELIMITER)
}

/// Parse one frame text into its JSON payload.
///
/// Frames lacking the `data: ` prefix (comments, bare `event:` lines, the
/// empty text between back-to-back delimiters) are discarded. A payload that
/// fails to parse as JSON is logged and skipped — one bad frame must not
/// abort an otherwise healthy stream.
pub fn parse_data_frame(frame: &str) -> Option<SseFrame> {
    let payload = frame.strip_prefix(DATA_PREFIX)?;
    match serde_json::from_str::<SseFrame>(payload) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!("Error parsing SSE message: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_complete_frame() {
        let mut scanner = FrameScanner::new();
        let frames = scanner.push(b"data: {\"type\":\"text\",\"content\":\"Hi\"}\n\n");
        assert_eq!(frames, vec!["data: {\"type\":\"text\",\"content\":\"Hi\"}"]);
        assert!(scanner.finish().is_none());
    }

    #[test]
    fn test_multiple_frames_in_one_chunk() {
        let mut scanner = FrameScanner::new();
        let frames = scanner.push(b"data: one\n\ndata: two\n\n");
        assert_eq!(frames, vec!["data: one", "data: two"]);
    }

    #[test]
    fn test_frame_split_across_chunks() {
        let mut scanner = FrameScanner::new();
        assert!(scanner.push(b"data: {\"type\":\"te").is_empty());
        assert!(scanner.push(b"xt\",\"content\":\"Hi\"}").is_empty());
        let frames = scanner.push(b"\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0], "data: {\"type\":\"text\",\"content\":\"Hi\"}");
    }

    #[test]
    fn test_delimiter_split_across_chunks() {
        let mut scanner = FrameScanner::new();
        assert!(scanner.push(b"data: first\n").is_empty());
        let frames = scanner.push(b"\ndata: second\n\n");
        assert_eq!(frames, vec!["data: first", "data: second"]);
    }

    #[test]
    fn test_multibyte_char_split_across_chunks() {
        // "data: नमस्ते" with the Devanagari bytes split mid-character
        let text = "data: नमस्ते\n\n".as_bytes();
        let (a, b) = text.split_at(7); // one byte into the first multi-byte char

        let mut scanner = FrameScanner::new();
        assert!(scanner.push(a).is_empty());
        let frames = scanner.push(b);
        assert_eq!(frames, vec!["data: नमस्ते"]);
    }

    #[test]
    fn test_finish_flushes_truncated_tail() {
        let mut scanner = FrameScanner::new();
        assert!(scanner.push(b"data: tail-no-delimiter").is_empty());
        assert_eq!(scanner.finish().as_deref(), Some("data: tail-no-delimiter"));
        assert!(scanner.finish().is_none());
    }

    #[test]
    fn test_parse_discards_non_data_frames() {
        assert!(parse_data_frame("").is_none());
        assert!(parse_data_frame(": keep-alive comment").is_none());
        assert!(parse_data_frame("event: done").is_none());
        // prefix requires the space
        assert!(parse_data_frame("data:{\"type\":\"text\",\"content\":\"x\"}").is_none());
    }

    #[test]
    fn test_parse_skips_malformed_json() {
        assert!(parse_data_frame("data: {not json").is_none());
        assert!(parse_data_frame("data: {\"type\":\"unknown\"}").is_none());
    }

    #[test]
    fn test_parse_valid_payloads() {
        let frame = parse_data_frame("data: {\"type\":\"text\",\"content\":\"ok\"}").unwrap();
        assert_eq!(frame, SseFrame::Text { content: "ok".into() });

        let frame = parse_data_frame("data: {\"type\":\"sources\",\"sources\":[]}").unwrap();
        assert_eq!(frame, SseFrame::Sources { sources: Some(vec![]) });
    }
}
