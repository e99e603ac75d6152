//! # Streaming Response Assembler
//!
//! Incremental parser for the server-sent-event stream returned by the chat
//! endpoint. It is sans-I/O: the caller reads bytes from whatever transport it
//! has and feeds them in, one chunk at a time, in arrival order.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  bytes ──► UTF-8 decode ──► line buffer ──► per-line rules ──► text     │
//! │           (holds split     (holds the      ┌──────────────────────┐     │
//! │            code points)     partial tail)  │ "\r" stripped        │     │
//! │                                            │ blank / ":" skipped  │     │
//! │                                            │ no "data: " skipped  │     │
//! │                                            │ "[DONE]" → finished  │     │
//! │                                            │ JSON → delta content │     │
//! │                                            └──────────┬───────────┘     │
//! │                                                       ▼                 │
//! │                              accumulated text, emitted as a snapshot   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshots, Not Diffs
//! Every emission is the full accumulated assistant text. An observer that
//! only keeps the latest value always shows the right thing.
//!
//! ## Incomplete JSON
//! A `data:` line whose payload is cut-off JSON is pushed back to the front of
//! the buffer (with its newline) and the batch stops. It is retried when the
//! next chunk arrives. If it still fails once another complete line has
//! arrived behind it, framing has moved on and the line is dropped.
//!
//! ## Example
//! ```rust
//! use finsense_core::stream::StreamAssembler;
//!
//! let mut assembler = StreamAssembler::new();
//! let first = assembler.feed(b"data: {\"choices\":[{\"delta\":{\"content\":\"Hel");
//! assert!(first.is_empty()); // no complete line yet
//!
//! let second = assembler.feed(b"lo\"}}]}\n\ndata: [DONE]\n\n");
//! assert_eq!(second, vec!["Hello".to_string()]);
//! assert!(assembler.is_done());
//! assert_eq!(assembler.finish(), "Hello");
//! ```

use serde::Deserialize;
use tracing::{debug, warn};

/// Prefix of every payload-carrying line.
pub const DATA_PREFIX: &str = "data: ";

/// Payload that marks the end of the stream.
pub const DONE_SENTINEL: &str = "[DONE]";

// =============================================================================
// Chunk Payload
// =============================================================================

/// One decoded `data:` payload. Every level is optional upstream.
#[derive(Debug, Deserialize)]
struct ChunkPayload {
    #[serde(default)]
    choices: Option<Vec<ChunkChoice>>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: Option<ChunkDelta>,
}

#[derive(Debug, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

impl ChunkPayload {
    /// Content of the first choice's delta, if any.
    fn into_content(self) -> Option<String> {
        self.choices?.into_iter().next()?.delta?.content
    }
}

// =============================================================================
// Assembler
// =============================================================================

/// Turns a byte stream of SSE chunks into the growing assistant reply.
#[derive(Debug, Default)]
pub struct StreamAssembler {
    /// Trailing bytes of an incomplete UTF-8 sequence.
    undecoded: Vec<u8>,
    /// Decoded text not yet consumed as lines.
    buffer: String,
    /// The buffer starts with a line that failed to parse last time.
    retrying_head: bool,
    /// Accumulated assistant text.
    content: String,
    done: bool,
}

impl StreamAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds the next chunk of bytes.
    ///
    /// Returns one snapshot of the accumulated text per line that added
    /// content, in order. Input after the `[DONE]` sentinel is ignored.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        if self.done || chunk.is_empty() {
            return Vec::new();
        }

        self.decode(chunk);
        self.drain_lines()
    }

    /// True once the `[DONE]` sentinel has been seen.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Text accumulated so far.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Ends the stream and returns the final assistant text.
    ///
    /// A trailing fragment that never became a complete line is dropped.
    pub fn finish(self) -> String {
        if !self.buffer.trim().is_empty() || !self.undecoded.is_empty() {
            debug!(
                leftover = self.buffer.len() + self.undecoded.len(),
                "Dropping unterminated stream fragment"
            );
        }
        self.content
    }

    /// Appends `chunk` to the text buffer, holding back a split code point.
    ///
    /// Invalid sequences become U+FFFD so one bad byte never stalls decoding.
    fn decode(&mut self, chunk: &[u8]) {
        self.undecoded.extend_from_slice(chunk);

        let mut rest: &[u8] = &self.undecoded;
        loop {
            match std::str::from_utf8(rest) {
                Ok(text) => {
                    self.buffer.push_str(text);
                    rest = &[];
                    break;
                }
                Err(err) => {
                    let (valid, after) = rest.split_at(err.valid_up_to());
                    // valid_up_to guarantees this prefix is UTF-8
                    self.buffer.push_str(&String::from_utf8_lossy(valid));
                    match err.error_len() {
                        Some(bad) => {
                            self.buffer.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[bad..];
                        }
                        None => {
                            rest = after;
                            break;
                        }
                    }
                }
            }
        }

        self.undecoded = rest.to_vec();
    }

    /// Consumes every complete line currently buffered.
    fn drain_lines(&mut self) -> Vec<String> {
        let mut snapshots = Vec::new();

        while let Some(newline) = self.buffer.find('\n') {
            let raw: String = self.buffer.drain(..=newline).collect();
            let retrying = std::mem::take(&mut self.retrying_head);

            let line = raw.trim_end_matches('\n');
            let line = line.strip_suffix('\r').unwrap_or(line);

            if line.is_empty() || line.starts_with(':') {
                continue;
            }

            let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
                continue;
            };
            let payload = payload.trim();

            if payload == DONE_SENTINEL {
                debug!(chars = self.content.len(), "Stream finished");
                self.done = true;
                break;
            }

            match serde_json::from_str::<ChunkPayload>(payload) {
                Ok(chunk) => {
                    if let Some(text) = chunk.into_content().filter(|t| !t.is_empty()) {
                        self.content.push_str(&text);
                        snapshots.push(self.content.clone());
                    }
                }
                Err(err) if err.is_syntax() || err.is_eof() => {
                    if retrying && self.buffer.contains('\n') {
                        warn!(error = %err, "Dropping malformed stream line");
                        continue;
                    }
                    let mut restored = line.to_string();
                    restored.push('\n');
                    self.buffer.insert_str(0, &restored);
                    self.retrying_head = true;
                    break;
                }
                Err(err) => {
                    debug!(error = %err, "Skipping stream payload with unexpected shape");
                }
            }
        }

        snapshots
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
