//! Streaming answer accumulation
//!
//! Chunks arrive as raw bytes and may split multi-byte UTF-8 sequences. The
//! accumulator keeps the incomplete tail until the next chunk completes it,
//! and re-derives the parsed answer from the whole running text on demand.

use crate::citations::{parse_sources, ParsedAnswer};
use crate::errors::Result;
use axum::body::Bytes;
use futures::{Stream, StreamExt};

/// Shown when the stream finished without any text
pub const EMPTY_ANSWER_FALLBACK: &str = "Sorry, I could not generate a response.";

/// Shown when the request or stream failed
pub const ERROR_FALLBACK: &str = "I apologize, but I encountered an error. Please try again.";

/// Running text of one streamed answer
#[derive(Debug, Default)]
pub struct AnswerAccumulator {
    text: String,
    pending: Vec<u8>,
    chunks: usize,
}

impl AnswerAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return the answer parsed from the text so far
    pub fn push(&mut self, chunk: &[u8]) -> ParsedAnswer {
        self.chunks += 1;
        self.pending.extend_from_slice(chunk);
        self.decode_pending();
        self.parsed()
    }

    /// Decoded text so far
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of chunks pushed
    pub fn chunks(&self) -> usize {
        self.chunks
    }

    pub fn parsed(&self) -> ParsedAnswer {
        parse_sources(&self.text)
    }

    /// Flush any dangling partial character and produce the final answer.
    /// A blank answer is replaced by [`EMPTY_ANSWER_FALLBACK`].
    pub fn finish(mut self) -> ParsedAnswer {
        if !self.pending.is_empty() {
            self.pending.clear();
            self.text.push(char::REPLACEMENT_CHARACTER);
        }

        if self.text.trim().is_empty() {
            return ParsedAnswer::plain(EMPTY_ANSWER_FALLBACK);
        }

        self.parsed()
    }

    /// Drain a byte stream into a final answer
    pub async fn collect<S>(stream: S) -> Result<ParsedAnswer>
    where
        S: Stream<Item = Result<Bytes>>,
    {
        let mut acc = Self::new();
        futures::pin_mut!(stream);

        while let Some(chunk) = stream.next().await {
            acc.push(&chunk?);
        }

        Ok(acc.finish())
    }

    /// Drain a byte stream, answering with [`ERROR_FALLBACK`] if it fails.
    /// Text received before the failure is discarded.
    pub async fn collect_or_fallback<S>(stream: S) -> ParsedAnswer
    where
        S: Stream<Item = Result<Bytes>>,
    {
        match Self::collect(stream).await {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "Answer stream failed, using error fallback");
                ParsedAnswer::plain(ERROR_FALLBACK)
            }
        }
    }

    fn decode_pending(&mut self) {
        let mut start = 0;

        loop {
            match std::str::from_utf8(&self.pending[start..]) {
                Ok(valid) => {
                    self.text.push_str(valid);
                    self.pending.clear();
                    return;
                }
                Err(e) => {
                    let valid_end = start + e.valid_up_to();
                    // valid_up_to guarantees this range is UTF-8
                    if let Ok(valid) = std::str::from_utf8(&self.pending[start..valid_end]) {
                        self.text.push_str(valid);
                    }

                    match e.error_len() {
                        Some(bad) => {
                            self.text.push(char::REPLACEMENT_CHARACTER);
                            start = valid_end + bad;
                        }
                        None => {
                            // Incomplete sequence at the end, wait for more bytes
                            self.pending.drain(..valid_end);
                            return;
                        }
                    }
                }
            }
        }
    }
}
