// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Incremental server-sent-event decoding
//!
//! Providers deliver SSE bytes in arbitrary-sized chunks, so a `data:` line
//! may be split across two reads. The decoder keeps a carry-over buffer and
//! only ever processes complete lines; the trailing incomplete line waits for
//! the next read. Splitting the same bytes at any offset yields the same
//! events as feeding them in one piece.

use serde::Deserialize;
use tracing::warn;

/// One decoded SSE event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// Payload of one complete `data: ` line (prefix stripped)
    Data(String),
    /// The `[DONE]` sentinel: no further events will be produced
    Done,
}

/// Stateful line decoder for one SSE byte stream.
///
/// The carry-over buffer holds raw bytes, not text: a read boundary can
/// fall inside a multibyte UTF-8 character, and only complete lines are
/// safe to convert.
#[derive(Debug, Default)]
pub struct SseLineDecoder {
    buffer: Vec<u8>,
    finished: bool,
}

impl SseLineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk of raw bytes, returning every event completed by it.
    ///
    /// After the `[DONE]` sentinel the decoder stays terminated: buffered or
    /// subsequent bytes produce nothing.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        let mut events = Vec::new();
        if self.finished {
            return events;
        }

        self.buffer.extend_from_slice(chunk);

        while let Some(line_end) = self.buffer.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=line_end).collect();
            let mut line_bytes = &raw[..line_end];
            if line_bytes.last() == Some(&b'\r') {
                line_bytes = &line_bytes[..line_bytes.len() - 1];
            }
            let line = String::from_utf8_lossy(line_bytes);

            // Blank lines and SSE comments carry no data; the field prefix
            // must start the line, an indented `data:` is not a data line
            if line.is_empty() || line.starts_with(':') {
                continue;
            }

            if let Some(data) = line.strip_prefix("data: ") {
                if data.trim() == "[DONE]" {
                    events.push(SseEvent::Done);
                    self.finished = true;
                    self.buffer.clear();
                    break;
                }
                events.push(SseEvent::Data(data.to_string()));
            }
        }

        events
    }

    /// Whether the `[DONE]` sentinel has been seen
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

// Chat-completion stream chunk, as sent by OpenAI and OpenRouter

#[derive(Debug, Deserialize)]
struct ChatCompletionChunk {
    choices: Vec<ChatChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChunkChoice {
    delta: ChatChunkDelta,
}

#[derive(Debug, Deserialize)]
struct ChatChunkDelta {
    content: Option<String>,
}

/// Extract the text delta from one chat-completion `data:` payload.
///
/// Returns `None` for payloads with no (or empty) text content, and for
/// malformed JSON: partial lines are expected at chunk boundaries, so a
/// parse failure skips the line rather than aborting the stream.
pub fn chat_completion_delta(data: &str) -> Option<String> {
    match serde_json::from_str::<ChatCompletionChunk>(data) {
        Ok(chunk) => chunk
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta.content)
            .filter(|content| !content.is_empty()),
        Err(err) => {
            warn!(error = %err, "skipping malformed SSE data line");
            None
        }
    }
}
