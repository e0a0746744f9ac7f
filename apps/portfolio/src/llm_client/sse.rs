//! Server-sent event decoding for `streamGenerateContent?alt=sse`.
//!
//! Network chunks do not line up with events: an event can be split anywhere,
//! including inside a multi-byte UTF-8 sequence. Bytes are buffered until a
//! full line is available and only complete lines are decoded.

use std::collections::VecDeque;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use futures::{stream, Stream, StreamExt};
use serde::Deserialize;

use super::{FragmentStream, LlmError};

#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: BytesMut,
    data: Vec<String>,
}

impl SseDecoder {
    /// Feeds raw bytes, returning the data payload of every event completed by them.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line = self.buffer.split_to(pos + 1);
            let line = String::from_utf8_lossy(&line);
            let line = line.trim_end_matches(&['\n', '\r'][..]);
            if let Some(event) = self.process_line(line) {
                events.push(event);
            }
        }
        events
    }

    /// Flushes an event left unterminated when the body ended.
    pub fn finish(&mut self) -> Option<String> {
        if !self.buffer.is_empty() {
            let rest = self.buffer.split();
            let rest = String::from_utf8_lossy(&rest);
            let line = rest.trim_end_matches(&['\n', '\r'][..]).to_string();
            if let Some(event) = self.process_line(&line) {
                return Some(event);
            }
        }
        self.dispatch()
    }

    fn process_line(&mut self, line: &str) -> Option<String> {
        if line.is_empty() {
            return self.dispatch();
        }
        // Comments and non-data fields (event:, id:, retry:) carry nothing we use.
        if let Some(value) = line.strip_prefix("data:") {
            let value = value.strip_prefix(' ').unwrap_or(value);
            self.data.push(value.to_string());
        }
        None
    }

    fn dispatch(&mut self) -> Option<String> {
        if self.data.is_empty() {
            return None;
        }
        let payload = self.data.join("\n");
        self.data.clear();
        Some(payload)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Gemini chunk payloads
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StreamChunk {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
    #[serde(default)]
    error: Option<ChunkError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<ChunkContent>,
}

#[derive(Debug, Deserialize)]
struct ChunkContent {
    #[serde(default)]
    parts: Vec<ChunkPart>,
}

#[derive(Debug, Deserialize)]
struct ChunkPart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    thought: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChunkError {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: String,
}

/// Extracts the visible text of one event payload.
///
/// `Ok(None)` for chunks that carry no text (usage metadata, finish markers).
pub fn parse_payload(payload: &str) -> Result<Option<String>, LlmError> {
    let payload = payload.trim();
    if payload.is_empty() || payload == "[DONE]" {
        return Ok(None);
    }

    let chunk: StreamChunk = serde_json::from_str(payload)?;

    if let Some(err) = chunk.error {
        return Err(LlmError::Api {
            status: err.code,
            message: err.message,
        });
    }

    if chunk.candidates.is_empty() {
        if let Some(reason) = chunk.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(LlmError::Blocked(reason));
        }
        return Ok(None);
    }

    let text: String = chunk
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter(|p| p.thought != Some(true))
                .filter_map(|p| p.text)
                .collect()
        })
        .unwrap_or_default();

    Ok((!text.is_empty()).then_some(text))
}

// ────────────────────────────────────────────────────────────────────────────
// Body → fragments
// ────────────────────────────────────────────────────────────────────────────

struct DecodeState<S> {
    body: S,
    idle_timeout: Duration,
    decoder: SseDecoder,
    pending: VecDeque<Result<String, LlmError>>,
    done: bool,
}

impl<S> DecodeState<S> {
    fn enqueue(&mut self, payload: &str) {
        match parse_payload(payload) {
            Ok(Some(text)) => self.pending.push_back(Ok(text)),
            Ok(None) => {}
            Err(e) => {
                self.pending.push_back(Err(e));
                self.done = true;
            }
        }
    }
}

/// Turns an SSE response body into a fragment stream.
/// The stream ends after the first error, whether from the transport, from a
/// payload, or from the body going silent for longer than `idle_timeout`.
/// A reply may take arbitrarily long overall as long as chunks keep arriving.
pub fn fragment_stream<S, E>(body: S, idle_timeout: Duration) -> FragmentStream
where
    S: Stream<Item = Result<Bytes, E>> + Send + Unpin + 'static,
    E: Into<LlmError> + Send + 'static,
{
    let state = DecodeState {
        body,
        idle_timeout,
        decoder: SseDecoder::default(),
        pending: VecDeque::new(),
        done: false,
    };

    Box::pin(stream::unfold(state, |mut st| async move {
        loop {
            if let Some(item) = st.pending.pop_front() {
                return Some((item, st));
            }
            if st.done {
                return None;
            }
            let next = match tokio::time::timeout(st.idle_timeout, st.body.next()).await {
                Ok(next) => next,
                Err(_) => {
                    st.pending.push_back(Err(LlmError::Stream(format!(
                        "no data received for {}s",
                        st.idle_timeout.as_secs()
                    ))));
                    st.done = true;
                    continue;
                }
            };
            match next {
                Some(Ok(bytes)) => {
                    for payload in st.decoder.push(&bytes) {
                        if st.done {
                            break;
                        }
                        st.enqueue(&payload);
                    }
                }
                Some(Err(e)) => {
                    st.pending.push_back(Err(e.into()));
                    st.done = true;
                }
                None => {
                    if let Some(payload) = st.decoder.finish() {
                        st.enqueue(&payload);
                    }
                    st.done = true;
                }
            }
        }
    }))
}
