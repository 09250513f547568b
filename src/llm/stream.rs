//! Incremental decoding of newline-delimited JSON responses.
//!
//! The local service answers `/generate` with one JSON object per line, each
//! carrying a slice of the completion in its `response` field. Lines are
//! decoded as soon as they are complete, so the body never has to be held
//! and parsed as a single document. A fragment carrying `error` aborts the
//! call even when the HTTP status was 200.

use crate::llm::provider::LlmError;
use futures::{Stream, StreamExt};
use serde::Deserialize;
use tracing::{debug, warn};

/// One line of a streamed generation response
#[derive(Debug, Deserialize)]
pub struct Fragment {
    #[serde(default)]
    pub response: Option<String>,

    #[serde(default)]
    pub done: bool,

    #[serde(default)]
    pub error: Option<String>,
}

/// Accumulates fragments from raw body chunks
#[derive(Debug, Default)]
pub struct FragmentCollector {
    buffer: Vec<u8>,
    fragments: Vec<String>,
    rejected: Vec<String>,
    error: Option<String>,
}

impl FragmentCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of the body; complete lines are decoded immediately
    pub fn push_chunk(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);

        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.push_line(&line[..line.len() - 1]);
        }
    }

    fn push_line(&mut self, raw: &[u8]) {
        let decoded = String::from_utf8_lossy(raw);
        let line = decoded.trim();
        if line.is_empty() {
            return;
        }

        match serde_json::from_str::<Fragment>(line) {
            Ok(fragment) => {
                if let Some(error) = fragment.error {
                    warn!("Stream fragment reported an error: {}", error);
                    self.error.get_or_insert(error);
                    return;
                }
                if fragment.done {
                    debug!("Received final stream fragment");
                }
                self.fragments.push(fragment.response.unwrap_or_default());
            }
            Err(e) => {
                warn!("Error parsing line: {} | {}", line, e);
                self.rejected.push(line.to_string());
            }
        }
    }

    /// Number of fragments decoded so far
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Flush the trailing partial line and join the fragments with newlines.
    /// Fails if any fragment reported an error.
    pub fn finish(mut self) -> Result<String, LlmError> {
        if !self.buffer.is_empty() {
            let rest = std::mem::take(&mut self.buffer);
            self.push_line(&rest);
        }

        // A pretty-printed single object spans several lines and fails line by
        // line; give the whole body one more chance before giving up.
        if self.fragments.is_empty() && self.error.is_none() && !self.rejected.is_empty() {
            let whole = self.rejected.join("\n");
            if let Ok(fragment) = serde_json::from_str::<Fragment>(&whole) {
                if let Some(error) = fragment.error {
                    return Err(LlmError::ApiError(error));
                }
                return Ok(fragment.response.unwrap_or_default().trim().to_string());
            }
        }

        if let Some(error) = self.error {
            return Err(LlmError::ApiError(error));
        }

        Ok(self.fragments.join("\n").trim().to_string())
    }
}

/// Drain a body stream into the newline-joined completion text
pub async fn collect_fragments<S, B, E>(stream: S) -> Result<String, LlmError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Into<LlmError>,
{
    futures::pin_mut!(stream);

    let mut collector = FragmentCollector::new();
    while let Some(chunk) = stream.next().await {
        collector.push_chunk(chunk.map_err(Into::into)?.as_ref());
    }

    debug!("Collected {} stream fragments", collector.len());
    collector.finish()
}
