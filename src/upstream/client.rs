//! Streaming client for the upstream chat-completions endpoint.
//!
//! Issues `POST {base}/chat/completions` with `stream: true` and parses the
//! SSE response body (`data: ` lines terminated by a `[DONE]` sentinel) into
//! a stream of text deltas. The client holds a single reqwest handle built
//! once at startup; it carries only read-only configuration (base URL,
//! credential header) and is safe to share across concurrent requests.

use std::pin::Pin;

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::debug;

use crate::chat::message::ChatMessage;
use crate::chat::profile::SamplingParams;

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upstream API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid API key: {0}")]
    InvalidCredential(String),
}

/// One incremental unit from the upstream completion stream.
///
/// `role` is set on the first chunk of a response (OpenAI streaming
/// convention); `content` carries the text fragment, absent on role-only
/// and terminal chunks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamDelta {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// A finite, non-restartable sequence of deltas. An `Err` item means the
/// stream failed mid-flight; no further items follow it.
pub type DeltaStream = Pin<Box<dyn Stream<Item = Result<StreamDelta, UpstreamError>> + Send>>;

/// Seam between the HTTP handler and the upstream API.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Submit a conversation in streaming mode.
    ///
    /// Errors returned here occur before any output byte has been produced;
    /// later failures surface as `Err` items on the stream.
    async fn stream_chat(
        &self,
        model: &str,
        messages: &[ChatMessage],
        params: &SamplingParams,
    ) -> Result<DeltaStream, UpstreamError>;
}

#[derive(Serialize)]
struct CompletionPayload<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(flatten)]
    params: &'a SamplingParams,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    delta: StreamDelta,
}

/// Classification of one line of the SSE body.
#[derive(Debug)]
enum SseLine {
    /// Comment, blank line, or unparseable data — contributes nothing.
    Skip,
    /// The `[DONE]` sentinel: generation is complete.
    Done,
    /// A data line carrying choice deltas.
    Deltas(Vec<StreamDelta>),
}

fn parse_sse_line(line: &str) -> SseLine {
    let Some(data) = line.strip_prefix("data: ") else {
        return SseLine::Skip;
    };
    if data == "[DONE]" {
        return SseLine::Done;
    }
    match serde_json::from_str::<ChatCompletionChunk>(data) {
        Ok(chunk) => SseLine::Deltas(chunk.choices.into_iter().map(|c| c.delta).collect()),
        Err(e) => {
            debug!(error = %e, "Skipping unparseable stream line");
            SseLine::Skip
        }
    }
}

/// Upstream client for the hosted completions API.
pub struct RelayClient {
    http: HttpClient,
    base_url: String,
}

impl RelayClient {
    /// Build the client. The credential goes into a default Authorization
    /// header so every request reuses it; no timeouts are configured beyond
    /// reqwest's defaults.
    pub fn new(base_url: String, api_key: String) -> Result<Self, UpstreamError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| UpstreamError::InvalidCredential(e.to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = HttpClient::builder().default_headers(headers).build()?;

        Ok(Self { http, base_url })
    }
}

#[async_trait]
impl CompletionBackend for RelayClient {
    async fn stream_chat(
        &self,
        model: &str,
        messages: &[ChatMessage],
        params: &SamplingParams,
    ) -> Result<DeltaStream, UpstreamError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let payload = CompletionPayload {
            model,
            messages,
            params,
        };

        let resp = self.http.post(&url).json(&payload).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(UpstreamError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let (tx, rx) = mpsc::channel(32);

        tokio::spawn(async move {
            let mut body = resp.bytes_stream();
            // SSE events may span network chunk boundaries; carry the
            // incomplete tail line between reads.
            let mut carry = String::new();

            while let Some(chunk) = body.next().await {
                let chunk = match chunk {
                    Ok(c) => c,
                    Err(e) => {
                        let _ = tx.send(Err(UpstreamError::Transport(e))).await;
                        return;
                    }
                };

                carry.push_str(&String::from_utf8_lossy(&chunk));

                while let Some(pos) = carry.find('\n') {
                    let line = carry[..pos].trim_end_matches('\r').to_string();
                    carry.drain(..=pos);

                    match parse_sse_line(&line) {
                        SseLine::Skip => {}
                        SseLine::Done => return,
                        SseLine::Deltas(deltas) => {
                            for delta in deltas {
                                if tx.send(Ok(delta)).await.is_err() {
                                    // Receiver dropped (client went away).
                                    return;
                                }
                            }
                        }
                    }
                }
            }
        });

        Ok(Box::pin(ReceiverStream::new(rx)))
    }
}
