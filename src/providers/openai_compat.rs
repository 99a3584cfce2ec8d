//! OpenAI-compatible streaming provider
//!
//! Works with any server that implements the OpenAI chat completions format
//! with `stream: true`: OpenAI itself, LM Studio, vLLM, llama.cpp server,
//! LocalAI and the like.
//!
//! The response body is Server-Sent Events. Each `data:` line carries one
//! JSON chunk whose `choices[0].delta.content` is the next fragment, and the
//! stream ends with `data: [DONE]`.

use async_stream::try_stream;
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::conversation::Message;

use super::sse::{SseDecoder, SseEvent};
use super::{CompletionBackend, Fragment, FragmentStream, ProviderError};

/// OpenAI-compatible chat message
#[derive(Debug, Clone, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<&'a Message> for ChatMessage<'a> {
    fn from(msg: &'a Message) -> Self {
        Self {
            role: msg.role.as_str(),
            content: &msg.content,
        }
    }
}

/// Streaming chat completion request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

/// One `data:` payload of the event stream
#[derive(Debug, Deserialize)]
struct ChatCompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: Option<Delta>,
}

#[derive(Debug, Deserialize)]
struct Delta {
    #[serde(default)]
    content: Option<String>,
}

/// Error response from API
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// OpenAI-compatible API provider
pub struct OpenAICompatProvider {
    config: Config,
    client: Client,
}

impl OpenAICompatProvider {
    /// The client carries no request timeout; a stalled server stalls the turn.
    pub fn new(config: Config) -> Result<Self, ProviderError> {
        let client = Client::builder().build()?;
        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }
}

#[async_trait]
impl CompletionBackend for OpenAICompatProvider {
    async fn stream_chat(&self, messages: &[Message]) -> Result<FragmentStream, ProviderError> {
        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages: messages.iter().map(ChatMessage::from).collect(),
            stream: true,
        };

        let url = self.endpoint();
        debug!(%url, model = %self.config.model, messages = messages.len(), "sending completion request");

        let mut req_builder = self.client.post(&url);

        // Add authorization if API key is provided
        if let Some(ref api_key) = self.config.api_key {
            req_builder = req_builder.bearer_auth(api_key);
        }

        let response = req_builder
            .header("Accept", "text/event-stream")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_body(status, &body));
        }

        Ok(fragments(response).boxed())
    }
}

fn error_from_body(status: reqwest::StatusCode, body: &str) -> ProviderError {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(error_resp) => ProviderError::Api(error_resp.error.message),
        Err(_) => ProviderError::InvalidResponse(format!("HTTP {}: {}", status, body)),
    }
}

fn fragments(response: reqwest::Response) -> impl Stream<Item = Result<Fragment, ProviderError>> {
    try_stream! {
        let mut bytes = response.bytes_stream();
        let mut decoder = SseDecoder::default();
        let mut chunks = 0usize;
        let mut done = false;

        'body: while let Some(chunk) = bytes.next().await {
            let chunk = chunk?;
            for event in decoder.feed(&chunk) {
                match event {
                    SseEvent::Done => {
                        done = true;
                        break 'body;
                    }
                    SseEvent::Data(data) => {
                        chunks += 1;
                        let fragment = parse_chunk(&data)?;
                        yield fragment;
                    }
                }
            }
        }

        // Anything after `[DONE]` is ignored; only an unterminated body is flushed.
        if !done {
            if let Some(SseEvent::Data(data)) = decoder.finish() {
                chunks += 1;
                let fragment = parse_chunk(&data)?;
                yield fragment;
            }
        }

        debug!(chunks, done, "completion stream finished");
    }
}

fn parse_chunk(data: &str) -> Result<Fragment, ProviderError> {
    let chunk: ChatCompletionChunk = serde_json::from_str(data).map_err(|e| {
        ProviderError::InvalidResponse(format!("Failed to parse stream chunk: {} - Data: {}", e, data))
    })?;

    if let Some(error) = chunk.error {
        return Err(ProviderError::Api(error.message));
    }

    Ok(chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta)
        .and_then(|delta| delta.content))
}
