//! Completion service integrations

mod openai_compat;
#[cfg(test)]
pub mod scripted;
mod sse;

use async_trait::async_trait;
use futures::stream::BoxStream;
use thiserror::Error;

use crate::conversation::Message;

pub use openai_compat::OpenAICompatProvider;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// One streamed delta. `None` means the chunk carried no text.
pub type Fragment = Option<String>;

pub type FragmentStream = BoxStream<'static, Result<Fragment, ProviderError>>;

/// A service that answers a conversation with a stream of text fragments.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn stream_chat(&self, messages: &[Message]) -> Result<FragmentStream, ProviderError>;
}
