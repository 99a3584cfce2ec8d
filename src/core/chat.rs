//! Completion driver
//!
//! The ChatEngine turns a full conversation into one assistant reply:
//! 1. Hands every message, system prompt included, to the backend
//! 2. Drains the fragment stream in arrival order
//! 3. Returns the accumulated text, or the first fault the stream raised

use futures::{Stream, StreamExt};
use tracing::debug;

use crate::conversation::Conversation;
use crate::providers::{CompletionBackend, Fragment, ProviderError};

/// Errors from the chat engine
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// The core chat engine
pub struct ChatEngine<B> {
    backend: B,
}

impl<B: CompletionBackend> ChatEngine<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Request a reply for the conversation as it stands.
    pub async fn complete(&self, conversation: &Conversation) -> Result<String, ChatError> {
        self.complete_with(conversation, |_| {}).await
    }

    /// Like [`complete`](Self::complete), calling `on_fragment` for each
    /// piece of text as it arrives. The return value is unaffected.
    pub async fn complete_with<F>(
        &self,
        conversation: &Conversation,
        on_fragment: F,
    ) -> Result<String, ChatError>
    where
        F: FnMut(&str),
    {
        let stream = self.backend.stream_chat(conversation.messages()).await?;
        let reply = collect_reply(stream, on_fragment).await?;
        debug!(conversation = %conversation.id(), chars = reply.len(), "reply assembled");
        Ok(reply)
    }
}

/// Concatenate non-empty fragments; absent or empty ones are skipped, and
/// any error discards what was collected so far.
pub async fn collect_reply<S, F>(stream: S, mut on_fragment: F) -> Result<String, ProviderError>
where
    S: Stream<Item = Result<Fragment, ProviderError>>,
    F: FnMut(&str),
{
    futures::pin_mut!(stream);

    let mut reply = String::new();
    while let Some(item) = stream.next().await {
        match item? {
            Some(text) if !text.is_empty() => {
                on_fragment(&text);
                reply.push_str(&text);
            }
            _ => {}
        }
    }
    Ok(reply)
}
