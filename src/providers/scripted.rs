//! Scripted backend that replays canned fragment sequences

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use futures::StreamExt;

use crate::conversation::Message;

use super::{CompletionBackend, Fragment, FragmentStream, ProviderError};

pub type ScriptedReply = Vec<Result<Fragment, ProviderError>>;

#[derive(Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<ScriptedReply>>,
    calls: AtomicUsize,
    seen: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply made of plain text fragments.
    pub fn reply(self, fragments: &[&str]) -> Self {
        let items = fragments.iter().map(|f| Ok(Some(f.to_string()))).collect();
        self.reply_with(items)
    }

    pub fn reply_with(self, items: ScriptedReply) -> Self {
        self.replies.lock().unwrap().push_back(items);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Conversations received, one entry per call.
    pub fn seen(&self) -> Vec<Vec<Message>> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn stream_chat(&self, messages: &[Message]) -> Result<FragmentStream, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(messages.to_vec());

        let items = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ProviderError::InvalidResponse("no scripted reply left".into()))?;

        Ok(futures::stream::iter(items).boxed())
    }
}
