//! Interactive turn loop

use std::io;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::conversation::{Conversation, TurnState};
use crate::providers::CompletionBackend;

use super::chat::{ChatEngine, ChatError};

/// What the prompt produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserInput {
    Line(String),
    /// Ctrl-C or end of input.
    Interrupted,
}

#[async_trait]
pub trait InputSource: Send {
    async fn read_line(&mut self) -> io::Result<UserInput>;

    /// Resolves when the user interrupts while a reply is pending.
    async fn interrupted(&mut self) {
        futures::future::pending::<()>().await
    }
}

/// Where the session renders what happens.
pub trait Transcript {
    fn welcome(&mut self) -> io::Result<()>;
    fn context(&mut self, conversation: &Conversation) -> io::Result<()>;
    fn reply(&mut self, text: &str) -> io::Result<()>;
    fn goodbye(&mut self) -> io::Result<()>;
    fn error(&mut self, message: &str) -> io::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Goodbye,
    Failed,
}

#[derive(Debug, thiserror::Error)]
enum TurnError {
    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

enum TurnOutcome {
    Continue,
    Interrupted,
}

pub struct Session<B> {
    engine: ChatEngine<B>,
    conversation: Conversation,
    verbose: bool,
}

impl<B: CompletionBackend> Session<B> {
    pub fn new(engine: ChatEngine<B>, system_prompt: impl Into<String>, verbose: bool) -> Self {
        Self {
            engine,
            conversation: Conversation::new(system_prompt),
            verbose,
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn engine(&self) -> &ChatEngine<B> {
        &self.engine
    }

    /// Run turns until the user leaves or a turn fails. A failure is
    /// reported once through the transcript and ends the session.
    pub async fn run<I, T>(&mut self, input: &mut I, out: &mut T) -> io::Result<SessionEnd>
    where
        I: InputSource,
        T: Transcript,
    {
        info!(conversation = %self.conversation.id(), verbose = self.verbose, "session started");
        out.welcome()?;

        let end = loop {
            match self.turn(input, out).await {
                Ok(TurnOutcome::Continue) => continue,
                Ok(TurnOutcome::Interrupted) => {
                    out.goodbye()?;
                    break SessionEnd::Goodbye;
                }
                Err(e) => {
                    out.error(&e.to_string())?;
                    break SessionEnd::Failed;
                }
            }
        };

        info!(messages = self.conversation.len(), ?end, "session ended");
        Ok(end)
    }

    async fn turn<I, T>(&mut self, input: &mut I, out: &mut T) -> Result<TurnOutcome, TurnError>
    where
        I: InputSource,
        T: Transcript,
    {
        let line = match input.read_line().await? {
            UserInput::Line(line) => line,
            UserInput::Interrupted => return Ok(TurnOutcome::Interrupted),
        };

        if self.conversation.turn_state() == TurnState::AwaitingAssistant {
            warn!("previous user message has no reply");
        }
        self.conversation.add_user(line);

        if self.verbose {
            debug!(context = %self.conversation.render_as_text(), "context window");
            out.context(&self.conversation)?;
        }

        let reply = tokio::select! {
            biased;
            _ = input.interrupted() => return Ok(TurnOutcome::Interrupted),
            reply = self.engine.complete(&self.conversation) => reply?,
        };

        self.conversation.add_assistant(reply.as_str());
        out.reply(&reply)?;
        Ok(TurnOutcome::Continue)
    }
}
