//! LLM TUI Chat
//!
//! A terminal chat client for OpenAI-compatible chat-completion servers.
//! The whole conversation is sent on every turn and the streamed reply is
//! shown in a panel once it is complete.

pub mod config;
pub mod conversation;
pub mod core;
pub mod providers;
pub mod ui;
