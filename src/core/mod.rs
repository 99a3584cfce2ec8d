//! Core chat components
//!
//! The completion driver and the interactive turn loop built on it.

mod chat;
mod session;

pub use chat::{collect_reply, ChatEngine, ChatError};
pub use session::{InputSource, Session, SessionEnd, Transcript, UserInput};
