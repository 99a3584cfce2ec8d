//! Conversation types and state management
//!
//! A [`Conversation`] is the transcript of one chat session and, at the same
//! time, the exact payload sent to the completion service. It only grows:
//! the system message placed at construction stays at index 0 for the
//! lifetime of the session.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Wire name, as sent to the completion service.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Capitalized name used in transcripts.
    pub fn label(&self) -> &'static str {
        match self {
            Role::System => "System",
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

/// Whose move it is, derived from the last message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    AwaitingUser,
    AwaitingAssistant,
}

#[derive(Debug, Clone)]
pub struct Conversation {
    id: Uuid,
    messages: Vec<Message>,
}

impl Conversation {
    /// Start a conversation with its one system message.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            messages: vec![Message {
                role: Role::System,
                content: system_prompt.into(),
            }],
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn system_prompt(&self) -> &str {
        &self.messages[0].content
    }

    /// Append one message. Content is not validated; empty text is allowed.
    pub fn append(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(Message {
            role,
            content: content.into(),
        });
    }

    pub fn add_user(&mut self, content: impl Into<String>) {
        self.append(Role::User, content);
    }

    pub fn add_assistant(&mut self, content: impl Into<String>) {
        self.append(Role::Assistant, content);
    }

    pub fn turn_state(&self) -> TurnState {
        match self.messages.last().map(|m| m.role) {
            Some(Role::User) => TurnState::AwaitingAssistant,
            _ => TurnState::AwaitingUser,
        }
    }

    /// Plain-text rendering, one `"<Role>: <content>"` line per message.
    pub fn render_as_text(&self) -> String {
        self.messages
            .iter()
            .map(|m| format!("{}: {}", m.role.label(), m.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_system_message() {
        let conversation = Conversation::new("Be brief");
        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation.messages()[0].role, Role::System);
        assert_eq!(conversation.system_prompt(), "Be brief");
        assert_eq!(conversation.turn_state(), TurnState::AwaitingUser);
    }

    #[test]
    fn test_render_as_text() {
        let mut conversation = Conversation::new("S");
        conversation.add_user("U1");
        conversation.add_assistant("A1");

        let rendered = conversation.render_as_text();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines, vec!["System: S", "User: U1", "Assistant: A1"]);
        assert_eq!(conversation.len(), 3);
    }

    #[test]
    fn test_turn_state_follows_last_role() {
        let mut conversation = Conversation::new("S");
        conversation.add_user("hi");
        assert_eq!(conversation.turn_state(), TurnState::AwaitingAssistant);

        // Unpaired user messages are allowed to stack up.
        conversation.add_user("");
        assert_eq!(conversation.turn_state(), TurnState::AwaitingAssistant);
        assert_eq!(conversation.messages()[2].content, "");

        conversation.add_assistant("hello");
        assert_eq!(conversation.turn_state(), TurnState::AwaitingUser);
        assert_eq!(conversation.system_prompt(), "S");
    }

    #[test]
    fn test_message_serializes_lowercase_role() {
        let msg = Message {
            role: Role::Assistant,
            content: "ok".to_string(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "ok");
    }
}
