//! Process-local conversation log.

use jiff::Timestamp;
use serde::Serialize;

use crate::llm::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

enum_display!(Speaker, { User => "you", Assistant => "assistant" });

/// One entry in the conversation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
    /// Position in the conversation, starting at 0 after every reset
    pub index: usize,
    pub at: Timestamp,
}

/// Append-only list of turns, cleared wholesale on reset
#[derive(Debug, Default)]
pub struct ConversationMemory {
    turns: Vec<Turn>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, speaker: Speaker, text: impl Into<String>) -> &Turn {
        let index = self.turns.len();
        self.turns.push(Turn {
            speaker,
            text: text.into(),
            index,
            at: Timestamp::now(),
        });
        &self.turns[index]
    }

    pub fn push_user(&mut self, text: impl Into<String>) -> &Turn {
        self.push(Speaker::User, text)
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) -> &Turn {
        self.push(Speaker::Assistant, text)
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn reset(&mut self) {
        tracing::debug!("clearing {} turns", self.turns.len());
        self.turns.clear();
    }

    /// All turns as chat messages, oldest first
    pub fn to_messages(&self) -> Vec<Message> {
        self.turns
            .iter()
            .map(|turn| match turn.speaker {
                Speaker::User => Message::user(turn.text.clone()),
                Speaker::Assistant => Message::assistant(turn.text.clone()),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Role;

    #[test]
    fn test_indices_are_sequential() {
        let mut memory = ConversationMemory::new();
        assert_eq!(memory.push_user("hi").index, 0);
        assert_eq!(memory.push_assistant("hello").index, 1);
        assert_eq!(memory.push_user("close PROJ-1").index, 2);
        assert_eq!(memory.len(), 3);
    }

    #[test]
    fn test_reset_restarts_at_zero() {
        let mut memory = ConversationMemory::new();
        memory.push_user("one");
        memory.push_assistant("two");
        memory.reset();
        assert!(memory.is_empty());
        assert_eq!(memory.push_user("three").index, 0);
    }

    #[test]
    fn test_to_messages_keeps_order_and_roles() {
        let mut memory = ConversationMemory::new();
        memory.push_user("question");
        memory.push_assistant("answer");
        let messages = memory.to_messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].content, "question");
        assert_eq!(messages[1].role, Role::Assistant);
    }

    #[test]
    fn test_timestamps_do_not_go_backwards() {
        let mut memory = ConversationMemory::new();
        memory.push_user("a");
        memory.push_user("b");
        let turns = memory.turns();
        assert!(turns[0].at <= turns[1].at);
    }
}
