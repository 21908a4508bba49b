//! The chat surface: one line of user text in, one rendered reply out.

pub mod render;
pub mod repl;

use crate::agent::{ConversationMemory, DispatchAgent, Turn};
use crate::tools::format::FAILURE_MARKER;

pub use render::TypingRenderer;
pub use repl::run_repl;

/// A conversation bound to an agent
pub struct ChatSession {
    agent: DispatchAgent,
    memory: ConversationMemory,
}

impl ChatSession {
    pub fn new(agent: DispatchAgent) -> Self {
        Self {
            agent,
            memory: ConversationMemory::new(),
        }
    }

    /// Handle one user message and return the reply to display.
    ///
    /// The user turn is always recorded. The assistant turn is recorded only
    /// when the model answered; a model failure is reported as a `❌` line.
    pub async fn submit(&mut self, input: &str) -> String {
        let input = input.trim();
        let reply = self.agent.respond(input, &self.memory).await;
        self.memory.push_user(input);

        match reply {
            Ok(text) => {
                self.memory.push_assistant(text.clone());
                text
            }
            Err(e) => {
                tracing::error!("agent failed: {e}");
                format!("{FAILURE_MARKER} Error: {e}")
            }
        }
    }

    /// Forget the conversation
    pub fn reset(&mut self) {
        self.memory.reset();
    }

    pub fn transcript(&self) -> &[Turn] {
        self.memory.turns()
    }
}
