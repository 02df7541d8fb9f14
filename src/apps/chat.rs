//! Multi-turn chatbot session.

use crate::error::{KioskError, Result};
use crate::history::ChatHistory;
use crate::llm::{ChatMessage, ChatModel, CompletionRequest};
use std::sync::Arc;
use tracing::{debug, instrument};

/// A conversation that replays its whole history on every turn.
pub struct ChatSession {
    model: Arc<dyn ChatModel>,
    history: ChatHistory,
}

impl ChatSession {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self {
            model,
            history: ChatHistory::new(),
        }
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Send `question` after every previous turn and record the answer.
    #[instrument(skip(self), fields(turn = self.history.len() + 1))]
    pub async fn send(&mut self, question: &str) -> Result<String> {
        let question = question.trim();
        if question.is_empty() {
            return Err(KioskError::InvalidInput("Question is empty".to_string()));
        }

        let mut messages = self.history.to_messages();
        messages.push(ChatMessage::user(question));
        debug!("Replaying {} messages", messages.len());

        let answer = self
            .model
            .complete(&CompletionRequest::conversation(messages))
            .await?;
        self.history.push(question, answer.clone());
        Ok(answer)
    }
}
