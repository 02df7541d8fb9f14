//! Session chat history.

use crate::llm::ChatMessage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One question and the answer it received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub question: String,
    pub answer: String,
    pub at: DateTime<Utc>,
}

/// Append-only list of turns, replayed in full on every new question.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatHistory {
    turns: Vec<ChatTurn>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.turns.push(ChatTurn {
            question: question.into(),
            answer: answer.into(),
            at: Utc::now(),
        });
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Alternating user/assistant messages, oldest first.
    pub fn to_messages(&self) -> Vec<ChatMessage> {
        self.turns
            .iter()
            .flat_map(|t| {
                [
                    ChatMessage::user(t.question.clone()),
                    ChatMessage::assistant(t.answer.clone()),
                ]
            })
            .collect()
    }

    /// Plain-text transcript used when condensing follow-up questions.
    pub fn to_transcript(&self) -> String {
        self.turns
            .iter()
            .map(|t| format!("Human: {}\nAssistant: {}", t.question, t.answer))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Role;

    #[test]
    fn test_n_turns_kept_in_submission_order() {
        let mut history = ChatHistory::new();
        for i in 0..5 {
            history.push(format!("q{}", i), format!("a{}", i));
        }

        assert_eq!(history.len(), 5);
        let pairs: Vec<(&str, &str)> = history
            .turns()
            .iter()
            .map(|t| (t.question.as_str(), t.answer.as_str()))
            .collect();
        assert_eq!(pairs, vec![("q0", "a0"), ("q1", "a1"), ("q2", "a2"), ("q3", "a3"), ("q4", "a4")]);
    }

    #[test]
    fn test_messages_alternate_roles() {
        let mut history = ChatHistory::new();
        history.push("hi", "hello");
        history.push("how are you", "fine");

        let messages = history.to_messages();
        let roles: Vec<Role> = messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User, Role::Assistant]);
        assert_eq!(messages[2].content, "how are you");
    }

    #[test]
    fn test_transcript_and_clear() {
        let mut history = ChatHistory::new();
        history.push("What is the notice period?", "Four weeks.");
        assert_eq!(
            history.to_transcript(),
            "Human: What is the notice period?\nAssistant: Four weeks."
        );

        history.clear();
        assert!(history.is_empty());
        assert!(history.to_messages().is_empty());
    }
}
