//! Scripted chat model for tests.

use super::{ChatModel, CompletionRequest};
use crate::config::Provider;
use crate::error::{KioskError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

enum Reply {
    Text(String),
    Fail(String),
    MissingKey(&'static str),
}

/// Returns queued replies in order and records every request it receives.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_replies(replies: &[&str]) -> Self {
        let model = Self::new();
        for reply in replies {
            model.push_text(reply);
        }
        model
    }

    pub fn push_text(&self, text: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Text(text.to_string()));
    }

    pub fn push_failure(&self, message: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Fail(message.to_string()));
    }

    pub fn push_missing_key(&self, var: &'static str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::MissingKey(var));
    }

    /// All requests received so far.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Text of the last user message of request `index`.
    pub fn last_prompt(&self, index: usize) -> String {
        self.requests.lock().unwrap()[index]
            .messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    fn provider(&self) -> Provider {
        Provider::OpenAI
    }

    fn model(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        match self.replies.lock().unwrap().pop_front() {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Fail(message)) => Err(KioskError::Upstream(message)),
            Some(Reply::MissingKey(var)) => Err(KioskError::MissingCredential(var)),
            None => Err(KioskError::Upstream("no scripted reply left".to_string())),
        }
    }
}
