//! Generation tool: one prompt in, one model response out.

use super::{Tool, ToolResult};
use crate::llm::{ChatModel, CompletionRequest};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// Sends a prompt with a fixed system prompt to a chat model.
pub struct GenerationTool {
    model: Arc<dyn ChatModel>,
    system_prompt: Option<String>,
}

impl GenerationTool {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self {
            model,
            system_prompt: None,
        }
    }

    pub fn with_system_prompt(mut self, prompt: &str) -> Self {
        self.system_prompt = Some(prompt.to_string());
        self
    }
}

#[async_trait]
impl Tool for GenerationTool {
    fn name(&self) -> &str {
        "generate"
    }

    async fn run(&self, prompt: &str) -> ToolResult {
        let mut request = CompletionRequest::prompt(prompt);
        if let Some(system) = &self.system_prompt {
            request = request.with_system(system.clone());
        }

        info!("Generating with {} ({})", self.model.model(), self.model.provider());
        let result = self.model.complete(&request).await;
        if let Err(e) = &result {
            warn!("Generation failed: {}", e);
        }
        ToolResult::from(result)
    }
}
