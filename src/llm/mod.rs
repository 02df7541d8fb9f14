//! Hosted chat model abstraction.
//!
//! Every app talks to a model through [`ChatModel`], constructed once at the
//! command entry point by [`build_chat_model`] and passed in as an
//! `Arc<dyn ChatModel>`. Missing API keys are reported by `complete`, not at
//! construction, so a tool can turn them into a failed result.

mod gemini;
mod openai;
#[cfg(test)]
pub mod testing;

pub use gemini::{GeminiChat, GeminiClient};
pub use openai::{create_client, OpenAiChat};

use crate::config::{Credentials, Provider, Settings};
use crate::error::{KioskError, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use std::path::Path;
use std::sync::Arc;

/// Speaker of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// An image attached to a user message.
#[derive(Debug, Clone)]
pub struct ImageInput {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl ImageInput {
    /// Read an image file, inferring the MIME type from its extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let mime_type = mime_for_path(path).ok_or_else(|| {
            KioskError::InvalidInput(format!(
                "Unsupported image type: {} (expected png, jpg or jpeg)",
                path.display()
            ))
        })?;
        let data = std::fs::read(path)?;
        Ok(Self {
            mime_type: mime_type.to_string(),
            data,
        })
    }

    /// Base64 payload for inline upload.
    pub fn base64(&self) -> String {
        STANDARD.encode(&self.data)
    }

    /// `data:` URL form, as accepted by OpenAI-compatible vision models.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64())
    }
}

fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// A single chat message.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub images: Vec<ImageInput>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            images: Vec::new(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            images: Vec::new(),
        }
    }

    pub fn with_image(mut self, image: ImageInput) -> Self {
        self.images.push(image);
        self
    }
}

/// A completion request independent of provider wire format.
#[derive(Debug, Clone, Default)]
pub struct CompletionRequest {
    pub system: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    /// A request with a single user prompt.
    pub fn prompt(text: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::user(text)],
            ..Default::default()
        }
    }

    /// A request replaying the given conversation.
    pub fn conversation(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// A hosted chat-completion model.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Which provider serves this model.
    fn provider(&self) -> Provider;

    /// Model name sent to the provider.
    fn model(&self) -> &str;

    /// Send the request and return the response text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

/// Construct the chat model for `provider`, using `model` or the provider's configured default.
pub fn build_chat_model(
    provider: Provider,
    model: Option<&str>,
    settings: &Settings,
    credentials: &Credentials,
) -> Result<Arc<dyn ChatModel>> {
    let endpoint = settings.providers.endpoint(provider);
    let model = model.unwrap_or(&endpoint.model).to_string();
    let api_key = credentials.for_provider(provider).map(str::to_string);
    let timeout = settings.request_timeout();

    tracing::debug!("Using {} model {}", provider, model);

    match provider {
        Provider::OpenAI | Provider::Groq => Ok(Arc::new(OpenAiChat::new(
            provider,
            &model,
            api_key,
            endpoint.base_url.as_deref(),
            timeout,
        )?)),
        Provider::Gemini => {
            let client = GeminiClient::new(endpoint.base_url.as_deref(), api_key, timeout)?;
            Ok(Arc::new(GeminiChat::new(client, &model)))
        }
    }
}
