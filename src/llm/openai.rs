//! OpenAI-compatible chat completions (OpenAI and Groq).

use super::{ChatMessage, ChatModel, CompletionRequest, Role};
use crate::config::credentials::env_var_for;
use crate::config::Provider;
use crate::error::{KioskError, Result};
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestMessageContentPartImageArgs,
    ChatCompletionRequestMessageContentPartTextArgs, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, ChatCompletionRequestUserMessageContentPart,
    CreateChatCompletionRequestArgs, ImageUrlArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

/// Create an OpenAI client with the given key, API base, and request timeout.
///
/// Groq is reached through the same client by pointing `api_base` at its
/// OpenAI-compatible endpoint.
pub fn create_client(
    api_key: Option<&str>,
    api_base: Option<&str>,
    timeout: Duration,
) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder().timeout(timeout).build()?;

    let mut config = OpenAIConfig::new();
    if let Some(key) = api_key {
        config = config.with_api_key(key);
    }
    if let Some(base) = api_base {
        config = config.with_api_base(base);
    }

    Ok(Client::with_config(config).with_http_client(http_client))
}

/// Chat model served over the OpenAI chat completions API.
pub struct OpenAiChat {
    client: Client<OpenAIConfig>,
    provider: Provider,
    model: String,
    has_key: bool,
}

impl OpenAiChat {
    pub fn new(
        provider: Provider,
        model: &str,
        api_key: Option<String>,
        api_base: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = create_client(api_key.as_deref(), api_base, timeout)?;
        Ok(Self {
            client,
            provider,
            model: model.to_string(),
            has_key: api_key.is_some(),
        })
    }

    fn build_messages(&self, request: &CompletionRequest) -> Result<Vec<ChatCompletionRequestMessage>> {
        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::new();

        if let Some(system) = &request.system {
            messages.push(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system.clone())
                    .build()
                    .map_err(openai_err)?
                    .into(),
            );
        }

        for message in &request.messages {
            let built = match message.role {
                Role::User => user_message(message)?,
                Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                    .content(message.content.clone())
                    .build()
                    .map_err(openai_err)?
                    .into(),
            };
            messages.push(built);
        }

        Ok(messages)
    }
}

fn user_message(message: &ChatMessage) -> Result<ChatCompletionRequestMessage> {
    if message.images.is_empty() {
        return Ok(ChatCompletionRequestUserMessageArgs::default()
            .content(message.content.clone())
            .build()
            .map_err(openai_err)?
            .into());
    }

    let mut parts: Vec<ChatCompletionRequestUserMessageContentPart> = vec![
        ChatCompletionRequestMessageContentPartTextArgs::default()
            .text(message.content.clone())
            .build()
            .map_err(openai_err)?
            .into(),
    ];

    for image in &message.images {
        let image_url = ImageUrlArgs::default()
            .url(image.data_url())
            .build()
            .map_err(openai_err)?;
        parts.push(
            ChatCompletionRequestMessageContentPartImageArgs::default()
                .image_url(image_url)
                .build()
                .map_err(openai_err)?
                .into(),
        );
    }

    Ok(ChatCompletionRequestUserMessageArgs::default()
        .content(parts)
        .build()
        .map_err(openai_err)?
        .into())
}

fn openai_err(e: async_openai::error::OpenAIError) -> KioskError {
    KioskError::OpenAI(e.to_string())
}

#[async_trait]
impl ChatModel for OpenAiChat {
    fn provider(&self) -> Provider {
        self.provider
    }

    fn model(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, request), fields(provider = %self.provider, model = %self.model))]
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        if !self.has_key {
            return Err(KioskError::MissingCredential(env_var_for(self.provider)));
        }

        let messages = self.build_messages(request)?;
        debug!("Sending {} messages", messages.len());

        let mut request_builder = CreateChatCompletionRequestArgs::default();
        request_builder.model(&self.model).messages(messages);
        if let Some(temperature) = request.temperature {
            request_builder.temperature(temperature);
        }
        let chat_request = request_builder.build().map_err(openai_err)?;

        let response = self
            .client
            .chat()
            .create(chat_request)
            .await
            .map_err(|e| KioskError::OpenAI(format!("Chat API error: {}", e)))?;

        response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| KioskError::EmptyResult("Empty response from model".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ImageInput;

    fn chat(provider: Provider) -> OpenAiChat {
        OpenAiChat::new(
            provider,
            "gpt-4o-mini",
            Some("sk-test".to_string()),
            None,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_build_messages_orders_system_first() {
        let request = CompletionRequest::conversation(vec![
            ChatMessage::user("hi"),
            ChatMessage::assistant("hello"),
            ChatMessage::user("how are you?"),
        ])
        .with_system("be brief");

        let messages = chat(Provider::OpenAI).build_messages(&request).unwrap();
        assert_eq!(messages.len(), 4);
        assert!(matches!(messages[0], ChatCompletionRequestMessage::System(_)));
        assert!(matches!(messages[2], ChatCompletionRequestMessage::Assistant(_)));
    }

    #[test]
    fn test_image_message_builds_content_parts() {
        let image = ImageInput {
            mime_type: "image/png".to_string(),
            data: vec![1, 2, 3],
        };
        let message = ChatMessage::user("describe").with_image(image);
        let built = user_message(&message).unwrap();
        assert!(matches!(built, ChatCompletionRequestMessage::User(_)));
    }

    #[tokio::test]
    async fn test_missing_key_names_groq_variable() {
        let model = OpenAiChat::new(
            Provider::Groq,
            "llama-3.3-70b-versatile",
            None,
            Some("http://127.0.0.1:9"),
            Duration::from_secs(1),
        )
        .unwrap();

        let err = model.complete(&CompletionRequest::prompt("x")).await.unwrap_err();
        assert_eq!(err.to_string(), "Missing GROQ_API_KEY");
    }
}
