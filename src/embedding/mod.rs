//! Embedding generation for document retrieval.

mod gemini;
mod openai;
#[cfg(test)]
pub mod testing;

pub use gemini::GeminiEmbedder;
pub use openai::OpenAIEmbedder;

use crate::config::{Credentials, Provider, Settings};
use crate::error::{KioskError, Result};
use crate::llm::GeminiClient;
use async_trait::async_trait;
use std::sync::Arc;

/// Trait for embedding generation.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| KioskError::EmptyResult("Empty embedding response".to_string()))
    }

    /// Generate embeddings for multiple texts, in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embedding model name.
    fn model(&self) -> &str;
}

/// Construct the embedder for `provider` from its configured embedding model.
pub fn build_embedder(
    provider: Provider,
    settings: &Settings,
    credentials: &Credentials,
) -> Result<Arc<dyn Embedder>> {
    let endpoint = settings.providers.endpoint(provider);
    let model = endpoint.embedding_model.as_deref().ok_or_else(|| {
        KioskError::Config(format!("Provider {} has no embedding model configured", provider))
    })?;
    let api_key = credentials.for_provider(provider).map(str::to_string);
    let timeout = settings.request_timeout();

    match provider {
        Provider::OpenAI | Provider::Groq => Ok(Arc::new(OpenAIEmbedder::new(
            model,
            api_key,
            endpoint.base_url.as_deref(),
            timeout,
        )?)),
        Provider::Gemini => {
            let client = GeminiClient::new(endpoint.base_url.as_deref(), api_key, timeout)?;
            Ok(Arc::new(GeminiEmbedder::new(client, model)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_embedder_uses_configured_model() {
        let settings = Settings::default();
        let creds = Credentials::default();

        let embedder = build_embedder(Provider::Gemini, &settings, &creds).unwrap();
        assert_eq!(embedder.model(), "models/embedding-001");

        let embedder = build_embedder(Provider::OpenAI, &settings, &creds).unwrap();
        assert_eq!(embedder.model(), "text-embedding-3-small");
    }

    #[test]
    fn test_provider_without_embedding_model_is_config_error() {
        let result = build_embedder(Provider::Groq, &Settings::default(), &Credentials::default());
        assert!(matches!(result, Err(KioskError::Config(_))));
    }
}
