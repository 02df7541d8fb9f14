//! Gemini embeddings via `batchEmbedContents`.

use super::Embedder;
use crate::error::{KioskError, Result};
use crate::llm::GeminiClient;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Gemini-based embedder.
pub struct GeminiEmbedder {
    client: GeminiClient,
    model: String,
}

impl GeminiEmbedder {
    pub fn new(client: GeminiClient, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl Embedder for GeminiEmbedder {
    #[instrument(skip(self, texts), fields(count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        // batchEmbedContents accepts at most 100 requests per call
        const BATCH_SIZE: usize = 100;
        let mut all_embeddings = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(BATCH_SIZE) {
            let embeddings = self.client.embed_batch(&self.model, chunk).await?;
            if embeddings.len() != chunk.len() {
                return Err(KioskError::Upstream(format!(
                    "Expected {} embeddings, got {}",
                    chunk.len(),
                    embeddings.len()
                )));
            }
            all_embeddings.extend(embeddings);
        }

        debug!("Generated {} embeddings", all_embeddings.len());
        Ok(all_embeddings)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test]
    async fn test_embed_single_text() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/models/embedding-001:batchEmbedContents")
                    .header("x-goog-api-key", "g-key");
                then.status(200)
                    .json_body(json!({"embeddings": [{"values": [0.5, -0.5]}]}));
            })
            .await;

        let client =
            GeminiClient::new(Some(&server.base_url()), Some("g-key".to_string()), Duration::from_secs(5))
                .unwrap();
        let embedder = GeminiEmbedder::new(client, "models/embedding-001");

        assert_eq!(embedder.embed("hello").await.unwrap(), vec![0.5, -0.5]);
    }

    #[tokio::test]
    async fn test_count_mismatch_is_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/models/embedding-001:batchEmbedContents");
                then.status(200).json_body(json!({"embeddings": []}));
            })
            .await;

        let client =
            GeminiClient::new(Some(&server.base_url()), Some("k".to_string()), Duration::from_secs(5)).unwrap();
        let embedder = GeminiEmbedder::new(client, "embedding-001");

        let err = embedder.embed_batch(&["a".to_string()]).await.unwrap_err();
        assert!(matches!(err, KioskError::Upstream(_)));
    }
}
