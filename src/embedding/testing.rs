//! Deterministic embedder for tests.

use super::Embedder;
use crate::error::Result;
use async_trait::async_trait;

const VOCAB: [&str; 4] = ["rust", "python", "salary", "holiday"];

/// Embeds text as keyword counts over a fixed vocabulary.
pub struct KeywordEmbedder;

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|t| {
                let lower = t.to_lowercase();
                VOCAB.iter().map(|w| lower.matches(w).count() as f32).collect()
            })
            .collect())
    }

    fn model(&self) -> &str {
        "keywords"
    }
}
