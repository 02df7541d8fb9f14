//! In-memory embedding index with cosine-similarity retrieval.

use crate::embedding::Embedder;
use crate::error::{KioskError, Result};
use tracing::{debug, info, instrument};

/// A retrieved chunk and its similarity to the query.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub text: String,
    pub score: f32,
}

/// Chunks of one document and their embeddings, held for a single session.
pub struct DocumentIndex {
    chunks: Vec<String>,
    embeddings: Vec<Vec<f32>>,
}

impl DocumentIndex {
    /// Embed every chunk.
    #[instrument(skip(embedder, chunks), fields(count = chunks.len()))]
    pub async fn build(embedder: &dyn Embedder, chunks: Vec<String>) -> Result<Self> {
        if chunks.is_empty() {
            return Err(KioskError::EmptyResult("Document has no text to index".to_string()));
        }

        let embeddings = embedder.embed_batch(&chunks).await?;
        if embeddings.len() != chunks.len() {
            return Err(KioskError::Upstream(format!(
                "Expected {} embeddings, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }

        info!("Indexed {} chunks with {}", chunks.len(), embedder.model());
        Ok(Self { chunks, embeddings })
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// The `limit` chunks most similar to `query`, best first.
    pub async fn search(&self, embedder: &dyn Embedder, query: &str, limit: usize) -> Result<Vec<ScoredChunk>> {
        let query_embedding = embedder.embed(query).await?;
        Ok(self.nearest(&query_embedding, limit))
    }

    fn nearest(&self, query_embedding: &[f32], limit: usize) -> Vec<ScoredChunk> {
        let mut results: Vec<ScoredChunk> = self
            .chunks
            .iter()
            .zip(&self.embeddings)
            .map(|(text, embedding)| ScoredChunk {
                text: text.clone(),
                score: cosine_similarity(query_embedding, embedding),
            })
            .collect();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(limit);

        debug!("Found {} matching chunks", results.len());
        results
    }
}

/// Calculate cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
