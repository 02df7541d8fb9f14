//! Conversational question answering over one document.

use crate::config::{vars, DocumentSettings, Prompts};
use crate::document::{DocumentIndex, ScoredChunk, TextSplitter};
use crate::embedding::Embedder;
use crate::error::{KioskError, Result};
use crate::history::ChatHistory;
use crate::llm::{ChatModel, CompletionRequest};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Characters of each retrieved chunk shown to the user.
pub const SOURCE_PREVIEW_CHARS: usize = 500;

/// An answer and the chunks it was based on.
#[derive(Debug, Clone)]
pub struct DocumentAnswer {
    pub answer: String,
    /// The question actually used for retrieval, after condensing.
    pub standalone_question: String,
    pub sources: Vec<ScoredChunk>,
}

/// A document session: indexed chunks plus the questions asked so far.
pub struct DocumentQa {
    model: Arc<dyn ChatModel>,
    embedder: Arc<dyn Embedder>,
    index: DocumentIndex,
    prompts: Prompts,
    top_k: usize,
    history: ChatHistory,
}

impl DocumentQa {
    /// Split and embed the document text.
    #[instrument(skip_all)]
    pub async fn from_text(
        text: &str,
        model: Arc<dyn ChatModel>,
        embedder: Arc<dyn Embedder>,
        settings: &DocumentSettings,
        prompts: Prompts,
    ) -> Result<Self> {
        let chunks = TextSplitter::new(settings.chunk_size, settings.chunk_overlap).split(text);
        info!("Split document into {} chunks", chunks.len());

        let index = DocumentIndex::build(embedder.as_ref(), chunks).await?;

        Ok(Self {
            model,
            embedder,
            index,
            prompts,
            top_k: settings.top_k,
            history: ChatHistory::new(),
        })
    }

    pub fn chunk_count(&self) -> usize {
        self.index.len()
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Answer `question` in the context of the previous turns.
    #[instrument(skip(self), fields(turn = self.history.len() + 1))]
    pub async fn ask(&mut self, question: &str) -> Result<DocumentAnswer> {
        let question = question.trim();
        if question.is_empty() {
            return Err(KioskError::InvalidInput("Question is empty".to_string()));
        }

        let standalone_question = self.condense(question).await?;
        let sources = self
            .index
            .search(self.embedder.as_ref(), &standalone_question, self.top_k)
            .await?;

        let context = sources
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let prompt = self.prompts.render_with_custom(
            &self.prompts.document.answer,
            &vars([("context", context.as_str()), ("question", standalone_question.as_str())]),
        );
        let request = CompletionRequest::prompt(prompt).with_system(self.prompts.document.system.clone());
        let answer = self.model.complete(&request).await?.trim().to_string();

        self.history.push(question, answer.clone());
        debug!("Answered with {} sources", sources.len());

        Ok(DocumentAnswer {
            answer,
            standalone_question,
            sources,
        })
    }

    /// Rewrite a follow-up into a standalone question. The first question is used as-is.
    async fn condense(&self, question: &str) -> Result<String> {
        if self.history.is_empty() {
            return Ok(question.to_string());
        }

        let transcript = self.history.to_transcript();
        let prompt = self.prompts.render_with_custom(
            &self.prompts.document.condense,
            &vars([("chat_history", transcript.as_str()), ("question", question)]),
        );
        let condensed = self.model.complete(&CompletionRequest::prompt(prompt)).await?;
        let condensed = condensed.trim();

        debug!("Condensed follow-up to: {}", condensed);
        Ok(if condensed.is_empty() {
            question.to_string()
        } else {
            condensed.to_string()
        })
    }
}
