//! Map-reduce summaries of YouTube transcripts.

use crate::config::{vars, Prompts};
use crate::error::{KioskError, Result};
use crate::llm::{ChatModel, CompletionRequest};
use crate::youtube::{extract_video_id, TranscriptSource};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

const PART_TEMPERATURE: f32 = 0.5;
const COMBINE_TEMPERATURE: f32 = 0.4;

/// Characters of transcript shown alongside the summary.
pub const TRANSCRIPT_PREVIEW_CHARS: usize = 5000;

pub const TRANSCRIPT_UNAVAILABLE: &str = "Transcript not found or unavailable for this video.";

#[derive(Debug, Clone, Serialize)]
pub struct VideoSummary {
    pub video_id: String,
    pub transcript: String,
    pub summary: String,
    /// Number of transcript parts summarized separately.
    pub parts: usize,
}

/// Summarizes a transcript part by part, then combines the partial summaries.
pub struct VideoSummarizer {
    model: Arc<dyn ChatModel>,
    transcripts: Arc<dyn TranscriptSource>,
    prompts: Prompts,
    chunk_chars: usize,
}

impl VideoSummarizer {
    pub fn new(
        model: Arc<dyn ChatModel>,
        transcripts: Arc<dyn TranscriptSource>,
        prompts: Prompts,
        chunk_chars: usize,
    ) -> Self {
        Self {
            model,
            transcripts,
            prompts,
            chunk_chars: chunk_chars.max(1),
        }
    }

    /// Fetch the English transcript of `url` and summarize it.
    #[instrument(skip(self))]
    pub async fn summarize_url(&self, url: &str) -> Result<VideoSummary> {
        let video_id = extract_video_id(url).ok_or_else(|| {
            KioskError::InvalidInput("Invalid YouTube URL. Please enter a proper link.".to_string())
        })?;

        let transcript = match self.transcripts.fetch(&video_id).await {
            Ok(transcript) => transcript.text(" "),
            Err(KioskError::Transcript(reason) | KioskError::Parse(reason)) => {
                warn!("No transcript for {}: {}", video_id, reason);
                String::new()
            }
            Err(e) => return Err(e),
        };
        if transcript.trim().is_empty() {
            return Err(KioskError::EmptyResult(TRANSCRIPT_UNAVAILABLE.to_string()));
        }

        let (summary, parts) = self.summarize_text(&transcript).await?;
        Ok(VideoSummary {
            video_id,
            transcript,
            summary,
            parts,
        })
    }

    /// Summarize `text`, returning the summary and the number of parts.
    pub async fn summarize_text(&self, text: &str) -> Result<(String, usize)> {
        let parts = split_chars(text, self.chunk_chars);
        info!("Summarizing {} transcript parts", parts.len());

        let mut summaries = Vec::with_capacity(parts.len());
        for (i, part) in parts.iter().enumerate() {
            let number = (i + 1).to_string();
            let prompt = self.prompts.render_with_custom(
                &self.prompts.summary.part,
                &vars([("part", number.as_str()), ("chunk", part.as_str())]),
            );
            let request = CompletionRequest::prompt(prompt).with_temperature(PART_TEMPERATURE);
            summaries.push(self.model.complete(&request).await?);
        }

        let joined = summaries.join("\n\n");
        let prompt = self
            .prompts
            .render_with_custom(&self.prompts.summary.combine, &vars([("summaries", joined.as_str())]));
        let request = CompletionRequest::prompt(prompt).with_temperature(COMBINE_TEMPERATURE);
        let summary = self.model.complete(&request).await?;

        Ok((summary, parts.len()))
    }
}

/// Consecutive pieces of at most `size` characters.
fn split_chars(text: &str, size: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars.chunks(size).map(|c| c.iter().collect()).collect()
}
