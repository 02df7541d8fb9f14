//! YouTube transcript tool.

use super::{Tool, ToolResult};
use crate::youtube::{extract_video_id, TranscriptSource};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Fetches the caption transcript of a YouTube video, one caption per line.
pub struct TranscriptTool {
    source: Arc<dyn TranscriptSource>,
}

impl TranscriptTool {
    pub fn new(source: Arc<dyn TranscriptSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Tool for TranscriptTool {
    fn name(&self) -> &str {
        "youtube_transcript"
    }

    async fn run(&self, video_url: &str) -> ToolResult {
        let Some(video_id) = extract_video_id(video_url) else {
            return ToolResult::failure("Invalid YouTube URL or ID");
        };

        match self.source.fetch(&video_id).await {
            Ok(transcript) if transcript.is_empty() => ToolResult::failure("No transcript found."),
            Ok(transcript) => {
                info!("Transcript for {} has {} segments", video_id, transcript.segments.len());
                ToolResult::success(transcript.text("\n"))
            }
            Err(e) => ToolResult::failure(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::youtube::testing::FixedTranscripts;

    #[tokio::test]
    async fn test_both_url_forms_fetch_same_id() {
        let source = Arc::new(FixedTranscripts::with(&["hello", "world"]));
        let tool = TranscriptTool::new(source.clone());

        let a = tool.run("https://youtu.be/dQw4w9WgXcQ").await;
        let b = tool.run("https://www.youtube.com/watch?v=dQw4w9WgXcQ").await;

        assert_eq!(a.output(), Some("hello\nworld"));
        assert_eq!(a, b);
        assert_eq!(*source.requested.lock().unwrap(), vec!["dQw4w9WgXcQ", "dQw4w9WgXcQ"]);
    }

    #[tokio::test]
    async fn test_malformed_url_fails_without_fetching() {
        let source = Arc::new(FixedTranscripts::with(&["unused"]));
        let tool = TranscriptTool::new(source.clone());

        let result = tool.run("https://youtu.be/nope").await;
        assert_eq!(result.error(), Some("Invalid YouTube URL or ID"));
        assert!(source.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_error_is_contained() {
        let tool = TranscriptTool::new(Arc::new(FixedTranscripts::unavailable()));
        let result = tool.run("dQw4w9WgXcQ").await;
        assert_eq!(
            result.error(),
            Some("Transcript error: Subtitles are disabled for this video")
        );
    }

    #[tokio::test]
    async fn test_empty_transcript_is_failure() {
        let tool = TranscriptTool::new(Arc::new(FixedTranscripts::with(&[])));
        let result = tool.run("dQw4w9WgXcQ").await;
        assert_eq!(result.error(), Some("No transcript found."));
    }
}
