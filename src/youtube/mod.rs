//! YouTube video ids and caption transcripts.

#[cfg(test)]
pub mod testing;
mod ytdlp;

pub use ytdlp::YtDlpTranscripts;

use crate::error::Result;
use async_trait::async_trait;
use regex::Regex;
use std::sync::OnceLock;

fn video_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Matches the common YouTube URL formats and bare video IDs
        Regex::new(
            r"(?x)
            ^
            (?:
                (?:https?://)?
                (?:www\.|m\.)?
                (?:youtube\.com/watch\?(?:.*&)?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/v/|youtube\.com/shorts/)
                ([a-zA-Z0-9_-]{11})
                (?:[?&\#/].*)?
            |
                ([a-zA-Z0-9_-]{11})
            )
            $
        ",
        )
        .expect("video id regex is valid")
    })
}

/// Extract the 11-character video id from a YouTube URL or bare id.
pub fn extract_video_id(input: &str) -> Option<String> {
    let caps = video_id_regex().captures(input.trim())?;

    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

/// Canonical watch URL for a video id.
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// One timed caption.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptSegment {
    pub start_seconds: f64,
    pub duration_seconds: f64,
    pub text: String,
}

/// Captions for one video, in playback order.
#[derive(Debug, Clone)]
pub struct Transcript {
    pub video_id: String,
    pub language: String,
    pub segments: Vec<TranscriptSegment>,
}

impl Transcript {
    /// Caption texts joined with `separator`, without timing.
    pub fn text(&self, separator: &str) -> String {
        self.segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(separator)
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Source of caption transcripts.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Fetch the transcript of `video_id` in the source's configured language.
    async fn fetch(&self, video_id: &str) -> Result<Transcript>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_video_id() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("https://youtube.com/embed/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("youtube.com/watch?feature=share&v=dQw4w9WgXcQ&t=42s"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ?si=abc"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("  dQw4w9WgXcQ "),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_malformed_inputs_yield_none() {
        assert_eq!(extract_video_id("not-a-video-id"), None);
        assert_eq!(extract_video_id(""), None);
        assert_eq!(extract_video_id("https://youtu.be/short"), None);
        assert_eq!(extract_video_id("https://example.com/watch?v=dQw4w9WgXcQ"), None);
        assert_eq!(extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQXYZ"), None);
    }

    #[test]
    fn test_transcript_text_joins_without_timing() {
        let transcript = Transcript {
            video_id: "dQw4w9WgXcQ".to_string(),
            language: "en".to_string(),
            segments: vec![
                TranscriptSegment {
                    start_seconds: 0.0,
                    duration_seconds: 1.5,
                    text: "never gonna".to_string(),
                },
                TranscriptSegment {
                    start_seconds: 1.5,
                    duration_seconds: 1.0,
                    text: "give you up".to_string(),
                },
            ],
        };
        assert_eq!(transcript.text("\n"), "never gonna\ngive you up");
        assert_eq!(transcript.text(" "), "never gonna give you up");
    }
}
