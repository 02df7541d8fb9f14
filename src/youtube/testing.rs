//! Fixed transcript source for tests.

use super::{Transcript, TranscriptSegment, TranscriptSource};
use crate::error::{KioskError, Result};
use async_trait::async_trait;
use std::sync::Mutex;

/// Returns fixed captions (or a transcript error) and records requested ids.
pub struct FixedTranscripts {
    captions: Option<Vec<&'static str>>,
    pub requested: Mutex<Vec<String>>,
}

impl FixedTranscripts {
    pub fn with(captions: &[&'static str]) -> Self {
        Self {
            captions: Some(captions.to_vec()),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            captions: None,
            requested: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TranscriptSource for FixedTranscripts {
    async fn fetch(&self, video_id: &str) -> Result<Transcript> {
        self.requested.lock().unwrap().push(video_id.to_string());
        let captions = self.captions.as_ref().ok_or_else(|| {
            KioskError::Transcript("Subtitles are disabled for this video".to_string())
        })?;
        Ok(Transcript {
            video_id: video_id.to_string(),
            language: "en".to_string(),
            segments: captions
                .iter()
                .enumerate()
                .map(|(i, text)| TranscriptSegment {
                    start_seconds: i as f64,
                    duration_seconds: 1.0,
                    text: text.to_string(),
                })
                .collect(),
        })
    }
}
