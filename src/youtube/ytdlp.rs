//! Caption transcripts discovered via yt-dlp and downloaded as `json3`.

use super::{watch_url, Transcript, TranscriptSegment, TranscriptSource};
use crate::error::{KioskError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

/// Fetches captions by asking yt-dlp for the available caption tracks and
/// downloading the chosen track directly.
pub struct YtDlpTranscripts {
    http: reqwest::Client,
    ytdlp_path: String,
    language: String,
}

impl YtDlpTranscripts {
    pub fn new(ytdlp_path: &str, language: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            ytdlp_path: ytdlp_path.to_string(),
            language: language.to_string(),
        })
    }

    /// Run yt-dlp and return its metadata JSON for the video.
    async fn dump_metadata(&self, video_id: &str) -> Result<serde_json::Value> {
        let url = watch_url(video_id);

        let output = tokio::process::Command::new(&self.ytdlp_path)
            .args(["--dump-json", "--skip-download", "--no-warnings", &url])
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    KioskError::ToolNotFound(self.ytdlp_path.clone())
                } else {
                    KioskError::Transcript(format!("Failed to run yt-dlp: {}", e))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(KioskError::Transcript(format!(
                "Video {} not found or unavailable: {}",
                video_id,
                stderr.trim()
            )));
        }

        let json_str = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(&json_str)
            .map_err(|e| KioskError::Parse(format!("yt-dlp output: {}", e)))
    }

    /// Download a `json3` caption track.
    async fn download_track(&self, track_url: &str) -> Result<Vec<TranscriptSegment>> {
        let mut url = Url::parse(track_url)
            .map_err(|e| KioskError::Transcript(format!("Bad caption URL: {}", e)))?;
        force_json3(&mut url);

        let body = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_json3(&body)
    }
}

#[async_trait]
impl TranscriptSource for YtDlpTranscripts {
    #[instrument(skip(self))]
    async fn fetch(&self, video_id: &str) -> Result<Transcript> {
        let metadata = self.dump_metadata(video_id).await?;

        let track_url = select_caption_url(&metadata, &self.language).ok_or_else(|| {
            KioskError::Transcript(format!(
                "No '{}' captions available for video {}",
                self.language, video_id
            ))
        })?;
        debug!("Using caption track {}", track_url);

        let segments = self.download_track(&track_url).await?;
        info!("Fetched {} caption segments for {}", segments.len(), video_id);

        Ok(Transcript {
            video_id: video_id.to_string(),
            language: self.language.clone(),
            segments,
        })
    }
}

/// Choose a caption track URL, preferring uploaded subtitles over automatic
/// captions and an exact language match over a regional variant (`en` vs `en-US`).
fn select_caption_url(metadata: &serde_json::Value, language: &str) -> Option<String> {
    for key in ["subtitles", "automatic_captions"] {
        let Some(tracks) = metadata[key].as_object() else {
            continue;
        };

        let regional_prefix = format!("{}-", language);
        let formats = tracks.get(language).or_else(|| {
            tracks
                .iter()
                .find(|(lang, _)| lang.starts_with(&regional_prefix))
                .map(|(_, v)| v)
        });

        let Some(formats) = formats.and_then(|f| f.as_array()) else {
            continue;
        };

        let url = formats
            .iter()
            .find(|f| f["ext"] == "json3")
            .or_else(|| formats.first())
            .and_then(|f| f["url"].as_str());

        if let Some(url) = url {
            return Some(url.to_string());
        }
    }
    None
}

fn force_json3(url: &mut Url) {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "fmt")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(pairs)
        .append_pair("fmt", "json3");
}

#[derive(Debug, Deserialize)]
struct Json3 {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Json3Event {
    #[serde(default)]
    t_start_ms: u64,
    #[serde(default)]
    d_duration_ms: u64,
    segs: Option<Vec<Json3Seg>>,
}

#[derive(Debug, Deserialize)]
struct Json3Seg {
    #[serde(default)]
    utf8: String,
}

/// Parse YouTube's `json3` caption format into segments, dropping blank events.
fn parse_json3(body: &str) -> Result<Vec<TranscriptSegment>> {
    let parsed: Json3 = serde_json::from_str(body)
        .map_err(|e| KioskError::Parse(format!("caption data: {}", e)))?;

    Ok(parsed
        .events
        .into_iter()
        .filter_map(|event| {
            let text: String = event.segs?.into_iter().map(|s| s.utf8).collect();
            let text = text.replace('\n', " ").trim().to_string();
            if text.is_empty() {
                return None;
            }
            Some(TranscriptSegment {
                start_seconds: event.t_start_ms as f64 / 1000.0,
                duration_seconds: event.d_duration_ms as f64 / 1000.0,
                text,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[test]
    fn test_select_prefers_uploaded_subtitles() {
        let metadata = json!({
            "subtitles": {"en": [{"ext": "vtt", "url": "https://x/vtt"}, {"ext": "json3", "url": "https://x/manual"}]},
            "automatic_captions": {"en": [{"ext": "json3", "url": "https://x/auto"}]}
        });
        assert_eq!(select_caption_url(&metadata, "en").as_deref(), Some("https://x/manual"));
    }

    #[test]
    fn test_select_falls_back_to_regional_auto_captions() {
        let metadata = json!({
            "subtitles": {},
            "automatic_captions": {
                "de": [{"ext": "json3", "url": "https://x/de"}],
                "en-US": [{"ext": "json3", "url": "https://x/en-us"}]
            }
        });
        assert_eq!(select_caption_url(&metadata, "en").as_deref(), Some("https://x/en-us"));
        assert_eq!(select_caption_url(&metadata, "fr"), None);
    }

    #[test]
    fn test_force_json3_replaces_format() {
        let mut url = Url::parse("https://www.youtube.com/api/timedtext?v=abc&fmt=vtt&lang=en").unwrap();
        force_json3(&mut url);
        let pairs: Vec<_> = url.query_pairs().map(|(k, v)| format!("{}={}", k, v)).collect();
        assert_eq!(pairs, vec!["v=abc", "lang=en", "fmt=json3"]);
    }

    #[test]
    fn test_parse_json3_drops_blank_events() {
        let body = json!({
            "events": [
                {"tStartMs": 0, "dDurationMs": 2000, "segs": [{"utf8": "Hello "}, {"utf8": "there"}]},
                {"tStartMs": 2000, "dDurationMs": 10, "segs": [{"utf8": "\n"}]},
                {"tStartMs": 2500, "dDurationMs": 0},
                {"tStartMs": 3000, "dDurationMs": 1500, "segs": [{"utf8": "general\nKenobi"}]}
            ]
        })
        .to_string();

        let segments = parse_json3(&body).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "Hello there");
        assert_eq!(segments[1].text, "general Kenobi");
        assert!((segments[1].start_seconds - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_malformed_json3_is_parse_error() {
        let err = parse_json3("<html>not captions</html>").unwrap_err();
        assert!(matches!(err, KioskError::Parse(_)));
        assert!(err.to_string().starts_with("Parse error: caption data:"));
    }

    #[tokio::test]
    async fn test_download_track_requests_json3() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/timedtext")
                    .query_param("v", "dQw4w9WgXcQ")
                    .query_param("fmt", "json3");
                then.status(200).json_body(json!({
                    "events": [{"tStartMs": 0, "dDurationMs": 1000, "segs": [{"utf8": "la la"}]}]
                }));
            })
            .await;

        let source = YtDlpTranscripts::new("yt-dlp", "en", Duration::from_secs(5)).unwrap();
        let segments = source
            .download_track(&server.url("/api/timedtext?v=dQw4w9WgXcQ&fmt=srv3"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(segments[0].text, "la la");
    }

    #[tokio::test]
    async fn test_missing_ytdlp_binary_is_reported() {
        let source =
            YtDlpTranscripts::new("definitely-not-yt-dlp-binary", "en", Duration::from_secs(5)).unwrap();
        let err = source.fetch("dQw4w9WgXcQ").await.unwrap_err();
        assert!(matches!(err, KioskError::ToolNotFound(_)));
    }
}
