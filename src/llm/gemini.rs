//! Google Gemini REST client (`generateContent` and `batchEmbedContents`).

use super::{ChatModel, CompletionRequest, Role};
use crate::config::credentials::GOOGLE_API_KEY;
use crate::config::Provider;
use crate::error::{KioskError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument, warn};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Shared HTTP access to the Gemini API.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(base_url: Option<&str>, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            api_key,
        })
    }

    /// POST a JSON body to `{base_url}/{path}` and decode the JSON response.
    async fn post<B: Serialize, R: for<'de> Deserialize<'de>>(&self, path: &str, body: &B) -> Result<R> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(KioskError::MissingCredential(GOOGLE_API_KEY))?;

        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            warn!("Gemini API returned {}: {}", status, message);
            return Err(KioskError::Upstream(format!(
                "Gemini API error (status {}): {}",
                status.as_u16(),
                message
            )));
        }

        Ok(response.json().await?)
    }

    /// Embed a batch of texts with the given embedding model (e.g. `models/embedding-001`).
    pub async fn embed_batch(&self, model: &str, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let model = qualified_model(model);
        let body = BatchEmbedRequest {
            requests: texts
                .iter()
                .map(|text| EmbedRequest {
                    model: model.clone(),
                    content: Content {
                        role: None,
                        parts: vec![Part::text(text)],
                    },
                })
                .collect(),
        };

        let response: BatchEmbedResponse = self
            .post(&format!("{}:batchEmbedContents", model), &body)
            .await?;

        Ok(response.embeddings.into_iter().map(|e| e.values).collect())
    }
}

fn qualified_model(model: &str) -> String {
    if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{}", model)
    }
}

/// Gemini chat model.
pub struct GeminiChat {
    client: GeminiClient,
    model: String,
}

impl GeminiChat {
    pub fn new(client: GeminiClient, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }

    fn build_request(request: &CompletionRequest) -> GenerateRequest {
        let contents = request
            .messages
            .iter()
            .map(|message| {
                let mut parts = vec![Part::text(&message.content)];
                parts.extend(message.images.iter().map(|image| Part {
                    text: None,
                    inline_data: Some(InlineData {
                        mime_type: image.mime_type.clone(),
                        data: image.base64(),
                    }),
                }));
                Content {
                    role: Some(match message.role {
                        Role::User => "user".to_string(),
                        Role::Assistant => "model".to_string(),
                    }),
                    parts,
                }
            })
            .collect();

        GenerateRequest {
            system_instruction: request.system.as_ref().map(|s| Content {
                role: None,
                parts: vec![Part::text(s)],
            }),
            contents,
            generation_config: request.temperature.map(|t| GenerationConfig { temperature: t }),
        }
    }
}

#[async_trait]
impl ChatModel for GeminiChat {
    fn provider(&self) -> Provider {
        Provider::Gemini
    }

    fn model(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let body = Self::build_request(request);
        let path = format!("{}:generateContent", qualified_model(&self.model));
        let response: GenerateResponse = self.client.post(&path, &body).await?;

        if let Some(reason) = response
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return Err(KioskError::Upstream(format!("Prompt blocked: {}", reason)));
        }

        let text: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(KioskError::EmptyResult("Empty response from model".to_string()));
        }

        debug!("Gemini returned {} characters", text.len());
        Ok(text)
    }
}

// === Wire types ===

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            inline_data: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Serialize)]
struct BatchEmbedRequest {
    requests: Vec<EmbedRequest>,
}

#[derive(Debug, Serialize)]
struct EmbedRequest {
    model: String,
    content: Content,
}

#[derive(Debug, Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<EmbeddingValues>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}
