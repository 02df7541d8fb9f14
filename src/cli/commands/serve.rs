//! HTTP API server exposing the apps as JSON endpoints.

use crate::agent::{blog_crew, news_crew, require_input, CrewRun, TOPIC_REQUIRED, URL_REQUIRED};
use crate::apps::resume::{ResumeAction, ResumeAnalyzer};
use crate::apps::sql::{SqlAnswer, SqlAssistant};
use crate::apps::summarize::{VideoSummarizer, VideoSummary};
use crate::cli::Output;
use crate::config::{Credentials, Prompts, Provider, Settings};
use crate::error::KioskError;
use crate::llm::build_chat_model;
use crate::tools::{NewsSearchTool, TranscriptTool};
use crate::youtube::YtDlpTranscripts;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

/// Shared application state.
struct AppState {
    settings: Settings,
    credentials: Credentials,
    prompts: Prompts,
}

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings, credentials: Credentials) -> anyhow::Result<()> {
    let prompts = Prompts::from_settings(&settings)?;
    let state = Arc::new(AppState {
        settings,
        credentials,
        prompts,
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/news", post(news))
        .route("/blog", post(blog))
        .route("/summarize", post(summarize))
        .route("/sql", post(sql))
        .route("/resume", post(resume))
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Kiosk API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("News crew", "POST /news");
    Output::kv("Blog crew", "POST /blog");
    Output::kv("Summarize", "POST /summarize");
    Output::kv("SQL", "POST /sql");
    Output::kv("Resume", "POST /resume");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct NewsRequest {
    topic: String,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Deserialize)]
struct BlogRequest {
    url: String,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Deserialize)]
struct SummarizeRequest {
    url: String,
}

#[derive(Deserialize)]
struct SqlRequest {
    question: String,
}

#[derive(Deserialize)]
struct ResumeRequest {
    resume_text: String,
    #[serde(default)]
    job_description: Option<String>,
    #[serde(default = "default_action")]
    action: ResumeAction,
}

fn default_action() -> ResumeAction {
    ResumeAction::Summary
}

#[derive(Serialize)]
struct ResumeResponse {
    action: ResumeAction,
    answer: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// A handler error, rendered as `{"error": ...}`.
struct ApiError(KioskError);

impl From<KioskError> for ApiError {
    fn from(e: KioskError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            KioskError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        warn!("Request failed: {}", self.0);
        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn news(State(state): State<Arc<AppState>>, Json(req): Json<NewsRequest>) -> ApiResult<CrewRun> {
    let topic = require_input(&req.topic, TOPIC_REQUIRED)?;
    let model = req.model.unwrap_or_else(|| state.settings.news.model.clone());
    let writer = build_chat_model(Provider::OpenAI, Some(&model), &state.settings, &state.credentials)?;
    let search = NewsSearchTool::new(
        &state.settings.news,
        state.credentials.news.clone(),
        state.settings.request_timeout(),
    )?;

    let crew = news_crew(Arc::new(search), writer, &state.prompts);
    Ok(Json(crew.run(topic).await?))
}

async fn blog(State(state): State<Arc<AppState>>, Json(req): Json<BlogRequest>) -> ApiResult<CrewRun> {
    let url = require_input(&req.url, URL_REQUIRED)?;
    let model = req
        .model
        .unwrap_or_else(|| state.settings.youtube.blog_model.clone());
    let writer = build_chat_model(Provider::OpenAI, Some(&model), &state.settings, &state.credentials)?;
    let transcripts = transcript_source(&state.settings)?;

    let crew = blog_crew(Arc::new(TranscriptTool::new(transcripts)), writer, &state.prompts);
    Ok(Json(crew.run(url).await?))
}

async fn summarize(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SummarizeRequest>,
) -> ApiResult<VideoSummary> {
    let settings = &state.settings;
    let model = build_chat_model(settings.apps.summary_provider, None, settings, &state.credentials)?;
    let summarizer = VideoSummarizer::new(
        model,
        transcript_source(settings)?,
        state.prompts.clone(),
        settings.youtube.summary_chunk_chars,
    );

    Ok(Json(summarizer.summarize_url(&req.url).await?))
}

async fn sql(State(state): State<Arc<AppState>>, Json(req): Json<SqlRequest>) -> ApiResult<SqlAnswer> {
    let settings = &state.settings;
    let model = build_chat_model(settings.sql.provider, None, settings, &state.credentials)?;
    let assistant = SqlAssistant::new(model, state.prompts.clone(), settings.sql_db_path());

    Ok(Json(assistant.ask(&req.question).await?))
}

async fn resume(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ResumeRequest>,
) -> ApiResult<ResumeResponse> {
    let settings = &state.settings;
    let model = build_chat_model(settings.resume.provider, None, settings, &state.credentials)?;
    let analyzer = ResumeAnalyzer::new(model, state.prompts.clone(), settings.resume.max_chars);

    let answer = analyzer
        .analyze(&req.resume_text, req.job_description.as_deref(), req.action)
        .await?;
    Ok(Json(ResumeResponse {
        action: req.action,
        answer,
    }))
}

fn transcript_source(settings: &Settings) -> crate::Result<Arc<YtDlpTranscripts>> {
    Ok(Arc::new(YtDlpTranscripts::new(
        &settings.youtube.ytdlp_path,
        &settings.youtube.language,
        settings.request_timeout(),
    )?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_is_bad_request() {
        let response = ApiError::from(KioskError::InvalidInput("Question is empty".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_other_errors_are_server_errors() {
        let response = ApiError::from(KioskError::MissingCredential("GOOGLE_API_KEY")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    fn state() -> Arc<AppState> {
        Arc::new(AppState {
            settings: Settings::default(),
            credentials: Credentials::default(),
            prompts: Prompts::default(),
        })
    }

    #[tokio::test]
    async fn test_blank_news_topic_is_bad_request() {
        let req = NewsRequest {
            topic: " ".to_string(),
            model: None,
        };
        let Err(err) = news(State(state()), Json(req)).await else {
            panic!("blank topic was accepted");
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_blank_blog_url_is_bad_request() {
        let req = BlogRequest {
            url: String::new(),
            model: None,
        };
        let Err(err) = blog(State(state()), Json(req)).await else {
            panic!("blank url was accepted");
        };
        assert!(matches!(err.0, KioskError::InvalidInput(ref m) if m == URL_REQUIRED));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_resume_request_defaults_to_summary() {
        let req: ResumeRequest = serde_json::from_str(r#"{"resume_text": "Rust developer"}"#).unwrap();
        assert_eq!(req.action, ResumeAction::Summary);
        assert!(req.job_description.is_none());

        let req: ResumeRequest =
            serde_json::from_str(r#"{"resume_text": "x", "action": "keywords", "job_description": "y"}"#).unwrap();
        assert_eq!(req.action, ResumeAction::Keywords);
    }
}
