//! News and blog crew commands.

use super::ensure_ready;
use crate::agent::{blog_crew, news_crew, require_input, CrewRun, TOPIC_REQUIRED, URL_REQUIRED};
use crate::cli::preflight::Operation;
use crate::cli::Output;
use crate::config::{Credentials, Prompts, Provider, Settings};
use crate::llm::build_chat_model;
use crate::tools::{NewsSearchTool, TranscriptTool};
use crate::youtube::YtDlpTranscripts;
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

const NEWS_PREVIEW_CHARS: usize = 2000;
const BLOG_PREVIEW_CHARS: usize = 1000;

/// Run the news crew: search NewsAPI for `topic`, then write a report.
pub async fn run_news(
    topic: &str,
    model: Option<String>,
    output: &Path,
    settings: &Settings,
    credentials: &Credentials,
) -> Result<()> {
    let topic = require_input(topic, TOPIC_REQUIRED)?;
    ensure_ready(Operation::News(Provider::OpenAI), credentials)?;

    let model_name = model.unwrap_or_else(|| settings.news.model.clone());
    let writer = build_chat_model(Provider::OpenAI, Some(&model_name), settings, credentials)?;
    let search = NewsSearchTool::new(
        &settings.news,
        credentials.news.clone(),
        settings.request_timeout(),
    )?;
    let crew = news_crew(Arc::new(search), writer, &Prompts::from_settings(settings)?);

    Output::header(&format!("News crew: {}", topic));
    let spinner = Output::spinner("Researching and writing...");
    let run = crew.run(topic).await?;
    spinner.finish_and_clear();

    report(&run, "Research", "Report", NEWS_PREVIEW_CHARS, output)
}

/// Run the blog crew: fetch the video's transcript, then write a blog post.
pub async fn run_blog(
    url: &str,
    model: Option<String>,
    output: &Path,
    settings: &Settings,
    credentials: &Credentials,
) -> Result<()> {
    let url = require_input(url, URL_REQUIRED)?;
    ensure_ready(
        Operation::Video {
            provider: Provider::OpenAI,
            ytdlp: &settings.youtube.ytdlp_path,
        },
        credentials,
    )?;

    let model_name = model.unwrap_or_else(|| settings.youtube.blog_model.clone());
    let writer = build_chat_model(Provider::OpenAI, Some(&model_name), settings, credentials)?;
    let transcripts = YtDlpTranscripts::new(
        &settings.youtube.ytdlp_path,
        &settings.youtube.language,
        settings.request_timeout(),
    )?;
    let tool = TranscriptTool::new(Arc::new(transcripts));
    let crew = blog_crew(Arc::new(tool), writer, &Prompts::from_settings(settings)?);

    Output::header("Blog crew");
    let spinner = Output::spinner("Fetching transcript and writing...");
    let run = crew.run(url).await?;
    spinner.finish_and_clear();

    report(&run, "Transcript", "Blog post", BLOG_PREVIEW_CHARS, output)
}

/// Print both stages and save the writer's output when it succeeded.
fn report(run: &CrewRun, research_stage: &str, output_stage: &str, max_chars: usize, path: &Path) -> Result<()> {
    Output::tool_result(research_stage, &run.research, max_chars);

    let Some(output) = &run.output else {
        anyhow::bail!("{} failed; nothing was written", research_stage);
    };
    Output::tool_result(output_stage, output, max_chars);

    match output.output() {
        Some(text) => {
            std::fs::write(path, text)?;
            Output::success(&format!("Saved to {}", path.display()));
            Ok(())
        }
        None => anyhow::bail!("{} failed; nothing was written", output_stage),
    }
}
