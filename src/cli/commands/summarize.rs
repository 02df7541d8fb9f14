//! YouTube summary command.

use super::ensure_ready;
use crate::apps::preview;
use crate::apps::summarize::{VideoSummarizer, TRANSCRIPT_PREVIEW_CHARS};
use crate::cli::preflight::Operation;
use crate::cli::Output;
use crate::config::{Credentials, Prompts, Provider, Settings};
use crate::llm::build_chat_model;
use crate::youtube::YtDlpTranscripts;
use anyhow::Result;
use console::style;
use std::sync::Arc;

/// Run the summarize command.
pub async fn run_summarize(
    url: &str,
    provider: Option<Provider>,
    settings: &Settings,
    credentials: &Credentials,
) -> Result<()> {
    let provider = provider.unwrap_or(settings.apps.summary_provider);
    ensure_ready(
        Operation::Video {
            provider,
            ytdlp: &settings.youtube.ytdlp_path,
        },
        credentials,
    )?;

    let transcripts = YtDlpTranscripts::new(
        &settings.youtube.ytdlp_path,
        &settings.youtube.language,
        settings.request_timeout(),
    )?;
    let model = build_chat_model(provider, None, settings, credentials)?;
    let summarizer = VideoSummarizer::new(
        model,
        Arc::new(transcripts),
        Prompts::from_settings(settings)?,
        settings.youtube.summary_chunk_chars,
    );

    let spinner = Output::spinner("Fetching transcript and summarizing...");
    let result = summarizer.summarize_url(url).await;
    spinner.finish_and_clear();

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            Output::error(&e.to_string());
            return Err(e.into());
        }
    };

    Output::header("Transcript Preview");
    println!(
        "\n{}\n",
        style(preview(&summary.transcript, TRANSCRIPT_PREVIEW_CHARS)).dim()
    );

    Output::header("Summary");
    if summary.parts > 1 {
        Output::info(&format!("Combined from {} transcript parts.", summary.parts));
    }
    println!("\n{}\n", summary.summary);
    Ok(())
}
