//! Resume command implementation.

use super::ensure_ready;
use crate::apps::resume::{ResumeAction, ResumeAnalyzer};
use crate::cli::preflight::Operation;
use crate::cli::Output;
use crate::config::{Credentials, Prompts, Provider, Settings};
use crate::document::load_text;
use crate::llm::build_chat_model;
use anyhow::Result;
use std::path::Path;

/// Run the resume command.
pub async fn run_resume(
    file: &Path,
    action: ResumeAction,
    job: Option<String>,
    job_file: Option<&Path>,
    provider: Option<Provider>,
    settings: &Settings,
    credentials: &Credentials,
) -> Result<()> {
    let provider = provider.unwrap_or(settings.resume.provider);
    ensure_ready(Operation::Generate(provider), credentials)?;

    let resume_text = load_text(file)?;
    Output::success("Resume uploaded and processed successfully!");

    let job_description = match job_file {
        Some(path) => Some(std::fs::read_to_string(path)?),
        None => job,
    };

    let model = build_chat_model(provider, None, settings, credentials)?;
    let analyzer = ResumeAnalyzer::new(model, Prompts::from_settings(settings)?, settings.resume.max_chars);

    let spinner = Output::spinner("Analyzing resume...");
    let result = analyzer
        .analyze(&resume_text, job_description.as_deref(), action)
        .await;
    spinner.finish_and_clear();

    match result {
        Ok(answer) => {
            Output::header(action.title());
            println!("\n{}\n", answer);
            Ok(())
        }
        Err(e) => {
            Output::error(&e.to_string());
            Err(e.into())
        }
    }
}
