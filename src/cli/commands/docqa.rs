//! Document Q&A command implementation.

use super::ensure_ready;
use crate::apps::docqa::{DocumentAnswer, DocumentQa, SOURCE_PREVIEW_CHARS};
use crate::apps::preview;
use crate::cli::preflight::Operation;
use crate::cli::Output;
use crate::config::{Credentials, Prompts, Provider, Settings};
use crate::document::load_text;
use crate::embedding::build_embedder;
use crate::llm::build_chat_model;
use anyhow::Result;
use console::style;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Run the document Q&A command.
pub async fn run_docqa(
    file: &Path,
    questions: Vec<String>,
    provider: Option<Provider>,
    settings: &Settings,
    credentials: &Credentials,
) -> Result<()> {
    let provider = provider.unwrap_or(settings.document.provider);
    let embedding_provider = settings.document.embedding_provider;
    ensure_ready(
        Operation::DocumentQa {
            chat: provider,
            embeddings: embedding_provider,
        },
        credentials,
    )?;

    let spinner = Output::spinner("Loading and processing your document...");
    let session = open_session(file, provider, embedding_provider, settings, credentials).await;
    spinner.finish_and_clear();

    let mut qa = session?;
    Output::success(&format!(
        "Document processed into {} chunks! You can now ask questions.",
        qa.chunk_count()
    ));

    if !questions.is_empty() {
        for question in &questions {
            println!("\n{} {}", style("Q:").green().bold(), question);
            ask_and_print(&mut qa, question).await?;
        }
        return Ok(());
    }

    println!(
        "{}\n",
        style("Type your questions, or 'exit' to quit. Use 'clear' to reset the conversation.").dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("Question:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            Output::info("Goodbye!");
            break;
        }

        if input.eq_ignore_ascii_case("clear") {
            qa.clear_history();
            Output::info("Conversation history cleared.");
            continue;
        }

        if let Err(e) = ask_and_print(&mut qa, input).await {
            Output::error(&format!("Error: {}", e));
        }
    }

    Ok(())
}

async fn open_session(
    file: &Path,
    provider: Provider,
    embedding_provider: Provider,
    settings: &Settings,
    credentials: &Credentials,
) -> crate::Result<DocumentQa> {
    let text = load_text(file)?;
    let model = build_chat_model(provider, None, settings, credentials)?;
    let embedder = build_embedder(embedding_provider, settings, credentials)?;
    DocumentQa::from_text(
        &text,
        model,
        embedder,
        &settings.document,
        Prompts::from_settings(settings)?,
    )
    .await
}

async fn ask_and_print(qa: &mut DocumentQa, question: &str) -> Result<()> {
    let spinner = Output::spinner("Thinking...");
    let result = qa.ask(question).await;
    spinner.finish_and_clear();

    let answer = result?;
    print_answer(&answer);
    Ok(())
}

fn print_answer(answer: &DocumentAnswer) {
    Output::header("Answer");
    println!("\n{}\n", answer.answer);

    if !answer.sources.is_empty() {
        println!("{}", style("Retrieved context").bold());
        for source in &answer.sources {
            println!(
                "\n{} (score: {:.2})\n   {}",
                style(">>").green(),
                source.score,
                preview(&source.text, SOURCE_PREVIEW_CHARS)
            );
        }
        println!();
    }
}
