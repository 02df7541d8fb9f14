//! Interactive chat command.

use super::ensure_ready;
use crate::apps::chat::ChatSession;
use crate::cli::preflight::Operation;
use crate::cli::Output;
use crate::config::{Credentials, Provider, Settings};
use crate::llm::build_chat_model;
use anyhow::Result;
use console::style;
use std::io::{self, BufRead, Write};

/// Run the interactive chat command.
pub async fn run_chat(
    provider: Option<Provider>,
    model: Option<String>,
    settings: &Settings,
    credentials: &Credentials,
) -> Result<()> {
    let provider = provider.unwrap_or(settings.apps.chat_provider);
    ensure_ready(Operation::Generate(provider), credentials)?;

    let model = build_chat_model(provider, model.as_deref(), settings, credentials)?;
    println!(
        "\n{} {}",
        style("Kiosk Chat").bold().cyan(),
        style(format!("({} / {})", model.provider(), model.model())).dim()
    );
    println!(
        "{}\n",
        style("Type your questions, or 'exit' to quit. Use 'clear' to reset conversation.").dim()
    );

    let mut session = ChatSession::new(model);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
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
            session.clear();
            Output::info("Conversation cleared.");
            continue;
        }

        let spinner = Output::spinner("Thinking...");
        let result = session.send(input).await;
        spinner.finish_and_clear();

        match result {
            Ok(answer) => println!("\n{} {}\n", style("Bot:").cyan().bold(), answer),
            Err(e) => Output::error(&format!("Error: {}", e)),
        }
    }

    Ok(())
}
