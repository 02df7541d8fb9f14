//! SQL setup and query commands.

use super::ensure_ready;
use crate::apps::sql::{setup_database, QueryResult, SqlAssistant};
use crate::cli::preflight::Operation;
use crate::cli::Output;
use crate::config::{Credentials, Prompts, Provider, Settings};
use crate::llm::build_chat_model;
use anyhow::Result;
use console::style;
use std::path::PathBuf;

/// Run the sql-setup command.
pub fn run_sql_setup(db: Option<PathBuf>, settings: &Settings) -> Result<()> {
    let path = db.unwrap_or_else(|| settings.sql_db_path());
    let inserted = setup_database(&path)?;

    if inserted > 0 {
        Output::success(&format!(
            "Database created at {} with {} sample employees.",
            path.display(),
            inserted
        ));
    } else {
        Output::info(&format!(
            "Database at {} already has employees; nothing inserted.",
            path.display()
        ));
    }
    Ok(())
}

/// Run the sql command.
pub async fn run_sql(
    question: &str,
    db: Option<PathBuf>,
    provider: Option<Provider>,
    settings: &Settings,
    credentials: &Credentials,
) -> Result<()> {
    let provider = provider.unwrap_or(settings.sql.provider);
    let path = db.unwrap_or_else(|| settings.sql_db_path());
    ensure_ready(Operation::Sql { provider, db: &path }, credentials)?;

    let model = build_chat_model(provider, None, settings, credentials)?;
    let assistant = SqlAssistant::new(model, Prompts::from_settings(settings)?, path);

    let spinner = Output::spinner("Generating SQL...");
    let result = assistant.ask(question).await;
    spinner.finish_and_clear();

    let answer = result?;
    Output::header("Generated SQL");
    println!("\n{}\n", style(&answer.sql).yellow());

    print_result(&answer.result);
    Ok(())
}

fn print_result(result: &QueryResult) {
    Output::header("Result");
    println!();
    if result.has_result_set() {
        if result.rows.is_empty() {
            Output::info("No rows returned.");
        } else {
            Output::table(&result.columns, &result.rows);
        }
    } else {
        match result.affected {
            Some(n) => Output::info(&format!("Statement executed; {} row(s) affected.", n)),
            None => Output::info("Statement executed; no result set."),
        }
    }
    println!();
}
