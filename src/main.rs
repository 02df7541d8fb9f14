//! Kiosk CLI entry point.

use anyhow::Result;
use clap::Parser;
use kiosk::cli::{commands, Cli, Commands};
use kiosk::config::{Credentials, Settings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("kiosk={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let credentials = Credentials::from_env();
    tracing::debug!("Credentials: {:?}", credentials);

    // Execute command
    match cli.command {
        Commands::Resume {
            file,
            action,
            job,
            job_file,
            provider,
        } => {
            commands::run_resume(&file, action, job, job_file.as_deref(), provider, &settings, &credentials)
                .await?;
        }

        Commands::Docqa {
            file,
            question,
            provider,
        } => {
            commands::run_docqa(&file, question, provider, &settings, &credentials).await?;
        }

        Commands::Describe {
            image,
            prompt,
            provider,
        } => {
            commands::run_describe(&image, &prompt, provider, &settings, &credentials).await?;
        }

        Commands::Nutrition { image, provider } => {
            commands::run_nutrition(&image, provider, &settings, &credentials).await?;
        }

        Commands::Chat { provider, model } => {
            commands::run_chat(provider, model, &settings, &credentials).await?;
        }

        Commands::SqlSetup { db } => {
            commands::run_sql_setup(db, &settings)?;
        }

        Commands::Sql {
            question,
            db,
            provider,
        } => {
            commands::run_sql(&question, db, provider, &settings, &credentials).await?;
        }

        Commands::Summarize { url, provider } => {
            commands::run_summarize(&url, provider, &settings, &credentials).await?;
        }

        Commands::News {
            topic,
            model,
            output,
        } => {
            commands::run_news(&topic, model, &output, &settings, &credentials).await?;
        }

        Commands::Blog { url, model, output } => {
            commands::run_blog(&url, model, &output, &settings, &credentials).await?;
        }

        Commands::Serve { host, port } => {
            commands::run_serve(&host, port, settings, credentials).await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings, &credentials)?;
        }

        Commands::Config { action } => {
            commands::run_config(&action, &settings)?;
        }
    }

    Ok(())
}
