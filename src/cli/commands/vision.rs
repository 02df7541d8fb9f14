//! Image description and food analysis commands.

use super::ensure_ready;
use crate::apps::describe::describe_image;
use crate::apps::nutrition::analyze_food;
use crate::cli::preflight::Operation;
use crate::cli::Output;
use crate::config::{Credentials, Prompts, Provider, Settings};
use crate::llm::{build_chat_model, ImageInput};
use anyhow::Result;
use std::path::Path;

/// Run the describe command.
pub async fn run_describe(
    image: &Path,
    prompt: &str,
    provider: Option<Provider>,
    settings: &Settings,
    credentials: &Credentials,
) -> Result<()> {
    let provider = provider.unwrap_or(settings.apps.vision_provider);
    ensure_ready(Operation::Generate(provider), credentials)?;

    let image = ImageInput::from_path(image)?;
    let model = build_chat_model(provider, None, settings, credentials)?;

    let spinner = Output::spinner("Generating response...");
    let result = describe_image(model.as_ref(), image, prompt).await;
    spinner.finish_and_clear();

    let description = result?;
    Output::header("Description");
    println!("\n{}\n", description);
    Ok(())
}

/// Run the nutrition command.
pub async fn run_nutrition(
    image: &Path,
    provider: Option<Provider>,
    settings: &Settings,
    credentials: &Credentials,
) -> Result<()> {
    let provider = provider.unwrap_or(settings.apps.vision_provider);
    ensure_ready(Operation::Generate(provider), credentials)?;

    let image = ImageInput::from_path(image)?;
    let model = build_chat_model(provider, None, settings, credentials)?;
    let prompts = Prompts::from_settings(settings)?;

    let spinner = Output::spinner("Analyzing image...");
    let result = analyze_food(model.as_ref(), image, &prompts).await;
    spinner.finish_and_clear();

    let report = result?;
    Output::header("Raw Response");
    println!("\n{}\n", report.raw);

    match &report.items {
        Some(items) => {
            Output::header("Food Items");
            for item in items {
                Output::list_item(&format!(
                    "{} - approx. {} kcal. {}",
                    item.food,
                    item.calories(),
                    item.recommendation
                ));
            }
            println!();
        }
        None => {
            if let Some(warning) = report.warning() {
                Output::warning(warning);
            }
        }
    }

    Ok(())
}
