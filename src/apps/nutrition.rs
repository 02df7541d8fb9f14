//! Food image analysis: items, calorie estimates and recommendations.

use crate::config::Prompts;
use crate::error::Result;
use crate::llm::{ChatMessage, ChatModel, CompletionRequest, ImageInput};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

const TEMPERATURE: f32 = 0.4;

/// Shown when the response is not the requested JSON array.
pub const PARSE_WARNING: &str = "Could not parse structured JSON. Displaying raw response instead.";

/// One identified food item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub food: String,
    /// Models return either a number or a string such as `"250-300"`.
    pub approx_calories: serde_json::Value,
    pub recommendation: String,
}

impl FoodItem {
    pub fn calories(&self) -> String {
        match &self.approx_calories {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// The raw model response and, when it parsed, the structured items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionReport {
    pub raw: String,
    pub items: Option<Vec<FoodItem>>,
}

impl NutritionReport {
    pub fn warning(&self) -> Option<&'static str> {
        self.items.is_none().then_some(PARSE_WARNING)
    }
}

/// Analyze a food photo with the nutrition-expert prompt.
#[instrument(skip_all, fields(model = model.model()))]
pub async fn analyze_food(model: &dyn ChatModel, image: ImageInput, prompts: &Prompts) -> Result<NutritionReport> {
    let request = CompletionRequest::conversation(vec![
        ChatMessage::user(prompts.vision.nutrition.clone()).with_image(image),
    ])
    .with_temperature(TEMPERATURE);

    let raw = model.complete(&request).await?;
    let items = parse_food_items(&raw);
    if items.is_none() {
        warn!("Food analysis response was not a JSON array");
    }

    Ok(NutritionReport { raw, items })
}

/// Parse a JSON array of food items, tolerating a surrounding code fence.
pub fn parse_food_items(text: &str) -> Option<Vec<FoodItem>> {
    let body = strip_code_fence(text);
    match serde_json::from_str(body) {
        Ok(items) => Some(items),
        Err(e) => {
            debug!("Food items did not parse: {}", e);
            None
        }
    }
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    // Drop the language tag line, if any.
    match inner.split_once('\n') {
        Some((tag, rest)) if !tag.trim_start().starts_with('[') => rest.trim(),
        _ => inner.trim(),
    }
}
