//! Free-form image description.

use crate::error::{KioskError, Result};
use crate::llm::{ChatMessage, ChatModel, CompletionRequest, ImageInput};
use tracing::{info, instrument};

/// Ask a vision model `prompt` about `image`.
#[instrument(skip(model, image), fields(mime = %image.mime_type))]
pub async fn describe_image(model: &dyn ChatModel, image: ImageInput, prompt: &str) -> Result<String> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(KioskError::InvalidInput("Enter a prompt to describe the image".to_string()));
    }

    info!("Describing {} byte image with {}", image.data.len(), model.model());
    let request = CompletionRequest::conversation(vec![ChatMessage::user(prompt).with_image(image)]);
    model.complete(&request).await
}
