//! Fetch-then-generate crew pipeline.

use super::Agent;
use crate::config::Prompts;
use crate::error::{KioskError, Result};
use crate::llm::ChatModel;
use crate::tools::{GenerationTool, Tool, ToolResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Shown when the news crew is started without a topic.
pub const TOPIC_REQUIRED: &str = "Please enter a topic.";

/// Shown when the blog crew is started without a video URL.
pub const URL_REQUIRED: &str = "Please enter a YouTube URL.";

/// The trimmed input, or `InvalidInput(message)` when it is blank.
pub fn require_input<'a>(input: &'a str, message: &str) -> Result<&'a str> {
    let input = input.trim();
    if input.is_empty() {
        return Err(KioskError::InvalidInput(message.to_string()));
    }
    Ok(input)
}

/// Outcome of one crew run.
///
/// `output` is `None` when the research stage failed and the writer never ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewRun {
    pub research: ToolResult,
    pub output: Option<ToolResult>,
}

impl CrewRun {
    /// Whether both stages succeeded.
    pub fn is_ok(&self) -> bool {
        self.research.is_ok() && self.output.as_ref().is_some_and(ToolResult::is_ok)
    }
}

/// A research agent followed by a writer agent.
///
/// The research template sees the caller's input as `{{<input_var>}}`; the
/// writer template additionally sees the research output as `{{research}}`.
pub struct CrewPipeline {
    input_var: String,
    missing_input: String,
    research: Agent,
    writer: Agent,
}

impl CrewPipeline {
    /// `missing_input` is the error message used when the input is blank.
    pub fn new(input_var: &str, missing_input: &str, research: Agent, writer: Agent) -> Self {
        Self {
            input_var: input_var.to_string(),
            missing_input: missing_input.to_string(),
            research,
            writer,
        }
    }

    /// Run research and, only if it succeeded, the writer.
    ///
    /// A blank input is rejected before either stage runs; every other
    /// failure is reported inside the returned [`CrewRun`].
    #[instrument(skip(self), fields(research = self.research.role(), writer = self.writer.role()))]
    pub async fn run(&self, input: &str) -> Result<CrewRun> {
        let input = require_input(input, &self.missing_input)?;
        let mut vars = HashMap::from([(self.input_var.clone(), input.to_string())]);

        let research = self.research.run(&vars).await;
        let Some(findings) = research.output() else {
            warn!("Research stage failed: {}", research.error().unwrap_or_default());
            return Ok(CrewRun {
                research,
                output: None,
            });
        };
        info!("Research stage returned {} chars", findings.len());

        vars.insert("research".to_string(), findings.to_string());
        let output = self.writer.run(&vars).await;
        if let Some(error) = output.error() {
            warn!("Writer stage failed: {}", error);
        }

        Ok(CrewRun {
            research,
            output: Some(output),
        })
    }
}

fn writer_agent(model: Arc<dyn ChatModel>, system: &str, template: &str, prompts: &Prompts) -> Agent {
    let tool = GenerationTool::new(model).with_system_prompt(system);
    Agent::new("writer", Arc::new(tool), template).with_variables(prompts.variables.clone())
}

/// News search followed by a journalist writer. Input is the topic.
pub fn news_crew(search: Arc<dyn Tool>, model: Arc<dyn ChatModel>, prompts: &Prompts) -> CrewPipeline {
    CrewPipeline::new(
        "topic",
        TOPIC_REQUIRED,
        Agent::new("researcher", search, "{{topic}}"),
        writer_agent(model, &prompts.crew.news_system, &prompts.crew.news_writer, prompts),
    )
}

/// Transcript fetch followed by a blog writer. Input is the video URL.
pub fn blog_crew(transcripts: Arc<dyn Tool>, model: Arc<dyn ChatModel>, prompts: &Prompts) -> CrewPipeline {
    CrewPipeline::new(
        "url",
        URL_REQUIRED,
        Agent::new("researcher", transcripts, "{{url}}"),
        writer_agent(model, &prompts.crew.blog_system, &prompts.crew.blog_writer, prompts),
    )
}
