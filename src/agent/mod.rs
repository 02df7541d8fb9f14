//! Agents and the fetch-then-generate crew pipeline.
//!
//! An [`Agent`] wraps exactly one [`Tool`] with a fixed prompt template. It
//! renders the template, hands the result to the tool and returns the tool's
//! [`ToolResult`] untouched. Two agents chained research-then-writer form a
//! [`CrewPipeline`].

mod pipeline;

pub use pipeline::{
    blog_crew, news_crew, require_input, CrewPipeline, CrewRun, TOPIC_REQUIRED, URL_REQUIRED,
};

use crate::config::Prompts;
use crate::tools::{Tool, ToolResult};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// One tool plus the template that turns variables into its input.
pub struct Agent {
    role: String,
    tool: Arc<dyn Tool>,
    template: String,
    variables: HashMap<String, String>,
}

impl Agent {
    pub fn new(role: &str, tool: Arc<dyn Tool>, template: &str) -> Self {
        Self {
            role: role.to_string(),
            tool,
            template: template.to_string(),
            variables: HashMap::new(),
        }
    }

    /// Extra variables available to the template. Call-time variables win.
    pub fn with_variables(mut self, variables: HashMap<String, String>) -> Self {
        self.variables = variables;
        self
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    /// Render the template and run the tool on it.
    pub async fn run(&self, vars: &HashMap<String, String>) -> ToolResult {
        let mut merged = self.variables.clone();
        merged.extend(vars.iter().map(|(k, v)| (k.clone(), v.clone())));
        let input = Prompts::render(&self.template, &merged);

        debug!("{} agent running tool {}", self.role, self.tool.name());
        self.tool.run(&input).await
    }
}
