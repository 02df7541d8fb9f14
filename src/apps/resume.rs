//! Resume analysis against an optional job description.

use crate::config::{vars, Prompts};
use crate::error::{KioskError, Result};
use crate::llm::{ChatModel, CompletionRequest};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

use super::truncate_chars;

/// What to do with the resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResumeAction {
    /// Percentage match with the job description.
    Match,
    /// Bullet-point summary.
    Summary,
    /// Job description keywords missing from the resume.
    Keywords,
    /// Improvement suggestions.
    Suggestions,
}

impl ResumeAction {
    /// Heading shown above the result.
    pub fn title(&self) -> &'static str {
        match self {
            ResumeAction::Match => "Match Percentage",
            ResumeAction::Summary => "Resume Summary",
            ResumeAction::Keywords => "Missing Keywords",
            ResumeAction::Suggestions => "Resume Improvement Suggestions",
        }
    }

    pub fn needs_job_description(&self) -> bool {
        matches!(self, ResumeAction::Match | ResumeAction::Keywords)
    }
}

impl std::str::FromStr for ResumeAction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "match" => Ok(ResumeAction::Match),
            "summary" | "summarize" => Ok(ResumeAction::Summary),
            "keywords" => Ok(ResumeAction::Keywords),
            "suggestions" | "improve" => Ok(ResumeAction::Suggestions),
            _ => Err(format!(
                "Unknown action: {} (expected match, summary, keywords or suggestions)",
                s
            )),
        }
    }
}

impl std::fmt::Display for ResumeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResumeAction::Match => write!(f, "match"),
            ResumeAction::Summary => write!(f, "summary"),
            ResumeAction::Keywords => write!(f, "keywords"),
            ResumeAction::Suggestions => write!(f, "suggestions"),
        }
    }
}

/// Runs one resume prompt per action.
pub struct ResumeAnalyzer {
    model: Arc<dyn ChatModel>,
    prompts: Prompts,
    max_chars: usize,
}

impl ResumeAnalyzer {
    pub fn new(model: Arc<dyn ChatModel>, prompts: Prompts, max_chars: usize) -> Self {
        Self {
            model,
            prompts,
            max_chars,
        }
    }

    #[instrument(skip(self, resume_text, job_description))]
    pub async fn analyze(
        &self,
        resume_text: &str,
        job_description: Option<&str>,
        action: ResumeAction,
    ) -> Result<String> {
        let resume = truncate_chars(resume_text.trim(), self.max_chars);
        if resume.is_empty() {
            return Err(KioskError::InvalidInput("The resume has no text".to_string()));
        }

        let job_description = job_description.map(str::trim).unwrap_or_default();
        if action.needs_job_description() && job_description.is_empty() {
            let purpose = match action {
                ResumeAction::Match => "calculate match %",
                _ => "find missing keywords",
            };
            return Err(KioskError::InvalidInput(format!(
                "Please paste a job description to {}.",
                purpose
            )));
        }

        let templates = &self.prompts.resume;
        let template = match action {
            ResumeAction::Match => &templates.match_percentage,
            ResumeAction::Summary => &templates.summary,
            ResumeAction::Keywords => &templates.missing_keywords,
            ResumeAction::Suggestions => &templates.suggestions,
        };
        let prompt = self.prompts.render_with_custom(
            template,
            &vars([("resume", resume), ("job_description", job_description)]),
        );

        info!("Running resume {} with {}", action, self.model.model());
        let answer = self.model.complete(&CompletionRequest::prompt(prompt)).await?;
        Ok(answer.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::ScriptedModel;

    fn analyzer(model: Arc<ScriptedModel>, max_chars: usize) -> ResumeAnalyzer {
        ResumeAnalyzer::new(model, Prompts::default(), max_chars)
    }

    #[tokio::test]
    async fn test_match_requires_job_description() {
        let model = Arc::new(ScriptedModel::new());
        let err = analyzer(model.clone(), 6000)
            .analyze("Rust developer", Some("   "), ResumeAction::Match)
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Invalid input: Please paste a job description to calculate match %."
        );
        assert!(model.requests().is_empty());
    }

    #[tokio::test]
    async fn test_resume_is_truncated_in_prompt() {
        let model = Arc::new(ScriptedModel::with_replies(&["  - Skilled  \n"]));
        let resume = format!("{}{}", "a".repeat(10), "TAIL");

        let answer = analyzer(model.clone(), 10)
            .analyze(&resume, None, ResumeAction::Summary)
            .await
            .unwrap();

        assert_eq!(answer, "- Skilled");
        let prompt = model.last_prompt(0);
        assert!(prompt.contains("aaaaaaaaaa"));
        assert!(!prompt.contains("TAIL"));
    }

    #[tokio::test]
    async fn test_keywords_prompt_includes_both_texts() {
        let model = Arc::new(ScriptedModel::with_replies(&["Kubernetes"]));
        analyzer(model.clone(), 6000)
            .analyze("Rust, Tokio", Some("Rust, Kubernetes"), ResumeAction::Keywords)
            .await
            .unwrap();

        let prompt = model.last_prompt(0);
        assert!(prompt.contains("Resume:\nRust, Tokio"));
        assert!(prompt.contains("Job Description:\nRust, Kubernetes"));
    }

    #[test]
    fn test_action_parsing() {
        assert_eq!("MATCH".parse::<ResumeAction>(), Ok(ResumeAction::Match));
        assert_eq!("improve".parse::<ResumeAction>(), Ok(ResumeAction::Suggestions));
        assert!("rewrite".parse::<ResumeAction>().is_err());
    }
}
