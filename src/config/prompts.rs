//! Prompt templates for Kiosk.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory
//! (`resume.toml`, `document.toml`, `vision.toml`, `sql.toml`, `summary.toml`, `crew.toml`).
//! Templates use `{{name}}` placeholders.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub resume: ResumePrompts,
    pub document: DocumentPrompts,
    pub vision: VisionPrompts,
    pub sql: SqlPrompts,
    pub summary: SummaryPrompts,
    pub crew: CrewPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompts for the resume analyzer. `{{resume}}` and `{{job_description}}` are available.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumePrompts {
    pub match_percentage: String,
    pub summary: String,
    pub missing_keywords: String,
    pub suggestions: String,
}

impl Default for ResumePrompts {
    fn default() -> Self {
        Self {
            match_percentage: r#"Compare the following resume and job description.
Return only the percentage match (0-100%) with one short justification.

Resume:
{{resume}}

Job Description:
{{job_description}}"#
                .to_string(),

            summary: r#"Summarize the following resume in concise bullet points highlighting key skills, experience, and achievements.

Resume:
{{resume}}"#
                .to_string(),

            missing_keywords: r#"Compare the resume and job description.
List important keywords and skills mentioned in the job description but missing from the resume.

Resume:
{{resume}}

Job Description:
{{job_description}}"#
                .to_string(),

            suggestions: r#"Review the following resume.
Provide suggestions to improve it. Focus on structure, language, measurable results, and formatting.

Resume:
{{resume}}"#
                .to_string(),
        }
    }
}

/// Prompts for conversational document Q&A.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentPrompts {
    /// Rewrites a follow-up into a standalone question. `{{chat_history}}`, `{{question}}`.
    pub condense: String,
    /// System prompt for answering.
    pub system: String,
    /// Answer prompt. `{{context}}`, `{{question}}`.
    pub answer: String,
}

impl Default for DocumentPrompts {
    fn default() -> Self {
        Self {
            condense: r#"Given the following conversation and a follow up question, rephrase the follow up question to be a standalone question, in its original language.

Chat History:
{{chat_history}}
Follow Up Input: {{question}}
Standalone question:"#
                .to_string(),

            system: "You answer questions about an uploaded document using only the excerpts you are given.".to_string(),

            answer: r#"Use the following pieces of context to answer the question at the end. If you don't know the answer, just say that you don't know, don't try to make up an answer.

{{context}}

Question: {{question}}
Helpful Answer:"#
                .to_string(),
        }
    }
}

/// Prompts for the vision apps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionPrompts {
    /// Food analyzer prompt. The single-quoted example is what the model is shown.
    pub nutrition: String,
}

impl Default for VisionPrompts {
    fn default() -> Self {
        Self {
            nutrition: "You are a nutrition expert. Look at the image and identify all visible food items. \
For each item, provide:\n\
1. The name of the food\n\
2. Estimated calories for one serving (based on visual portion)\n\
3. A short recommendation (e.g., healthier alternatives or portion advice)\n\n\
Return your answer in JSON format like:\n\
[{'food': '...', 'approx_calories': '...', 'recommendation': '...'}, ...]"
                .to_string(),
        }
    }
}

/// Prompts for natural-language to SQL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SqlPrompts {
    /// `{{question}}`.
    pub generate: String,
}

impl Default for SqlPrompts {
    fn default() -> Self {
        Self {
            generate: r#"You are an expert data analyst. The SQLite database has a table named 'employees' with columns:
id, name, department, salary.
Convert the following question into a correct SQL query for SQLite.

Question: {{question}}

Only return the SQL query, nothing else."#
                .to_string(),
        }
    }
}

/// Prompts for the map-reduce transcript summarizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryPrompts {
    /// `{{part}}` (1-based), `{{chunk}}`.
    pub part: String,
    /// `{{summaries}}`.
    pub combine: String,
}

impl Default for SummaryPrompts {
    fn default() -> Self {
        Self {
            part: "Summarize this part of a YouTube transcript (part {{part}}):\n\n{{chunk}}".to_string(),
            combine: "Combine and refine the following partial summaries into a single coherent summary \
that captures the main points, key details, and tone of the original video:\n\n{{summaries}}"
                .to_string(),
        }
    }
}

/// Prompts for the two crew pipelines. `{{research}}` is the fetch stage output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrewPrompts {
    pub news_system: String,
    /// `{{topic}}`, `{{research}}`.
    pub news_writer: String,
    pub blog_system: String,
    /// `{{research}}`.
    pub blog_writer: String,
}

impl Default for CrewPrompts {
    fn default() -> Self {
        Self {
            news_system: "You are a professional journalist who writes concise news reports.".to_string(),
            news_writer: "Write a detailed, structured news report about '{{topic}}' based on the following articles:\n{{research}}\n\nFormat the report with a title, summary, and analysis section.".to_string(),
            blog_system: "Write an engaging blog post.".to_string(),
            blog_writer: "Create a blog post summarizing the following transcript:\n{{research}}\nMake it engaging, clear, and well-structured.".to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            if let Some(p) = load_section(&custom_path, "resume.toml")? {
                prompts.resume = p;
            }
            if let Some(p) = load_section(&custom_path, "document.toml")? {
                prompts.document = p;
            }
            if let Some(p) = load_section(&custom_path, "vision.toml")? {
                prompts.vision = p;
            }
            if let Some(p) = load_section(&custom_path, "sql.toml")? {
                prompts.sql = p;
            }
            if let Some(p) = load_section(&custom_path, "summary.toml")? {
                prompts.summary = p;
            }
            if let Some(p) = load_section(&custom_path, "crew.toml")? {
                prompts.crew = p;
            }
        }

        Ok(prompts)
    }

    /// Load prompts as configured in settings.
    pub fn from_settings(settings: &super::Settings) -> crate::error::Result<Self> {
        Self::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )
    }

    /// Render a prompt template with the given variables.
    ///
    /// Substitution is a single pass over the template: inserted values are
    /// never scanned for placeholders, and unknown placeholders are kept.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        placeholder_regex()
            .replace_all(template, |caps: &Captures<'_>| match vars.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{(\w+)\}\}").expect("placeholder regex is valid"))
}

fn load_section<T: serde::de::DeserializeOwned>(
    dir: &Path,
    file: &str,
) -> crate::error::Result<Option<T>> {
    let path = dir.join(file);
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(&path)?;
    Ok(Some(toml::from_str(&content)?))
}

/// Build a variable map from `(name, value)` pairs.
pub fn vars<const N: usize>(pairs: [(&str, &str); N]) -> HashMap<String, String> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(prompts.resume.match_percentage.contains("{{job_description}}"));
        assert!(prompts.crew.news_writer.contains("{{topic}}"));
        assert!(prompts.vision.nutrition.contains("'approx_calories'"));
    }

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} messages.";
        let result = Prompts::render(template, &vars([("name", "Alice"), ("count", "5")]));
        assert_eq!(result, "Hello Alice, you have 5 messages.");
    }

    #[test]
    fn test_render_does_not_expand_placeholders_inside_values() {
        let vars = vars([
            ("topic", "Bitcoin"),
            ("research", "template engines use {{topic}} placeholders"),
        ]);
        for _ in 0..32 {
            let out = Prompts::render("About {{topic}}: {{research}}", &vars);
            assert_eq!(out, "About Bitcoin: template engines use {{topic}} placeholders");
        }
    }

    #[test]
    fn test_render_keeps_unknown_placeholders() {
        let out = Prompts::render("{{known}} and {{unknown}}", &vars([("known", "x")]));
        assert_eq!(out, "x and {{unknown}}");
    }

    #[test]
    fn test_render_with_custom_prefers_provided() {
        let mut prompts = Prompts::default();
        prompts.variables.insert("tone".to_string(), "formal".to_string());
        prompts.variables.insert("topic".to_string(), "ignored".to_string());

        let out = prompts.render_with_custom("{{tone}} report on {{topic}}", &vars([("topic", "Bitcoin")]));
        assert_eq!(out, "formal report on Bitcoin");
    }

    #[test]
    fn test_load_custom_section_overrides_only_that_section() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("sql.toml"),
            "generate = \"SQL for: {{question}}\"\n",
        )
        .unwrap();

        let prompts = Prompts::load(dir.path().to_str(), None).unwrap();
        assert_eq!(prompts.sql.generate, "SQL for: {{question}}");
        assert_eq!(prompts.crew.blog_system, "Write an engaging blog post.");
    }
}
