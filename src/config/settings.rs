//! Configuration settings for Kiosk.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub providers: ProviderSettings,
    pub news: NewsSettings,
    pub youtube: YoutubeSettings,
    pub document: DocumentSettings,
    pub sql: SqlSettings,
    pub resume: ResumeSettings,
    pub apps: AppSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level used when no `-v` flag is given (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Hosted model provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// OpenAI chat completions.
    #[default]
    OpenAI,
    /// Groq's OpenAI-compatible endpoint.
    Groq,
    /// Google Gemini `generateContent`.
    Gemini,
}

impl std::str::FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" | "gpt" => Ok(Provider::OpenAI),
            "groq" => Ok(Provider::Groq),
            "gemini" | "google" => Ok(Provider::Gemini),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::OpenAI => write!(f, "openai"),
            Provider::Groq => write!(f, "groq"),
            Provider::Gemini => write!(f, "gemini"),
        }
    }
}

/// Connection settings for a single provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderEndpoint {
    /// Default chat model.
    pub model: String,
    /// API base URL. `None` uses the client library default.
    pub base_url: Option<String>,
    /// Embedding model (for providers used by document Q&A).
    pub embedding_model: Option<String>,
}

/// Model provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Timeout for a single API request, in seconds.
    pub timeout_seconds: u64,
    pub openai: ProviderEndpoint,
    pub groq: ProviderEndpoint,
    pub gemini: ProviderEndpoint,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: 300,
            openai: ProviderEndpoint {
                model: "gpt-4o-mini".to_string(),
                base_url: None,
                embedding_model: Some("text-embedding-3-small".to_string()),
            },
            groq: ProviderEndpoint {
                model: "llama-3.3-70b-versatile".to_string(),
                base_url: Some("https://api.groq.com/openai/v1".to_string()),
                embedding_model: None,
            },
            gemini: ProviderEndpoint {
                model: "gemini-2.5-pro".to_string(),
                base_url: Some("https://generativelanguage.googleapis.com/v1beta".to_string()),
                embedding_model: Some("models/embedding-001".to_string()),
            },
        }
    }
}

impl ProviderSettings {
    /// Endpoint settings for the given provider.
    pub fn endpoint(&self, provider: Provider) -> &ProviderEndpoint {
        match provider {
            Provider::OpenAI => &self.openai,
            Provider::Groq => &self.groq,
            Provider::Gemini => &self.gemini,
        }
    }
}

/// News search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsSettings {
    /// NewsAPI "everything" endpoint.
    pub endpoint: String,
    /// Article language filter.
    pub language: String,
    /// Maximum number of articles fetched per topic.
    pub max_articles: u32,
    /// Default OpenAI model for the report writer.
    pub model: String,
}

impl Default for NewsSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://newsapi.org/v2/everything".to_string(),
            language: "en".to_string(),
            max_articles: 5,
            model: "gpt-4o-mini".to_string(),
        }
    }
}

/// YouTube transcript settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YoutubeSettings {
    /// Preferred caption language.
    pub language: String,
    /// Path or name of the yt-dlp executable.
    pub ytdlp_path: String,
    /// Transcript characters per summarization part.
    pub summary_chunk_chars: usize,
    /// Default OpenAI model for the blog writer.
    pub blog_model: String,
}

impl Default for YoutubeSettings {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            ytdlp_path: "yt-dlp".to_string(),
            summary_chunk_chars: 8000,
            blog_model: "gpt-4o-mini".to_string(),
        }
    }
}

/// Document Q&A settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentSettings {
    /// Target chunk size in characters.
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters.
    pub chunk_overlap: usize,
    /// Number of chunks retrieved per question.
    pub top_k: usize,
    /// Provider for answering.
    pub provider: Provider,
    /// Provider for embeddings (openai or gemini).
    pub embedding_provider: Provider,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 150,
            top_k: 4,
            provider: Provider::Groq,
            embedding_provider: Provider::Gemini,
        }
    }
}

/// SQL assistant settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SqlSettings {
    /// Path to the SQLite database.
    pub db_path: String,
    /// Provider used to translate questions into SQL.
    pub provider: Provider,
}

impl Default for SqlSettings {
    fn default() -> Self {
        Self {
            db_path: "company.db".to_string(),
            provider: Provider::Gemini,
        }
    }
}

/// Resume analyzer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeSettings {
    /// Resume characters included in each prompt.
    pub max_chars: usize,
    pub provider: Provider,
}

impl Default for ResumeSettings {
    fn default() -> Self {
        Self {
            max_chars: 6000,
            provider: Provider::Groq,
        }
    }
}

/// Provider choice for the remaining single-call apps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Image describer and food analyzer.
    pub vision_provider: Provider,
    /// Q&A chatbot.
    pub chat_provider: Provider,
    /// YouTube summarizer.
    pub summary_provider: Provider,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            vision_provider: Provider::Gemini,
            chat_provider: Provider::Gemini,
            summary_provider: Provider::Gemini,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::KioskError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kiosk")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded SQLite database path.
    pub fn sql_db_path(&self) -> PathBuf {
        Self::expand_path(&self.sql.db_path)
    }

    /// Request timeout shared by every HTTP client.
    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.providers.timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_str() {
        assert_eq!("GROQ".parse::<Provider>().unwrap(), Provider::Groq);
        assert_eq!("google".parse::<Provider>().unwrap(), Provider::Gemini);
        assert_eq!("openai".parse::<Provider>().unwrap(), Provider::OpenAI);
        assert!("claude".parse::<Provider>().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [news]
            max_articles = 10

            [document]
            provider = "openai"
            "#,
        )
        .unwrap();

        assert_eq!(settings.news.max_articles, 10);
        assert_eq!(settings.news.language, "en");
        assert_eq!(settings.document.provider, Provider::OpenAI);
        assert_eq!(settings.document.chunk_size, 1000);
        assert_eq!(settings.resume.max_chars, 6000);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.sql.db_path = "/tmp/other.db".to_string();
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.sql.db_path, "/tmp/other.db");
        assert_eq!(loaded.providers.gemini.model, "gemini-2.5-pro");
    }
}
