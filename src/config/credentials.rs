//! API credentials, read once from the environment at startup.

use super::Provider;
use crate::error::{KioskError, Result};

pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const GROQ_API_KEY: &str = "GROQ_API_KEY";
pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
pub const NEWS_API_KEY: &str = "NEWS_API_KEY";

/// API keys for every hosted service Kiosk talks to.
///
/// Empty environment values are treated as absent.
#[derive(Clone, Default)]
pub struct Credentials {
    pub openai: Option<String>,
    pub groq: Option<String>,
    pub google: Option<String>,
    pub news: Option<String>,
}

impl Credentials {
    /// Load `.env` (if present) and read all keys from the environment.
    pub fn from_env() -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }

        Self {
            openai: read_var(OPENAI_API_KEY),
            groq: read_var(GROQ_API_KEY),
            google: read_var(GOOGLE_API_KEY),
            news: read_var(NEWS_API_KEY),
        }
    }

    /// Key for a model provider, if configured.
    pub fn for_provider(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::OpenAI => self.openai.as_deref(),
            Provider::Groq => self.groq.as_deref(),
            Provider::Gemini => self.google.as_deref(),
        }
    }

    /// Key for a model provider, or a `MissingCredential` error naming the variable.
    pub fn require(&self, provider: Provider) -> Result<&str> {
        self.for_provider(provider)
            .ok_or(KioskError::MissingCredential(env_var_for(provider)))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mask = |v: &Option<String>| if v.is_some() { "set" } else { "unset" };
        f.debug_struct("Credentials")
            .field("openai", &mask(&self.openai))
            .field("groq", &mask(&self.groq))
            .field("google", &mask(&self.google))
            .field("news", &mask(&self.news))
            .finish()
    }
}

/// Environment variable holding the key for a provider.
pub fn env_var_for(provider: Provider) -> &'static str {
    match provider {
        Provider::OpenAI => OPENAI_API_KEY,
        Provider::Groq => GROQ_API_KEY,
        Provider::Gemini => GOOGLE_API_KEY,
    }
}

fn read_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_names_missing_variable() {
        let creds = Credentials {
            openai: Some("sk-test".to_string()),
            ..Default::default()
        };

        assert_eq!(creds.require(Provider::OpenAI).unwrap(), "sk-test");
        let err = creds.require(Provider::Gemini).unwrap_err();
        assert_eq!(err.to_string(), "Missing GOOGLE_API_KEY");
    }

    #[test]
    fn test_debug_does_not_leak_keys() {
        let creds = Credentials {
            groq: Some("gsk-secret".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("gsk-secret"));
        assert!(debug.contains("groq: \"set\""));
    }
}
