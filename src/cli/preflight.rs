//! Pre-flight checks before model calls.
//!
//! Validates that required credentials, tools and files are available
//! before starting operations that would otherwise fail midway.

use crate::config::credentials::{env_var_for, NEWS_API_KEY};
use crate::config::{Credentials, Provider};
use crate::error::{KioskError, Result};
use std::path::Path;
use std::process::Command;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation<'a> {
    /// A single app backed by one chat model.
    Generate(Provider),
    /// Document Q&A: a chat model plus an embedding model.
    DocumentQa { chat: Provider, embeddings: Provider },
    /// News crew: NewsAPI plus the writer model.
    News(Provider),
    /// Anything reading YouTube captions.
    Video { provider: Provider, ytdlp: &'a str },
    /// SQL assistant: the model and an existing database.
    Sql { provider: Provider, db: &'a Path },
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation<'_>, credentials: &Credentials) -> Result<()> {
    match operation {
        Operation::Generate(provider) => {
            check_api_key(credentials, provider)?;
        }
        Operation::DocumentQa { chat, embeddings } => {
            check_api_key(credentials, chat)?;
            check_api_key(credentials, embeddings)?;
        }
        Operation::News(provider) => {
            if credentials.news.is_none() {
                return Err(KioskError::MissingCredential(NEWS_API_KEY));
            }
            check_api_key(credentials, provider)?;
        }
        Operation::Video { provider, ytdlp } => {
            check_api_key(credentials, provider)?;
            check_tool(ytdlp)?;
        }
        Operation::Sql { provider, db } => {
            check_api_key(credentials, provider)?;
            if !db.exists() {
                return Err(KioskError::Config(format!(
                    "Database not found at {}. Create it with: kiosk sql-setup",
                    db.display()
                )));
            }
        }
    }
    Ok(())
}

/// Check that the provider's API key is configured.
fn check_api_key(credentials: &Credentials, provider: Provider) -> Result<()> {
    credentials.require(provider).map(|_| ()).map_err(|_| {
        let var = env_var_for(provider);
        KioskError::Config(format!("{} not set. Set it with: export {}='...'", var, var))
    })
}

/// Check if an external tool is available.
pub fn check_tool(name: &str) -> Result<()> {
    match Command::new(name).arg("--version").output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(KioskError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(KioskError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(KioskError::ToolNotFound(format!("{}: {}", name, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_google() -> Credentials {
        Credentials {
            google: Some("g".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_provider_key_names_variable() {
        let err = check(Operation::Generate(Provider::Groq), &with_google()).unwrap_err();
        assert!(err.to_string().contains("GROQ_API_KEY not set"));
        assert!(check(Operation::Generate(Provider::Gemini), &with_google()).is_ok());
    }

    #[test]
    fn test_news_requires_news_key() {
        let creds = Credentials {
            openai: Some("sk".to_string()),
            ..Default::default()
        };
        let err = check(Operation::News(Provider::OpenAI), &creds).unwrap_err();
        assert_eq!(err.to_string(), "Missing NEWS_API_KEY");
    }

    #[test]
    fn test_sql_requires_database() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("company.db");
        let op = Operation::Sql {
            provider: Provider::Gemini,
            db: &db,
        };
        assert!(matches!(check(op, &with_google()), Err(KioskError::Config(_))));

        std::fs::write(&db, b"").unwrap();
        assert!(check(op, &with_google()).is_ok());
    }

    #[test]
    fn test_missing_tool_is_reported() {
        assert!(matches!(
            check_tool("definitely-not-a-real-tool-binary"),
            Err(KioskError::ToolNotFound(_))
        ));
    }
}
