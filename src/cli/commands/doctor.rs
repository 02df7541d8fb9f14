//! Doctor command - verify credentials, tools and configuration.

use crate::cli::Output;
use crate::config::credentials::{GOOGLE_API_KEY, GROQ_API_KEY, NEWS_API_KEY, OPENAI_API_KEY};
use crate::config::{Credentials, Settings};
use console::style;
use std::path::Path;
use std::process::Command;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings, credentials: &Credentials) -> anyhow::Result<()> {
    Output::header("Kiosk Doctor");
    println!();
    println!("Checking credentials, tools and configuration...\n");

    let mut checks = Vec::new();

    println!("{}", style("API Keys").bold());
    let key_checks = vec![
        check_key(GOOGLE_API_KEY, credentials.google.as_deref(), "Gemini apps and embeddings"),
        check_key(GROQ_API_KEY, credentials.groq.as_deref(), "resume and document answers"),
        check_key(OPENAI_API_KEY, credentials.openai.as_deref(), "news and blog writers"),
        check_key(NEWS_API_KEY, credentials.news.as_deref(), "news research"),
    ];
    for check in &key_checks {
        check.print();
    }
    checks.extend(key_checks);

    println!();

    println!("{}", style("External Tools").bold());
    let tool_check = check_tool(&settings.youtube.ytdlp_path, install_hint_ytdlp());
    tool_check.print();
    checks.push(tool_check);

    println!();

    println!("{}", style("Data").bold());
    let db_check = check_database(&settings.sql_db_path());
    db_check.print();
    checks.push(db_check);

    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file();
    config_check.print();
    checks.push(config_check);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Kiosk.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Kiosk is ready to use.");
    }

    Ok(())
}

/// A missing key only disables the apps that need it.
fn check_key(var: &str, value: Option<&str>, used_for: &str) -> CheckResult {
    match value {
        Some(key) => CheckResult::ok(var, &format!("configured ({})", mask_key(key))),
        None => CheckResult::warning(
            var,
            &format!("not set (needed for {})", used_for),
            &format!("Set with: export {}='...' or add it to .env", var),
        ),
    }
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

/// Check if an external tool is available.
fn check_tool(name: &str, hint: &str) -> CheckResult {
    match Command::new(name).arg("--version").output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .unwrap_or("installed")
                .trim()
                .to_string();
            CheckResult::ok(name, &version)
        }
        Ok(_) => CheckResult::error(name, "installed but not working", hint),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            CheckResult::warning(name, "not found (needed for YouTube apps)", hint)
        }
        Err(e) => CheckResult::error(name, &format!("error: {}", e), hint),
    }
}

fn check_database(path: &Path) -> CheckResult {
    if path.exists() {
        let size = std::fs::metadata(path)
            .map(|m| format_size(m.len()))
            .unwrap_or_else(|_| "unknown size".to_string());
        CheckResult::ok("SQL database", &format!("{} ({})", path.display(), size))
    } else {
        CheckResult::warning(
            "SQL database",
            &format!("{} (not created yet)", path.display()),
            "Create with: kiosk sql-setup",
        )
    }
}

/// Check if config file exists.
fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning("Config file", "using defaults", "Create with: kiosk config edit")
    }
}

/// Format file size in human-readable format.
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Platform-specific install hint for yt-dlp.
fn install_hint_ytdlp() -> &'static str {
    if cfg!(target_os = "macos") {
        "Install with: brew install yt-dlp"
    } else if cfg!(target_os = "linux") {
        "Install with: pip install yt-dlp (or your package manager)"
    } else {
        "Install from: https://github.com/yt-dlp/yt-dlp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_warning() {
        let result = check_key(NEWS_API_KEY, None, "news research");
        assert_eq!(result.status, CheckStatus::Warning);
        assert_eq!(result.message, "not set (needed for news research)");
    }

    #[test]
    fn test_configured_key_is_masked() {
        let result = check_key(GROQ_API_KEY, Some("gsk_abcdefgh1234"), "answers");
        assert_eq!(result.status, CheckStatus::Ok);
        assert_eq!(result.message, "configured (****1234)");
        assert_eq!(mask_key("short"), "****");
    }

    #[test]
    fn test_missing_database_hints_setup() {
        let dir = tempfile::tempdir().unwrap();
        let result = check_database(&dir.path().join("company.db"));
        assert_eq!(result.status, CheckStatus::Warning);
        assert_eq!(result.hint.as_deref(), Some("Create with: kiosk sql-setup"));
    }

    #[test]
    fn test_missing_tool_is_warning() {
        let result = check_tool("definitely-not-a-real-binary", "install it");
        assert_eq!(result.status, CheckStatus::Warning);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1024 * 1024), "1.0 MB");
    }
}
