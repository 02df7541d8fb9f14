//! Tools: units that perform exactly one external call and normalize its outcome.
//!
//! A tool never returns `Err` and never panics on upstream failure. Every
//! outcome, including a missing API key, is folded into a [`ToolResult`].

mod generate;
mod news;
mod transcript;

pub use generate::GenerationTool;
pub use news::{Article, NewsSearchTool};
pub use transcript::TranscriptTool;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Tagged outcome of a tool invocation.
///
/// Exactly one of output/error exists, determined by which variant was
/// constructed. Serializes as `{"ok": .., "output": .., "error": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "ToolResultRepr", try_from = "ToolResultRepr")]
pub enum ToolResult {
    Success(String),
    Failure(String),
}

impl ToolResult {
    pub fn success(output: impl Into<String>) -> Self {
        ToolResult::Success(output.into())
    }

    pub fn failure(error: impl Into<String>) -> Self {
        ToolResult::Failure(error.into())
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ToolResult::Success(_))
    }

    /// Payload, present iff `is_ok()`.
    pub fn output(&self) -> Option<&str> {
        match self {
            ToolResult::Success(output) => Some(output),
            ToolResult::Failure(_) => None,
        }
    }

    /// Error message, present iff `!is_ok()`.
    pub fn error(&self) -> Option<&str> {
        match self {
            ToolResult::Success(_) => None,
            ToolResult::Failure(error) => Some(error),
        }
    }

    /// Convert into a standard `Result`.
    pub fn into_result(self) -> std::result::Result<String, String> {
        match self {
            ToolResult::Success(output) => Ok(output),
            ToolResult::Failure(error) => Err(error),
        }
    }
}

impl<E: Display> From<std::result::Result<String, E>> for ToolResult {
    fn from(result: std::result::Result<String, E>) -> Self {
        match result {
            Ok(output) => ToolResult::Success(output),
            Err(e) => ToolResult::Failure(e.to_string()),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct ToolResultRepr {
    ok: bool,
    output: Option<String>,
    error: Option<String>,
}

impl From<ToolResult> for ToolResultRepr {
    fn from(result: ToolResult) -> Self {
        match result {
            ToolResult::Success(output) => Self {
                ok: true,
                output: Some(output),
                error: None,
            },
            ToolResult::Failure(error) => Self {
                ok: false,
                output: None,
                error: Some(error),
            },
        }
    }
}

impl TryFrom<ToolResultRepr> for ToolResult {
    type Error = String;

    fn try_from(repr: ToolResultRepr) -> std::result::Result<Self, Self::Error> {
        match (repr.ok, repr.output, repr.error) {
            (true, Some(output), None) => Ok(ToolResult::Success(output)),
            (false, None, Some(error)) => Ok(ToolResult::Failure(error)),
            _ => Err("ok must match exactly one of output/error".to_string()),
        }
    }
}

/// A unit performing one external call.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Perform the call for `input` and report the outcome.
    async fn run(&self, input: &str) -> ToolResult;
}
