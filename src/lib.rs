//! Kiosk - small single-purpose LLM apps
//!
//! A CLI (and optional HTTP server) bundling independent apps, each a thin
//! workflow over a hosted chat model.
//!
//! # Overview
//!
//! Kiosk lets you:
//! - Review a resume against a job description
//! - Ask follow-up questions about a PDF with retrieval over its chunks
//! - Describe images and estimate the calories of a meal
//! - Turn plain-language questions into SQL over a sample database
//! - Summarize YouTube videos from their captions
//! - Run two-stage research-then-write crews for news reports and blog posts
//!
//! # Architecture
//!
//! - `config` - Settings, prompt templates and API credentials
//! - `llm` - Chat model abstraction over OpenAI, Groq and Gemini
//! - `embedding` - Embedding generation for document retrieval
//! - `document` - Text extraction, splitting and the in-memory index
//! - `youtube` - Video ids and caption transcripts
//! - `tools` - Uniform success/failure tools used by the crews
//! - `agent` - Agents and the sequential research/write pipeline
//! - `history` - Conversation history for chat and document Q&A
//! - `apps` - The individual app workflows
//!
//! # Example
//!
//! ```rust,no_run
//! use kiosk::apps::resume::{ResumeAction, ResumeAnalyzer};
//! use kiosk::config::{Credentials, Prompts, Settings};
//! use kiosk::llm::build_chat_model;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let credentials = Credentials::from_env();
//!     let model = build_chat_model(settings.resume.provider, None, &settings, &credentials)?;
//!
//!     let analyzer = ResumeAnalyzer::new(model, Prompts::from_settings(&settings)?, settings.resume.max_chars);
//!     let summary = analyzer.analyze("Rust engineer, 5 years", None, ResumeAction::Summary).await?;
//!     println!("{}", summary);
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod apps;
pub mod cli;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod history;
pub mod llm;
pub mod tools;
pub mod youtube;

pub use error::{KioskError, Result};
