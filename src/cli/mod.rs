//! CLI module for Kiosk.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use crate::apps::resume::ResumeAction;
use crate::config::Provider;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Kiosk - small single-purpose LLM apps
///
/// Resume review, document Q&A, image description, food analysis, chat,
/// SQL generation, YouTube summaries and two research-then-write crews,
/// each backed by a hosted model (Gemini, Groq or OpenAI).
#[derive(Parser, Debug)]
#[command(name = "kiosk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a resume (PDF or text) against an optional job description
    Resume {
        /// Resume file (.pdf or .txt)
        file: PathBuf,

        /// What to produce: match, summary, keywords or suggestions
        #[arg(short, long, default_value = "summary")]
        action: ResumeAction,

        /// Job description text
        #[arg(short, long, conflicts_with = "job_file")]
        job: Option<String>,

        /// Read the job description from a file
        #[arg(long)]
        job_file: Option<PathBuf>,

        /// Model provider (openai, groq, gemini)
        #[arg(short, long)]
        provider: Option<Provider>,
    },

    /// Ask questions about a PDF document
    Docqa {
        /// PDF document
        file: PathBuf,

        /// Ask these questions in order instead of starting a prompt
        #[arg(short, long)]
        question: Vec<String>,

        /// Model provider for answers (openai, groq, gemini)
        #[arg(short, long)]
        provider: Option<Provider>,
    },

    /// Describe an image with a custom prompt
    Describe {
        /// Image file (.png, .jpg, .jpeg)
        image: PathBuf,

        /// What to ask about the image
        #[arg(short = 'P', long)]
        prompt: String,

        /// Model provider (openai, groq, gemini)
        #[arg(short, long)]
        provider: Option<Provider>,
    },

    /// Identify foods in an image and estimate calories
    Nutrition {
        /// Image file (.png, .jpg, .jpeg)
        image: PathBuf,

        /// Model provider (openai, groq, gemini)
        #[arg(short, long)]
        provider: Option<Provider>,
    },

    /// Start an interactive chat session
    Chat {
        /// Model provider (openai, groq, gemini)
        #[arg(short, long)]
        provider: Option<Provider>,

        /// Model to use instead of the provider default
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Create and seed the sample employees database
    SqlSetup {
        /// Database path (defaults to sql.db_path)
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Answer a question about the employees database with generated SQL
    Sql {
        /// Question in plain language
        question: String,

        /// Database path (defaults to sql.db_path)
        #[arg(long)]
        db: Option<PathBuf>,

        /// Model provider (openai, groq, gemini)
        #[arg(short, long)]
        provider: Option<Provider>,
    },

    /// Summarize a YouTube video from its transcript
    Summarize {
        /// YouTube URL or video ID
        url: String,

        /// Model provider (openai, groq, gemini)
        #[arg(short, long)]
        provider: Option<Provider>,
    },

    /// Research recent news on a topic and write a report
    News {
        /// Topic to research
        topic: String,

        /// OpenAI model for the writer
        #[arg(short, long, value_parser = ["gpt-4o-mini", "gpt-4o"])]
        model: Option<String>,

        /// Report file
        #[arg(short, long, default_value = "news_report.md")]
        output: PathBuf,
    },

    /// Turn a YouTube video's transcript into a blog post
    Blog {
        /// YouTube URL or video ID
        url: String,

        /// OpenAI model for the writer
        #[arg(short, long, value_parser = ["gpt-4o-mini", "gpt-4o"])]
        model: Option<String>,

        /// Blog post file
        #[arg(short, long, default_value = "blog.md")]
        output: PathBuf,
    },

    /// Start HTTP API server exposing the apps as JSON endpoints
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },

    /// Check credentials, tools and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
