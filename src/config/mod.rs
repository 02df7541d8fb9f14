//! Configuration module for Kiosk.
//!
//! Handles loading application settings, prompt templates, and API credentials.

pub mod credentials;
mod prompts;
mod settings;

pub use credentials::Credentials;
pub use prompts::{
    vars, CrewPrompts, DocumentPrompts, Prompts, ResumePrompts, SqlPrompts, SummaryPrompts,
    VisionPrompts,
};
pub use settings::{
    AppSettings, DocumentSettings, GeneralSettings, NewsSettings, PromptSettings, Provider,
    ProviderEndpoint, ProviderSettings, ResumeSettings, Settings, SqlSettings, YoutubeSettings,
};
