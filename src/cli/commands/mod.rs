//! CLI command implementations.

mod chat;
mod config;
mod crew;
mod docqa;
mod doctor;
mod resume;
mod serve;
mod sql;
mod summarize;
mod vision;

pub use chat::run_chat;
pub use config::run_config;
pub use crew::{run_blog, run_news};
pub use docqa::run_docqa;
pub use doctor::run_doctor;
pub use resume::run_resume;
pub use serve::run_serve;
pub use sql::{run_sql, run_sql_setup};
pub use summarize::run_summarize;
pub use vision::{run_describe, run_nutrition};

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Credentials;

/// Run pre-flight checks, pointing at `kiosk doctor` when they fail.
fn ensure_ready(operation: Operation<'_>, credentials: &Credentials) -> anyhow::Result<()> {
    if let Err(e) = preflight::check(operation, credentials) {
        Output::error(&format!("{}", e));
        Output::info("Run 'kiosk doctor' for detailed diagnostics.");
        return Err(e.into());
    }
    Ok(())
}
