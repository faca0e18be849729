//! `factory-agent read-log`: print a log file the way the server receives it.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::SettingsStore;
use crate::application::services::log_service;
use crate::domain::paths::resolve_log_path;
use crate::infra::fs::LocalLogFs;

/// Arguments for the read-log command.
#[derive(Args)]
pub struct ReadLogArgs {
    /// Log file; relative paths resolve against the configured log folder
    pub path: String,
}

/// Entry point for `factory-agent read-log`.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn run(app: &AppContext, args: &ReadLogArgs) -> Result<()> {
    let log_root = app
        .settings_store
        .load()
        .ok()
        .flatten()
        .map(|s| s.log_file_path)
        .unwrap_or_default();
    let path = resolve_log_path(&log_root, &args.path);

    let content = log_service::read_file_content(&LocalLogFs, &path)?;
    if app.json {
        crate::output::json::print(&content)?;
    } else {
        print!("{}", content.content);
    }
    Ok(())
}
