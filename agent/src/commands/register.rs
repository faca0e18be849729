//! `factory-agent register`: register this PC with the management server.

use anyhow::{Context, Result};
use clap::Args;
use dialoguer::Input;
use factory_common::{AgentSettings, DEFAULT_MODEL_VERSION};

use crate::app::AppContext;
use crate::application::ports::SettingsStore;
use crate::application::services::registration;
use crate::infra::fs::LocalLogFs;
use crate::infra::network::local_ip_address;
use crate::output::{TerminalReporter, json};

/// Arguments for the register command. Missing values are prompted for.
#[derive(Args)]
pub struct RegisterArgs {
    /// Management server URL, e.g. http://server:5000
    #[arg(long)]
    pub server_url: Option<String>,
    /// Production line number
    #[arg(long)]
    pub line_number: Option<i64>,
    /// PC number within the line
    #[arg(long)]
    pub pc_number: Option<i64>,
    /// Inspection application config file
    #[arg(long)]
    pub config_file: Option<String>,
    /// Inspection log folder
    #[arg(long)]
    pub log_folder: Option<String>,
    /// Folder holding one subfolder per model
    #[arg(long)]
    pub model_folder: Option<String>,
    /// Model version reported to the server
    #[arg(long)]
    pub model_version: Option<String>,
    /// Inspection application executable
    #[arg(long)]
    pub exe_name: Option<String>,
    /// IP address to report (detected when omitted)
    #[arg(long)]
    pub ip_address: Option<String>,
    /// Fail instead of prompting for missing values
    #[arg(long)]
    pub no_input: bool,
}

fn value<T>(given: Option<T>, prompt: &str, flag: &str, interactive: bool) -> Result<T>
where
    T: Clone + ToString + std::str::FromStr,
    <T as std::str::FromStr>::Err: std::fmt::Debug + ToString,
{
    if let Some(v) = given {
        return Ok(v);
    }
    anyhow::ensure!(interactive, "missing --{flag}");
    Input::<T>::new()
        .with_prompt(prompt)
        .interact_text()
        .with_context(|| format!("reading {flag}"))
}

/// Entry point for `factory-agent register`.
///
/// # Errors
///
/// Returns an error if a value is missing, invalid, or registration fails.
pub fn run(app: &AppContext, args: RegisterArgs) -> Result<()> {
    let previous = app.settings_store.load().ok().flatten();
    let interactive = !args.no_input && !app.json && console::user_attended();

    let server_url = value(args.server_url, "Server URL", "server-url", interactive)?;
    let settings = AgentSettings {
        pc_id: 0,
        line_number: value(args.line_number, "Line number", "line-number", interactive)?,
        pc_number: value(args.pc_number, "PC number", "pc-number", interactive)?,
        config_file_path: value(args.config_file, "Config file", "config-file", interactive)?,
        log_file_path: value(args.log_folder, "Log folder", "log-folder", interactive)?,
        model_folder_path: value(args.model_folder, "Model folder", "model-folder", interactive)?,
        model_version: args
            .model_version
            .or_else(|| previous.as_ref().map(|p| p.model_version.clone()))
            .unwrap_or_else(|| DEFAULT_MODEL_VERSION.to_string()),
        exe_name: args
            .exe_name
            .or_else(|| previous.as_ref().map(|p| p.exe_name.clone()))
            .unwrap_or_default(),
        server_url,
    };
    settings.validate()?;

    let ip = args
        .ip_address
        .unwrap_or_else(|| local_ip_address(&settings.server_url));
    let transport = app.transport(&settings);
    let reporter = TerminalReporter::new(&app.output);
    let settings = registration::register(
        transport.as_ref(),
        &LocalLogFs,
        &app.settings_store,
        &reporter,
        settings,
        ip,
    )?;

    if app.json {
        json::print(&settings)?;
    }
    Ok(())
}
