//! `factory-agent config`: show the persisted agent settings.

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::SettingsStore;
use crate::output::json;

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current settings
    Show,
    /// Print the settings file location
    Path,
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error if the settings file exists but cannot be read.
pub fn run(app: &AppContext, cmd: &ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => show(app),
        ConfigCommand::Path => {
            let path = app.settings_store.path()?;
            if app.json {
                json::print(&serde_json::json!({ "path": path }))?;
            } else {
                println!("{}", path.display());
            }
            Ok(())
        }
    }
}

fn show(app: &AppContext) -> Result<()> {
    let settings = app.settings_store.load()?;
    if app.json {
        return json::print(&settings);
    }

    let Some(s) = settings else {
        app.output
            .warn("Agent is not configured. Run 'factory-agent register' first.");
        return Ok(());
    };
    let out = &app.output;
    out.header("Agent settings");
    out.kv("pcId           ", &s.pc_id.to_string());
    out.kv("serverUrl      ", &s.server_url);
    out.kv("lineNumber     ", &s.line_number.to_string());
    out.kv("pcNumber       ", &s.pc_number.to_string());
    out.kv("configFilePath ", &s.config_file_path);
    out.kv("logFilePath    ", &s.log_file_path);
    out.kv("modelFolderPath", &s.model_folder_path);
    out.kv("modelVersion   ", &s.model_version);
    out.kv("exeName        ", &s.exe_name);
    if !s.is_registered() {
        out.warn("not registered yet");
    }
    Ok(())
}
