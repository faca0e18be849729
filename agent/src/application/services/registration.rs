//! Application service: registering this PC with the management server.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::{Context, Result};
use factory_common::{AgentRegistrationRequest, AgentRegistrationResponse, AgentSettings, agent};

use crate::application::ports::{LogFs, ProgressReporter, SettingsStore, Transport};
use crate::application::services::log_service;

/// Register with the server and persist the assigned `pcId`.
///
/// Steps:
/// 1. Validate the operator-supplied settings
/// 2. Snapshot the log folder tree
/// 3. Post the registration and store the returned `pcId`
///
/// # Errors
///
/// Returns an error if the settings are invalid, the server is unreachable,
/// rejects the registration, or the settings cannot be saved.
pub fn register(
    transport: &dyn Transport,
    log_fs: &dyn LogFs,
    store: &dyn SettingsStore,
    reporter: &impl ProgressReporter,
    mut settings: AgentSettings,
    ip_address: String,
) -> Result<AgentSettings> {
    settings.validate()?;

    reporter.step("reading log folder...");
    let tree = log_service::log_structure(log_fs, &settings.log_file_path);
    if tree.is_empty() {
        reporter.warn(&format!("log folder {} is empty or missing", settings.log_file_path));
    }

    let request = AgentRegistrationRequest {
        line_number: settings.line_number,
        pc_number: settings.pc_number,
        ip_address,
        config_file_path: settings.config_file_path.clone(),
        log_folder_path: settings.log_file_path.clone(),
        model_folder_path: settings.model_folder_path.clone(),
        model_version: settings.model_version.clone(),
        exe_name: settings.exe_name.clone(),
        log_structure_json: serde_json::to_string(&tree)?,
    };

    reporter.step(&format!("registering with {}...", settings.server_url));
    let reply = transport
        .post_json(agent::REGISTER, &serde_json::to_value(&request)?)
        .context("registration request failed")?;
    let response: AgentRegistrationResponse =
        serde_json::from_value(reply).context("invalid registration response")?;

    anyhow::ensure!(
        response.success && response.pc_id > 0,
        "registration rejected: {}",
        if response.message.is_empty() {
            "no reason given"
        } else {
            response.message.as_str()
        }
    );

    settings.pc_id = response.pc_id;
    store.save(&settings).context("saving settings")?;
    tracing::info!(pc_id = settings.pc_id, "registered");
    reporter.success(&format!("registered as PC {}", settings.pc_id));
    Ok(settings)
}
