use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Model version reported when the operator never chose one.
pub const DEFAULT_MODEL_VERSION: &str = "3.5";

/// Persisted agent settings (`settings.json`).
///
/// Written once by `factory-agent register` and read on every start.
/// `pcId` stays 0 until the server accepted the registration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AgentSettings {
    #[serde(default)]
    pub pc_id: i64,
    pub line_number: i64,
    pub pc_number: i64,
    /// Config file of the inspection application, synced both ways.
    pub config_file_path: String,
    /// Root folder of the inspection application's logs.
    pub log_file_path: String,
    /// Folder holding one subfolder per installed model.
    pub model_folder_path: String,
    #[serde(default = "default_model_version")]
    pub model_version: String,
    pub server_url: String,
    /// Executable whose liveness is reported in heartbeats.
    #[serde(default)]
    pub exe_name: String,
}

fn default_model_version() -> String {
    DEFAULT_MODEL_VERSION.to_string()
}

/// Errors for invalid or incomplete settings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Agent is not registered. Run 'factory-agent register' first.")]
    NotRegistered,

    #[error("Invalid server URL '{0}': must start with http:// or https://")]
    InvalidServerUrl(String),

    #[error("Invalid {field}: {value} (must be a positive number)")]
    NonPositive { field: &'static str, value: i64 },

    #[error("Missing {0}")]
    MissingPath(&'static str),
}

impl AgentSettings {
    /// Check the values an operator typed in before they are persisted.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.server_url.starts_with("http://") || self.server_url.starts_with("https://")) {
            return Err(SettingsError::InvalidServerUrl(self.server_url.clone()));
        }
        if self.line_number <= 0 {
            return Err(SettingsError::NonPositive {
                field: "lineNumber",
                value: self.line_number,
            });
        }
        if self.pc_number <= 0 {
            return Err(SettingsError::NonPositive {
                field: "pcNumber",
                value: self.pc_number,
            });
        }
        for (field, value) in [
            ("configFilePath", &self.config_file_path),
            ("logFilePath", &self.log_file_path),
            ("modelFolderPath", &self.model_folder_path),
        ] {
            if value.trim().is_empty() {
                return Err(SettingsError::MissingPath(field));
            }
        }
        Ok(())
    }

    /// Whether the server has assigned a `pcId`.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.pc_id > 0
    }
}
