//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and `factory_common`; never
//! from `crate::infra`, `crate::commands`, or `crate::output`.
//!
//! Every port is synchronous and object-safe: commands are executed one at a
//! time on a blocking thread, and handlers hold their collaborators as
//! `Arc<dyn Port>`.

use std::path::PathBuf;
use std::process::Output;
use std::time::{Duration, SystemTime};

use anyhow::Result;
use factory_common::{AgentSettings, ModelDeployment, ModelInfo};
use serde_json::Value;

// ── Server Transport Port ─────────────────────────────────────────────────────

/// HTTP access to the management server.
///
/// `endpoint` is a path such as `/api/agent/heartbeat`; implementations join
/// it to the configured server URL. Absolute `http(s)://` URLs pass through.
pub trait Transport: Send + Sync {
    /// POST a JSON body and decode the JSON response.
    ///
    /// An empty response body decodes to `Value::Null`.
    fn post_json(&self, endpoint: &str, body: &Value) -> Result<Value>;
    /// POST raw bytes as `application/octet-stream`.
    fn post_bytes(&self, endpoint: &str, body: &[u8]) -> Result<()>;
    /// GET a resource and return its body.
    fn get_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

// ── Command Collaborator Ports ────────────────────────────────────────────────

/// Applies server-pushed configuration to the inspection application.
pub trait ConfigApplier: Send + Sync {
    /// Replace the config file content.
    ///
    /// # Errors
    ///
    /// Returns an error when `content` is empty or the write fails.
    fn apply(&self, content: &str) -> Result<()>;
}

/// Lifecycle of installed inspection models.
pub trait ModelOperations: Send + Sync {
    /// Installed models, flagged with the one currently selected.
    fn list_models(&self) -> Result<Vec<ModelInfo>>;
    /// Make `model_name` the active model.
    fn change_model(&self, model_name: &str) -> Result<()>;
    /// Remove an installed model. The active model cannot be deleted.
    fn delete_model(&self, model_name: &str) -> Result<()>;
    /// Archive an installed model and return the archive bytes.
    fn download_model(&self, model_name: &str) -> Result<Vec<u8>>;
    /// Install a model from a zip archive; returns the model folder.
    fn upload_model(&self, deployment: &ModelDeployment, archive: &[u8]) -> Result<String>;
}

/// One entry of a listed log directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogDirEntry {
    pub name: String,
    pub is_directory: bool,
    pub size: u64,
    pub modified: Option<SystemTime>,
}

/// Read-only access to the inspection application's log folder.
pub trait LogFs: Send + Sync {
    /// Whole content of a file.
    fn read_bytes(&self, path: &str) -> Result<Vec<u8>>;
    /// Direct children of a directory, in no particular order.
    fn list_dir(&self, path: &str) -> Result<Vec<LogDirEntry>>;
}

/// The inspection application's config file.
pub trait ConfigFile: Send + Sync {
    fn read(&self) -> Result<String>;
    fn write(&self, content: &str) -> Result<()>;
}

// ── Host Ports ────────────────────────────────────────────────────────────────

/// Liveness of the inspection application.
pub trait ProcessProbe: Send + Sync {
    /// Whether a process with this executable name is running.
    /// Names compare case-insensitively; a full path is reduced to its file name.
    fn is_running(&self, exe_name: &str) -> bool;
}

/// Abstracts persistence of the agent settings.
pub trait SettingsStore {
    /// Load the settings, returning `None` if the agent was never configured.
    fn load(&self) -> Result<Option<AgentSettings>>;
    /// Persist the given settings.
    fn save(&self, settings: &AgentSettings) -> Result<()>;
    /// Location of the settings file.
    fn path(&self) -> Result<PathBuf>;
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
pub trait CommandRunner: Send + Sync {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    fn run_with_timeout(&self, program: &str, args: &[&str], timeout: Duration)
    -> Result<Output>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
