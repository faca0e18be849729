//! Application context: unified state passed to every command handler.
//!
//! `AppContext` carries the output flags, the settings store, and the runtime
//! tuning read from `FACTORY_AGENT_*` environment variables.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use factory_common::AgentSettings;
use serde::Deserialize;

use crate::application::ports::{ConfigFile, LogFs, ModelOperations, ProcessProbe, Transport};
use crate::application::services::dispatcher::CommandDispatcher;
use crate::application::services::handlers::{HandlerContext, standard_handlers};
use crate::application::services::heartbeat::AgentRuntime;
use crate::application::services::sync::{ConfigService, InventorySync};
use crate::domain::log_analysis::AnalysisOptions;
use crate::infra::command_runner::StdCommandRunner;
use crate::infra::fs::{LocalConfigFile, LocalLogFs};
use crate::infra::http::UreqTransport;
use crate::infra::models::FsModelStore;
use crate::infra::process::SystemProcessProbe;
use crate::infra::settings::JsonSettingsStore;
use crate::output::OutputContext;

// ── Runtime configuration ────────────────────────────────────────────────────

/// Runtime tuning loaded from environment variables via `envy`.
///
/// Each field maps to `FACTORY_AGENT_<FIELD>`:
///   - `FACTORY_AGENT_HEARTBEAT_INTERVAL_SECS`     (default `30`)
///   - `FACTORY_AGENT_HTTP_TIMEOUT_SECS`           (default `10`)
///   - `FACTORY_AGENT_REPORT_INCOMPLETE_OPERATIONS` (default `false`)
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RuntimeConfig {
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_secs: u64,

    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    /// Report STARTs without END in `AnalyzeLog` responses.
    #[serde(default)]
    pub report_incomplete_operations: bool,
}

fn default_heartbeat_interval() -> u64 {
    30
}

fn default_http_timeout() -> u64 {
    10
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval_secs: default_heartbeat_interval(),
            http_timeout_secs: default_http_timeout(),
            report_incomplete_operations: false,
        }
    }
}

impl RuntimeConfig {
    /// Environment variable prefix.
    pub const PREFIX: &'static str = "FACTORY_AGENT_";

    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let config: Self = envy::prefixed(Self::PREFIX)
            .from_env()
            .context("invalid FACTORY_AGENT_* environment variable")?;
        anyhow::ensure!(
            config.heartbeat_interval_secs > 0,
            "FACTORY_AGENT_HEARTBEAT_INTERVAL_SECS must be positive"
        );
        Ok(config)
    }

    #[must_use]
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }

    #[must_use]
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs.max(1))
    }

    #[must_use]
    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            report_incomplete: self.report_incomplete_operations,
        }
    }
}

// ── Context ──────────────────────────────────────────────────────────────────

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    pub no_color: bool,
    pub quiet: bool,
    pub json: bool,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Machine-readable output requested.
    pub json: bool,
    pub settings_store: JsonSettingsStore,
    pub runtime: RuntimeConfig,
}

impl AppContext {
    /// # Errors
    ///
    /// Returns an error if the runtime environment variables are invalid.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        Ok(Self {
            output: OutputContext::new(flags.no_color, flags.quiet || flags.json),
            json: flags.json,
            settings_store: JsonSettingsStore,
            runtime: RuntimeConfig::from_env()?,
        })
    }

    /// Transport to the server named in `settings`.
    #[must_use]
    pub fn transport(&self, settings: &AgentSettings) -> Arc<dyn Transport> {
        Arc::new(UreqTransport::new(
            &settings.server_url,
            self.runtime.http_timeout(),
        ))
    }

    /// Wire the production ports into a ready-to-run agent.
    #[must_use]
    pub fn build_runtime(&self, settings: &AgentSettings) -> AgentRuntime {
        let transport = self.transport(settings);
        let config_file: Arc<dyn ConfigFile> =
            Arc::new(LocalConfigFile::new(&settings.config_file_path));
        let log_fs: Arc<dyn LogFs> = Arc::new(LocalLogFs);
        let models: Arc<dyn ModelOperations> = Arc::new(FsModelStore::new(
            &settings.model_folder_path,
            Arc::clone(&config_file),
            StdCommandRunner::default(),
        ));
        let probe: Arc<dyn ProcessProbe> =
            Arc::new(SystemProcessProbe::new(StdCommandRunner::default()));

        let config = Arc::new(ConfigService::new(
            settings.pc_id,
            config_file,
            Arc::clone(&transport),
        ));
        let handlers = standard_handlers(&HandlerContext {
            pc_id: settings.pc_id,
            log_root: settings.log_file_path.clone(),
            transport: Arc::clone(&transport),
            config: config.clone(),
            models: Arc::clone(&models),
            log_fs: Arc::clone(&log_fs),
            analysis: self.runtime.analysis_options(),
        });
        let inventory = InventorySync::new(
            settings.pc_id,
            settings.log_file_path.clone(),
            log_fs,
            models,
            Arc::clone(&transport),
        );

        AgentRuntime {
            pc_id: settings.pc_id,
            exe_name: settings.exe_name.clone(),
            dispatcher: CommandDispatcher::new(handlers, Arc::clone(&transport)),
            transport,
            probe,
            config,
            inventory,
        }
    }
}
