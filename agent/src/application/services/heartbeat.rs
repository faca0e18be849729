//! Application service: one heartbeat cycle.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! A cycle reports liveness, executes the commands the server returned, then
//! pushes whatever changed on this PC. Only the heartbeat itself can fail the
//! cycle; sync failures are logged.

use std::sync::Arc;

use anyhow::{Context, Result};
use factory_common::{HeartbeatRequest, HeartbeatResponse, agent};

use crate::application::ports::{ProcessProbe, Transport};
use crate::application::services::dispatcher::CommandDispatcher;
use crate::application::services::sync::{ConfigService, InventorySync};

/// Outcome of one cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub application_running: bool,
    pub commands_received: usize,
    pub completed: usize,
    pub failed: usize,
}

/// Everything a running agent needs between cycles.
pub struct AgentRuntime {
    pub pc_id: i64,
    pub exe_name: String,
    pub transport: Arc<dyn Transport>,
    pub probe: Arc<dyn ProcessProbe>,
    pub dispatcher: CommandDispatcher,
    pub config: Arc<ConfigService>,
    pub inventory: InventorySync,
}

impl AgentRuntime {
    /// Send one heartbeat and return the server's answer.
    ///
    /// # Errors
    ///
    /// Returns an error if the post fails or the server reports failure.
    pub fn heartbeat(&self, application_running: bool) -> Result<HeartbeatResponse> {
        let body = serde_json::to_value(HeartbeatRequest {
            pc_id: self.pc_id,
            is_application_running: application_running,
        })?;
        let reply = self
            .transport
            .post_json(agent::HEARTBEAT, &body)
            .context("heartbeat failed")?;
        let response: HeartbeatResponse =
            serde_json::from_value(reply).context("invalid heartbeat response")?;
        anyhow::ensure!(response.success, "server rejected heartbeat");
        Ok(response)
    }

    /// Run one full cycle.
    ///
    /// # Errors
    ///
    /// Returns an error only if the heartbeat fails; no command runs then.
    pub fn run_cycle(&self) -> Result<CycleReport> {
        let application_running = !self.exe_name.is_empty() && self.probe.is_running(&self.exe_name);
        let response = self.heartbeat(application_running)?;

        let mut report = CycleReport {
            application_running,
            commands_received: response.commands.len(),
            ..CycleReport::default()
        };
        if !response.commands.is_empty() {
            tracing::info!(count = response.commands.len(), "received commands");
            let results = self.dispatcher.process_batch(&response.commands);
            report.completed = results.iter().filter(|r| r.is_completed()).count();
            report.failed = results.len() - report.completed;
        }

        self.sync_all();
        Ok(report)
    }

    /// Push config, log tree, current log file, and models where they changed.
    pub fn sync_all(&self) {
        if let Err(e) = self.config.sync_to_server() {
            tracing::warn!(error = %format!("{e:#}"), "config sync failed");
        }
        if let Err(e) = self.inventory.sync_log_structure() {
            tracing::warn!(error = %format!("{e:#}"), "log structure sync failed");
        }
        if let Err(e) = self.inventory.sync_log_content() {
            tracing::warn!(error = %format!("{e:#}"), "log content sync failed");
        }
        if let Err(e) = self.inventory.sync_models() {
            tracing::warn!(error = %format!("{e:#}"), "model sync failed");
        }
    }
}
