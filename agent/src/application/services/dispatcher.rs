//! Application service: routing of server-issued commands to their handlers.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! Commands run strictly one after another; each yields exactly one result,
//! which is posted before the next command starts.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use factory_common::agent;
use serde_json::Value;

use crate::application::ports::Transport;
use crate::domain::command::{Command, CommandKind, CommandResult, Decoded, decode};
use crate::domain::error::CommandError;

/// Executes one kind of command.
///
/// Returns the `resultData` document on success. Panics are contained by the
/// dispatcher and reported like errors.
pub trait CommandHandler: Send + Sync {
    /// # Errors
    ///
    /// Returns the reason the command failed.
    fn handle(&self, data: Option<&str>) -> Result<String, CommandError>;
}

/// One handler per command kind.
pub struct HandlerSet {
    pub update_config: Box<dyn CommandHandler>,
    pub change_model: Box<dyn CommandHandler>,
    pub download_model: Box<dyn CommandHandler>,
    pub delete_model: Box<dyn CommandHandler>,
    pub upload_model: Box<dyn CommandHandler>,
    pub get_log_file_content: Box<dyn CommandHandler>,
    pub get_log_structure: Box<dyn CommandHandler>,
    pub analyze_log: Box<dyn CommandHandler>,
}

impl HandlerSet {
    #[must_use]
    pub fn get(&self, kind: CommandKind) -> &dyn CommandHandler {
        match kind {
            CommandKind::UpdateConfig => self.update_config.as_ref(),
            CommandKind::ChangeModel => self.change_model.as_ref(),
            CommandKind::DownloadModel => self.download_model.as_ref(),
            CommandKind::DeleteModel => self.delete_model.as_ref(),
            CommandKind::UploadModel => self.upload_model.as_ref(),
            CommandKind::GetLogFileContent => self.get_log_file_content.as_ref(),
            CommandKind::GetLogStructure => self.get_log_structure.as_ref(),
            CommandKind::AnalyzeLog => self.analyze_log.as_ref(),
        }
    }
}

pub struct CommandDispatcher {
    handlers: HandlerSet,
    transport: Arc<dyn Transport>,
}

impl CommandDispatcher {
    #[must_use]
    pub fn new(handlers: HandlerSet, transport: Arc<dyn Transport>) -> Self {
        Self {
            handlers,
            transport,
        }
    }

    /// Execute a heartbeat's command list in order and report every result.
    ///
    /// Entries without a usable `commandId` cannot be correlated and are
    /// skipped. Returns the results in execution order.
    pub fn process_batch(&self, commands: &[Value]) -> Vec<CommandResult> {
        let mut results = Vec::with_capacity(commands.len());
        for raw in commands {
            let Some(result) = self.execute(raw) else {
                continue;
            };
            self.report(&result);
            results.push(result);
        }
        results
    }

    /// Decode and execute one entry without reporting it.
    pub fn execute(&self, raw: &Value) -> Option<CommandResult> {
        match decode(raw) {
            Decoded::Ready(command) => Some(self.run(&command)),
            Decoded::Rejected(result) => {
                tracing::warn!(
                    command_id = result.command_id,
                    error = result.error_message.as_deref().unwrap_or_default(),
                    "command rejected"
                );
                Some(result)
            }
            Decoded::Uncorrelated(reason) => {
                tracing::warn!(%reason, "skipping command");
                None
            }
        }
    }

    fn run(&self, command: &Command) -> CommandResult {
        tracing::info!(command_id = command.id, kind = %command.kind, "executing command");
        let handler = self.handlers.get(command.kind);
        let data = command.data.as_deref();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler.handle(data)))
            .unwrap_or_else(|payload| Err(CommandError::Panicked(panic_message(&*payload))));

        match outcome {
            Ok(result_data) => {
                tracing::info!(command_id = command.id, kind = %command.kind, "command completed");
                CommandResult::completed(command.id, result_data)
            }
            Err(err) => {
                tracing::warn!(
                    command_id = command.id,
                    kind = %command.kind,
                    error = %err,
                    "command failed"
                );
                CommandResult::failed(command.id, &err)
            }
        }
    }

    /// Post a result. Delivery failures are logged and otherwise ignored.
    fn report(&self, result: &CommandResult) {
        let body = match serde_json::to_value(result.clone().into_request()) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(command_id = result.command_id, error = %e, "cannot encode result");
                return;
            }
        };
        if let Err(e) = self.transport.post_json(agent::COMMAND_RESULT, &body) {
            tracing::warn!(
                command_id = result.command_id,
                error = %format!("{e:#}"),
                "failed to deliver command result"
            );
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
