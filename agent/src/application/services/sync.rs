//! Application service: keeping the server's view of this PC current.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! Every sync remembers what it last sent and only posts on change.

use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use factory_common::{
    ConfigUpdateRequest, LogContentSyncRequest, LogStructureSyncRequest, ModelSyncRequest, agent,
};

use crate::application::ports::{ConfigApplier, ConfigFile, LogFs, ModelOperations, Transport};
use crate::application::services::log_service;
use crate::domain::paths::resolve_log_path;

/// Last payload sent for one kind of sync.
#[derive(Default)]
struct LastSent(Mutex<Option<String>>);

impl LastSent {
    fn is_current(&self, payload: &str) -> bool {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_deref()
            == Some(payload)
    }

    fn record(&self, payload: String) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = Some(payload);
    }
}

// ── Config ───────────────────────────────────────────────────────────────────

/// Two-way sync of the inspection application's config file.
pub struct ConfigService {
    pc_id: i64,
    file: Arc<dyn ConfigFile>,
    transport: Arc<dyn Transport>,
    last: LastSent,
}

impl ConfigService {
    #[must_use]
    pub fn new(pc_id: i64, file: Arc<dyn ConfigFile>, transport: Arc<dyn Transport>) -> Self {
        Self {
            pc_id,
            file,
            transport,
            last: LastSent::default(),
        }
    }

    /// Post the config file if it changed since the last sync or apply.
    /// Returns whether anything was sent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the post fails.
    pub fn sync_to_server(&self) -> Result<bool> {
        let content = self.file.read().context("reading config file")?;
        if self.last.is_current(&content) {
            return Ok(false);
        }
        let body = serde_json::to_value(ConfigUpdateRequest {
            pc_id: self.pc_id,
            config_content: content.clone(),
        })?;
        self.transport
            .post_json(agent::UPDATE_CONFIG, &body)
            .context("posting config")?;
        tracing::info!(bytes = content.len(), "config synced");
        self.last.record(content);
        Ok(true)
    }
}

impl ConfigApplier for ConfigService {
    fn apply(&self, content: &str) -> Result<()> {
        anyhow::ensure!(!content.is_empty(), "config content is empty");
        self.file.write(content).context("writing config file")?;
        // Server already has this content; do not echo it back.
        self.last.record(content.to_string());
        tracing::info!(bytes = content.len(), "config applied");
        Ok(())
    }
}

// ── Inventory ────────────────────────────────────────────────────────────────

/// Sync of the log folder tree, the current log file, and the installed models.
pub struct InventorySync {
    pc_id: i64,
    log_root: String,
    log_fs: Arc<dyn LogFs>,
    models: Arc<dyn ModelOperations>,
    transport: Arc<dyn Transport>,
    last_structure: LastSent,
    last_log: LastSent,
    last_models: LastSent,
}

impl InventorySync {
    #[must_use]
    pub fn new(
        pc_id: i64,
        log_root: String,
        log_fs: Arc<dyn LogFs>,
        models: Arc<dyn ModelOperations>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            pc_id,
            log_root,
            log_fs,
            models,
            transport,
            last_structure: LastSent::default(),
            last_log: LastSent::default(),
            last_models: LastSent::default(),
        }
    }

    /// Post the log tree if it changed. Returns whether anything was sent.
    ///
    /// # Errors
    ///
    /// Returns an error if the post fails.
    pub fn sync_log_structure(&self) -> Result<bool> {
        let tree = log_service::log_structure(self.log_fs.as_ref(), &self.log_root);
        let json = serde_json::to_string(&tree)?;
        if self.last_structure.is_current(&json) {
            return Ok(false);
        }
        let body = serde_json::to_value(LogStructureSyncRequest {
            pc_id: self.pc_id,
            log_structure_json: json.clone(),
        })?;
        self.transport
            .post_json(agent::SYNC_LOG_STRUCTURE, &body)
            .context("posting log structure")?;
        tracing::info!(entries = tree.len(), "log structure synced");
        self.last_structure.record(json);
        Ok(true)
    }

    /// Post the first non-empty file at the top of the log folder (by name)
    /// if it changed. Returns whether anything was sent; a missing folder or
    /// a folder without readable content sends nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the post fails.
    pub fn sync_log_content(&self) -> Result<bool> {
        let Ok(mut entries) = self.log_fs.list_dir(&self.log_root) else {
            return Ok(false);
        };
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        let found = entries
            .into_iter()
            .filter(|e| !e.is_directory)
            .find_map(|e| {
                let path = resolve_log_path(&self.log_root, &e.name);
                log_service::read_file_content(self.log_fs.as_ref(), &path)
                    .ok()
                    .filter(|c| !c.content.is_empty())
                    .map(|c| (e.name, c.content))
            });
        let Some((log_file_name, log_content)) = found else {
            return Ok(false);
        };

        let request = LogContentSyncRequest {
            pc_id: self.pc_id,
            log_content,
            log_file_name,
        };
        let json = serde_json::to_string(&request)?;
        if self.last_log.is_current(&json) {
            return Ok(false);
        }
        self.transport
            .post_json(agent::UPDATE_LOG, &serde_json::to_value(&request)?)
            .context("posting log content")?;
        tracing::info!(
            file = %request.log_file_name,
            bytes = request.log_content.len(),
            "log content synced"
        );
        self.last_log.record(json);
        Ok(true)
    }

    /// Post the installed models if they changed. Returns whether anything
    /// was sent.
    ///
    /// # Errors
    ///
    /// Returns an error if the models cannot be listed or the post fails.
    pub fn sync_models(&self) -> Result<bool> {
        let models = self.models.list_models().context("listing models")?;
        let json = serde_json::to_string(&models)?;
        if self.last_models.is_current(&json) {
            return Ok(false);
        }
        let count = models.len();
        let body = serde_json::to_value(ModelSyncRequest {
            pc_id: self.pc_id,
            models,
        })?;
        self.transport
            .post_json(agent::SYNC_MODELS, &body)
            .context("posting models")?;
        tracing::info!(models = count, "models synced");
        self.last_models.record(json);
        Ok(true)
    }
}
