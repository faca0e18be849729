//! Application service: the command handlers bound to each command kind.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! Handlers validate their command data, delegate to a port, and render the
//! `resultData` document.

use std::sync::Arc;

use factory_common::endpoints;
use serde_json::json;

use crate::application::ports::{ConfigApplier, LogFs, ModelOperations, Transport};
use crate::application::services::dispatcher::{CommandHandler, HandlerSet};
use crate::application::services::log_service;
use crate::domain::command;
use crate::domain::error::CommandError;
use crate::domain::log_analysis::AnalysisOptions;
use crate::domain::paths::resolve_log_path;

/// Collaborators shared by the standard handlers.
#[derive(Clone)]
pub struct HandlerContext {
    pub pc_id: i64,
    /// Root folder relative log paths resolve against.
    pub log_root: String,
    pub transport: Arc<dyn Transport>,
    pub config: Arc<dyn ConfigApplier>,
    pub models: Arc<dyn ModelOperations>,
    pub log_fs: Arc<dyn LogFs>,
    pub analysis: AnalysisOptions,
}

/// Bind every command kind to its standard handler.
#[must_use]
pub fn standard_handlers(ctx: &HandlerContext) -> HandlerSet {
    HandlerSet {
        update_config: Box::new(UpdateConfigHandler {
            config: Arc::clone(&ctx.config),
        }),
        change_model: Box::new(ChangeModelHandler {
            models: Arc::clone(&ctx.models),
        }),
        download_model: Box::new(DownloadModelHandler {
            pc_id: ctx.pc_id,
            models: Arc::clone(&ctx.models),
            transport: Arc::clone(&ctx.transport),
        }),
        delete_model: Box::new(DeleteModelHandler {
            models: Arc::clone(&ctx.models),
        }),
        upload_model: Box::new(UploadModelHandler {
            models: Arc::clone(&ctx.models),
            transport: Arc::clone(&ctx.transport),
        }),
        get_log_file_content: Box::new(LogFileContentHandler {
            log_root: ctx.log_root.clone(),
            fs: Arc::clone(&ctx.log_fs),
        }),
        get_log_structure: Box::new(LogStructureHandler {
            log_root: ctx.log_root.clone(),
            fs: Arc::clone(&ctx.log_fs),
        }),
        analyze_log: Box::new(AnalyzeLogHandler {
            options: ctx.analysis,
        }),
    }
}

// ── Config ───────────────────────────────────────────────────────────────────

pub struct UpdateConfigHandler {
    pub config: Arc<dyn ConfigApplier>,
}

impl CommandHandler for UpdateConfigHandler {
    fn handle(&self, data: Option<&str>) -> Result<String, CommandError> {
        self.config
            .apply(data.unwrap_or_default())
            .map_err(|e| CommandError::fault(&e))?;
        Ok(json!({ "success": true, "message": "Config updated" }).to_string())
    }
}

// ── Models ───────────────────────────────────────────────────────────────────

pub struct ChangeModelHandler {
    pub models: Arc<dyn ModelOperations>,
}

impl CommandHandler for ChangeModelHandler {
    fn handle(&self, data: Option<&str>) -> Result<String, CommandError> {
        let name = command::model_name(data)?;
        self.models
            .change_model(&name)
            .map_err(|e| CommandError::fault(&e))?;
        Ok(json!({ "success": true, "modelName": name }).to_string())
    }
}

pub struct DeleteModelHandler {
    pub models: Arc<dyn ModelOperations>,
}

impl CommandHandler for DeleteModelHandler {
    fn handle(&self, data: Option<&str>) -> Result<String, CommandError> {
        let name = command::model_name(data)?;
        self.models
            .delete_model(&name)
            .map_err(|e| CommandError::fault(&e))?;
        Ok(json!({ "success": true, "modelName": name }).to_string())
    }
}

/// Archives a model and uploads the archive to the server.
pub struct DownloadModelHandler {
    pub pc_id: i64,
    pub models: Arc<dyn ModelOperations>,
    pub transport: Arc<dyn Transport>,
}

impl CommandHandler for DownloadModelHandler {
    fn handle(&self, data: Option<&str>) -> Result<String, CommandError> {
        let name = command::model_name(data)?;
        let archive = self
            .models
            .download_model(&name)
            .map_err(|e| CommandError::fault(&e))?;
        self.transport
            .post_bytes(&endpoints::model_archive(self.pc_id, &name), &archive)
            .map_err(|e| CommandError::fault(&e))?;
        Ok(json!({ "success": true, "modelName": name, "size": archive.len() }).to_string())
    }
}

/// Fetches a model archive from the server and installs it.
pub struct UploadModelHandler {
    pub models: Arc<dyn ModelOperations>,
    pub transport: Arc<dyn Transport>,
}

impl CommandHandler for UploadModelHandler {
    fn handle(&self, data: Option<&str>) -> Result<String, CommandError> {
        let deployment = command::deployment(data)?;
        let archive = self
            .transport
            .get_bytes(&deployment.download_url)
            .map_err(|e| CommandError::fault(&e))?;
        let model_path = self
            .models
            .upload_model(&deployment, &archive)
            .map_err(|e| CommandError::fault(&e))?;
        if deployment.apply_on_upload {
            self.models
                .change_model(&deployment.model_name)
                .map_err(|e| CommandError::fault(&e))?;
        }
        Ok(json!({
            "success": true,
            "modelName": deployment.model_name,
            "modelPath": model_path,
            "applied": deployment.apply_on_upload,
        })
        .to_string())
    }
}

// ── Logs ─────────────────────────────────────────────────────────────────────

pub struct LogFileContentHandler {
    pub log_root: String,
    pub fs: Arc<dyn LogFs>,
}

impl CommandHandler for LogFileContentHandler {
    fn handle(&self, data: Option<&str>) -> Result<String, CommandError> {
        let requested = command::log_file_path(data)?;
        let path = resolve_log_path(&self.log_root, &requested);
        let content = log_service::read_file_content(self.fs.as_ref(), &path)?;
        serde_json::to_string(&content).map_err(|e| CommandError::Fault(e.to_string()))
    }
}

pub struct LogStructureHandler {
    pub log_root: String,
    pub fs: Arc<dyn LogFs>,
}

impl CommandHandler for LogStructureHandler {
    fn handle(&self, data: Option<&str>) -> Result<String, CommandError> {
        let root = command::log_root_override(data)?.unwrap_or_else(|| self.log_root.clone());
        let files = log_service::log_structure(self.fs.as_ref(), &root);
        Ok(log_service::structure_response(&files).to_string())
    }
}

pub struct AnalyzeLogHandler {
    pub options: AnalysisOptions,
}

impl CommandHandler for AnalyzeLogHandler {
    fn handle(&self, data: Option<&str>) -> Result<String, CommandError> {
        let content = command::analysis_content(data)
            .map_err(|e| CommandError::AnalysisFailed(e.to_string()))?;
        log_service::analyze_content(&content, self.options)
    }
}
