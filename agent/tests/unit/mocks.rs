//! Shared in-memory port implementations for unit tests.
//!
//! Each mock records what the service under test did so assertions can be
//! made without touching the network or the disk.

#![allow(dead_code, clippy::expect_used, clippy::unwrap_used)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use factory_agent::application::ports::{
    ConfigApplier, ConfigFile, LogDirEntry, LogFs, ModelOperations, ProcessProbe,
    ProgressReporter, SettingsStore, Transport,
};
use factory_agent::application::services::dispatcher::{CommandHandler, HandlerSet};
use factory_agent::domain::CommandError;
use factory_common::{AgentSettings, ModelDeployment, ModelInfo};
use serde_json::Value;

// ── Transport ─────────────────────────────────────────────────────────────────

/// Records every request; answers JSON posts from a per-endpoint table.
#[derive(Default)]
pub struct RecordingTransport {
    pub posts: Mutex<Vec<(String, Value)>>,
    pub byte_posts: Mutex<Vec<(String, Vec<u8>)>>,
    pub replies: Mutex<HashMap<String, Value>>,
    pub downloads: Mutex<HashMap<String, Vec<u8>>>,
    /// Endpoints whose posts fail.
    pub failing: Mutex<Vec<String>>,
}

impl RecordingTransport {
    pub fn reply(&self, endpoint: &str, body: Value) {
        self.replies
            .lock()
            .unwrap()
            .insert(endpoint.to_string(), body);
    }

    pub fn fail(&self, endpoint: &str) {
        self.failing.lock().unwrap().push(endpoint.to_string());
    }

    pub fn posts_to(&self, endpoint: &str) -> Vec<Value> {
        self.posts
            .lock()
            .unwrap()
            .iter()
            .filter(|(e, _)| e == endpoint)
            .map(|(_, v)| v.clone())
            .collect()
    }
}

impl Transport for RecordingTransport {
    fn post_json(&self, endpoint: &str, body: &Value) -> Result<Value> {
        self.posts
            .lock()
            .unwrap()
            .push((endpoint.to_string(), body.clone()));
        if self.failing.lock().unwrap().iter().any(|e| e == endpoint) {
            anyhow::bail!("{endpoint}: HTTP 500");
        }
        Ok(self
            .replies
            .lock()
            .unwrap()
            .get(endpoint)
            .cloned()
            .unwrap_or(Value::Null))
    }

    fn post_bytes(&self, endpoint: &str, body: &[u8]) -> Result<()> {
        self.byte_posts
            .lock()
            .unwrap()
            .push((endpoint.to_string(), body.to_vec()));
        Ok(())
    }

    fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        self.downloads
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("{url}: HTTP 404"))
    }
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// Returns a fixed document and counts its calls.
#[derive(Clone)]
pub struct StaticHandler {
    pub reply: String,
    pub calls: Arc<AtomicUsize>,
    pub seen: Arc<Mutex<Vec<Option<String>>>>,
}

impl StaticHandler {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CommandHandler for StaticHandler {
    fn handle(&self, data: Option<&str>) -> Result<String, CommandError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(data.map(str::to_string));
        Ok(self.reply.clone())
    }
}

pub struct FailingHandler(pub CommandError);

impl CommandHandler for FailingHandler {
    fn handle(&self, _: Option<&str>) -> Result<String, CommandError> {
        Err(self.0.clone())
    }
}

pub struct PanickingHandler;

impl CommandHandler for PanickingHandler {
    fn handle(&self, _: Option<&str>) -> Result<String, CommandError> {
        panic!("boom");
    }
}

/// Handler set where every kind is served by a clone of `handler`.
pub fn uniform_handlers(handler: &StaticHandler) -> HandlerSet {
    HandlerSet {
        update_config: Box::new(handler.clone()),
        change_model: Box::new(handler.clone()),
        download_model: Box::new(handler.clone()),
        delete_model: Box::new(handler.clone()),
        upload_model: Box::new(handler.clone()),
        get_log_file_content: Box::new(handler.clone()),
        get_log_structure: Box::new(handler.clone()),
        analyze_log: Box::new(handler.clone()),
    }
}

// ── Config ────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryConfigFile {
    pub content: Mutex<String>,
    pub writes: AtomicUsize,
}

impl MemoryConfigFile {
    pub fn with(content: &str) -> Self {
        Self {
            content: Mutex::new(content.to_string()),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn set(&self, content: &str) {
        *self.content.lock().unwrap() = content.to_string();
    }
}

impl ConfigFile for MemoryConfigFile {
    fn read(&self) -> Result<String> {
        Ok(self.content.lock().unwrap().clone())
    }

    fn write(&self, content: &str) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.set(content);
        Ok(())
    }
}

/// Records applied config content.
#[derive(Default)]
pub struct RecordingApplier {
    pub applied: Mutex<Vec<String>>,
}

impl ConfigApplier for RecordingApplier {
    fn apply(&self, content: &str) -> Result<()> {
        anyhow::ensure!(!content.is_empty(), "config content is empty");
        self.applied.lock().unwrap().push(content.to_string());
        Ok(())
    }
}

// ── Models ────────────────────────────────────────────────────────────────────

/// Installed models by name plus the active one.
#[derive(Default)]
pub struct MemoryModels {
    pub installed: Mutex<Vec<String>>,
    pub current: Mutex<Option<String>>,
    pub uploads: Mutex<Vec<(String, usize)>>,
}

impl MemoryModels {
    pub fn with(installed: &[&str], current: Option<&str>) -> Self {
        Self {
            installed: Mutex::new(installed.iter().map(ToString::to_string).collect()),
            current: Mutex::new(current.map(str::to_string)),
            uploads: Mutex::new(Vec::new()),
        }
    }

    fn ensure_installed(&self, name: &str) -> Result<()> {
        anyhow::ensure!(
            self.installed.lock().unwrap().iter().any(|m| m == name),
            "model '{name}' is not installed"
        );
        Ok(())
    }
}

impl ModelOperations for MemoryModels {
    fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let current = self.current.lock().unwrap().clone();
        Ok(self
            .installed
            .lock()
            .unwrap()
            .iter()
            .map(|name| ModelInfo {
                model_name: name.clone(),
                model_path: format!(r"C:\Models\{name}"),
                is_current: current.as_deref() == Some(name.as_str()),
            })
            .collect())
    }

    fn change_model(&self, model_name: &str) -> Result<()> {
        self.ensure_installed(model_name)?;
        *self.current.lock().unwrap() = Some(model_name.to_string());
        Ok(())
    }

    fn delete_model(&self, model_name: &str) -> Result<()> {
        self.ensure_installed(model_name)?;
        anyhow::ensure!(
            self.current.lock().unwrap().as_deref() != Some(model_name),
            "cannot delete the active model '{model_name}'"
        );
        self.installed.lock().unwrap().retain(|m| m != model_name);
        Ok(())
    }

    fn download_model(&self, model_name: &str) -> Result<Vec<u8>> {
        self.ensure_installed(model_name)?;
        Ok(format!("zip:{model_name}").into_bytes())
    }

    fn upload_model(&self, deployment: &ModelDeployment, archive: &[u8]) -> Result<String> {
        let name = deployment.model_name.clone();
        self.uploads
            .lock()
            .unwrap()
            .push((name.clone(), archive.len()));
        self.installed.lock().unwrap().push(name.clone());
        Ok(format!(r"C:\Models\{name}"))
    }
}

// ── Log folder ────────────────────────────────────────────────────────────────

/// In-memory log folder keyed by full path.
#[derive(Default)]
pub struct MemoryLogFs {
    pub files: HashMap<String, Vec<u8>>,
    pub dirs: HashMap<String, Vec<LogDirEntry>>,
}

impl MemoryLogFs {
    pub fn file(mut self, path: &str, content: &str) -> Self {
        self.files
            .insert(path.to_string(), content.as_bytes().to_vec());
        self
    }

    pub fn dir(mut self, path: &str, entries: &[(&str, bool)]) -> Self {
        self.dirs.insert(
            path.to_string(),
            entries
                .iter()
                .map(|(name, is_directory)| LogDirEntry {
                    name: (*name).to_string(),
                    is_directory: *is_directory,
                    size: 1,
                    modified: None,
                })
                .collect(),
        );
        self
    }
}

impl LogFs for MemoryLogFs {
    fn read_bytes(&self, path: &str) -> Result<Vec<u8>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("{path}: not found"))
    }

    fn list_dir(&self, path: &str) -> Result<Vec<LogDirEntry>> {
        self.dirs
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("{path}: not found"))
    }
}

// ── Host ──────────────────────────────────────────────────────────────────────

pub struct FixedProbe(pub bool);

impl ProcessProbe for FixedProbe {
    fn is_running(&self, _: &str) -> bool {
        self.0
    }
}

#[derive(Default)]
pub struct MemorySettingsStore {
    pub saved: Mutex<Option<AgentSettings>>,
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Option<AgentSettings>> {
        Ok(self.saved.lock().unwrap().clone())
    }

    fn save(&self, settings: &AgentSettings) -> Result<()> {
        *self.saved.lock().unwrap() = Some(settings.clone());
        Ok(())
    }

    fn path(&self) -> Result<PathBuf> {
        Ok(PathBuf::from("settings.json"))
    }
}

pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, _: &str) {}
}

pub fn settings() -> AgentSettings {
    AgentSettings {
        pc_id: 0,
        line_number: 1,
        pc_number: 3,
        config_file_path: r"C:\Inspect\config.ini".to_string(),
        log_file_path: r"C:\Inspect\Logs".to_string(),
        model_folder_path: r"C:\Inspect\Models".to_string(),
        model_version: "3.5".to_string(),
        server_url: "http://server:5000".to_string(),
        exe_name: "Inspect.exe".to_string(),
    }
}
