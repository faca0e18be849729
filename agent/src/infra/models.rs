//! Model infrastructure: implements `ModelOperations` on the model folder.
//!
//! Every installed model is a subdirectory of the model folder. The active
//! model is recorded in the inspection application's config file. Archives
//! are built and unpacked with the platform's own zip tooling.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use factory_common::{ModelDeployment, ModelInfo};

use crate::application::ports::{CommandRunner, ConfigFile, ModelOperations};
use crate::domain::model_config::{current_model, set_current_model, validate_model_name};

// ── Archive tooling ──────────────────────────────────────────────────────────

/// External program used to build and unpack zip archives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveTool {
    /// `Compress-Archive` / `Expand-Archive` via `powershell`.
    PowerShell,
    /// Info-ZIP `zip` / `unzip` via `sh`.
    InfoZip,
}

fn ps_quote(path: &Path) -> String {
    format!("'{}'", path.display().to_string().replace('\'', "''"))
}

impl ArchiveTool {
    #[must_use]
    pub fn native() -> Self {
        if cfg!(windows) {
            Self::PowerShell
        } else {
            Self::InfoZip
        }
    }

    /// Command that zips the contents of `src` into `dest`.
    #[must_use]
    pub fn compress(self, src: &Path, dest: &Path) -> (&'static str, Vec<String>) {
        match self {
            Self::PowerShell => (
                "powershell",
                vec![
                    "-NoProfile".to_string(),
                    "-NonInteractive".to_string(),
                    "-Command".to_string(),
                    format!(
                        "Compress-Archive -Path {} -DestinationPath {} -Force",
                        ps_quote(&src.join("*")),
                        ps_quote(dest)
                    ),
                ],
            ),
            Self::InfoZip => (
                "sh",
                vec![
                    "-c".to_string(),
                    r#"cd "$1" && zip -qr "$2" ."#.to_string(),
                    "sh".to_string(),
                    src.display().to_string(),
                    dest.display().to_string(),
                ],
            ),
        }
    }

    /// Command that unpacks `archive` into `dest`, overwriting files.
    #[must_use]
    pub fn extract(self, archive: &Path, dest: &Path) -> (&'static str, Vec<String>) {
        match self {
            Self::PowerShell => (
                "powershell",
                vec![
                    "-NoProfile".to_string(),
                    "-NonInteractive".to_string(),
                    "-Command".to_string(),
                    format!(
                        "Expand-Archive -LiteralPath {} -DestinationPath {} -Force",
                        ps_quote(archive),
                        ps_quote(dest)
                    ),
                ],
            ),
            Self::InfoZip => (
                "unzip",
                vec![
                    "-qo".to_string(),
                    archive.display().to_string(),
                    "-d".to_string(),
                    dest.display().to_string(),
                ],
            ),
        }
    }
}

// ── Model store ──────────────────────────────────────────────────────────────

/// Production `ModelOperations` over the local model folder.
pub struct FsModelStore<R> {
    model_folder: PathBuf,
    config: Arc<dyn ConfigFile>,
    runner: R,
    tool: ArchiveTool,
}

impl<R: CommandRunner> FsModelStore<R> {
    #[must_use]
    pub fn new(model_folder: impl Into<PathBuf>, config: Arc<dyn ConfigFile>, runner: R) -> Self {
        Self {
            model_folder: model_folder.into(),
            config,
            runner,
            tool: ArchiveTool::native(),
        }
    }

    fn model_dir(&self, model_name: &str) -> Result<PathBuf> {
        validate_model_name(model_name)?;
        Ok(self.model_folder.join(model_name))
    }

    fn installed_dir(&self, model_name: &str) -> Result<PathBuf> {
        let dir = self.model_dir(model_name)?;
        anyhow::ensure!(dir.is_dir(), "model '{model_name}' is not installed");
        Ok(dir)
    }

    fn active_model(&self) -> Option<String> {
        self.config.read().ok().as_deref().and_then(current_model)
    }

    fn run_tool(&self, (program, args): (&'static str, Vec<String>)) -> Result<()> {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let output = self.runner.run(program, &args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("{program} failed: {}", stderr.trim());
        }
        Ok(())
    }
}

impl<R: CommandRunner> ModelOperations for FsModelStore<R> {
    fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let current = self.active_model();
        let entries = std::fs::read_dir(&self.model_folder)
            .with_context(|| format!("listing {}", self.model_folder.display()))?;

        let mut models: Vec<ModelInfo> = entries
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_ok_and(|t| t.is_dir()))
            .map(|e| {
                let model_name = e.file_name().to_string_lossy().into_owned();
                ModelInfo {
                    is_current: current.as_deref() == Some(model_name.as_str()),
                    model_path: e.path().display().to_string(),
                    model_name,
                }
            })
            .collect();
        models.sort_by(|a, b| a.model_name.cmp(&b.model_name));
        Ok(models)
    }

    fn change_model(&self, model_name: &str) -> Result<()> {
        let dir = self.installed_dir(model_name)?;
        let config = self.config.read().context("reading config file")?;
        let updated = set_current_model(&config, model_name, &dir.display().to_string());
        self.config.write(&updated).context("writing config file")?;
        tracing::info!(model = model_name, "active model changed");
        Ok(())
    }

    fn delete_model(&self, model_name: &str) -> Result<()> {
        let dir = self.installed_dir(model_name)?;
        anyhow::ensure!(
            self.active_model().as_deref() != Some(model_name),
            "cannot delete the active model '{model_name}'"
        );
        std::fs::remove_dir_all(&dir).with_context(|| format!("removing {}", dir.display()))?;
        tracing::info!(model = model_name, "model deleted");
        Ok(())
    }

    fn download_model(&self, model_name: &str) -> Result<Vec<u8>> {
        let dir = self.installed_dir(model_name)?;
        let staging = tempfile::tempdir().context("creating staging directory")?;
        let archive = staging.path().join(format!("{model_name}.zip"));
        self.run_tool(self.tool.compress(&dir, &archive))
            .with_context(|| format!("archiving model '{model_name}'"))?;
        std::fs::read(&archive).with_context(|| format!("reading {}", archive.display()))
    }

    fn upload_model(&self, deployment: &ModelDeployment, archive: &[u8]) -> Result<String> {
        let name = deployment.model_name.as_str();
        let dir = self.model_dir(name)?;
        let staging = tempfile::tempdir().context("creating staging directory")?;
        let archive_path = staging.path().join(
            deployment
                .file_name
                .as_deref()
                .filter(|f| validate_model_name(f).is_ok())
                .unwrap_or("model.zip"),
        );
        std::fs::write(&archive_path, archive)
            .with_context(|| format!("writing {}", archive_path.display()))?;

        std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
        self.run_tool(self.tool.extract(&archive_path, &dir))
            .with_context(|| format!("extracting model '{name}'"))?;
        tracing::info!(model = name, bytes = archive.len(), "model installed");
        Ok(dir.display().to_string())
    }
}
