//! Infrastructure implementation of the `SettingsStore` port.

use anyhow::{Context, Result};
use std::path::PathBuf;

use factory_common::{AgentSettings, SettingsError};

use crate::application::ports::SettingsStore;

/// Overrides the settings file location.
pub const SETTINGS_ENV: &str = "FACTORY_AGENT_SETTINGS";

/// Production implementation of `SettingsStore` that uses a JSON file on disk.
pub struct JsonSettingsStore;

impl SettingsStore for JsonSettingsStore {
    fn load(&self) -> Result<Option<AgentSettings>> {
        let path = self.path()?;
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        serde_json::from_str(&content)
            .map(Some)
            .with_context(|| format!("cannot parse {}", path.display()))
    }

    fn save(&self, settings: &AgentSettings) -> Result<()> {
        let path = self.path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        let content =
            serde_json::to_string_pretty(settings).context("cannot serialize settings")?;
        std::fs::write(&path, content)
            .with_context(|| format!("cannot write {}", path.display()))?;
        Ok(())
    }

    fn path(&self) -> Result<PathBuf> {
        if let Ok(val) = std::env::var(SETTINGS_ENV) {
            return Ok(PathBuf::from(val));
        }
        let dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("cannot determine config directory"))?;
        Ok(dir.join("factory-agent").join("settings.json"))
    }
}

/// Load settings and require a completed registration.
///
/// # Errors
///
/// Returns an error if the file is unreadable, absent, or has no `pcId`.
pub fn load_registered(store: &impl SettingsStore) -> Result<AgentSettings> {
    match store.load()? {
        Some(settings) if settings.is_registered() => Ok(settings),
        _ => Err(SettingsError::NotRegistered.into()),
    }
}
