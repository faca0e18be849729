//! Filesystem infrastructure: implements `LogFs` and `ConfigFile`.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::{ConfigFile, LogDirEntry, LogFs};

/// Production `LogFs` reading the local disk.
pub struct LocalLogFs;

impl LogFs for LocalLogFs {
    fn read_bytes(&self, path: &str) -> Result<Vec<u8>> {
        std::fs::read(path).with_context(|| format!("reading {path}"))
    }

    fn list_dir(&self, path: &str) -> Result<Vec<LogDirEntry>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path).with_context(|| format!("listing {path}"))? {
            let Ok(entry) = entry else { continue };
            let Ok(metadata) = entry.metadata() else {
                continue;
            };
            entries.push(LogDirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_directory: metadata.is_dir(),
                size: metadata.len(),
                modified: metadata.modified().ok(),
            });
        }
        Ok(entries)
    }
}

/// The inspection application's config file on the local disk.
pub struct LocalConfigFile {
    path: PathBuf,
}

impl LocalConfigFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ConfigFile for LocalConfigFile {
    fn read(&self) -> Result<String> {
        let bytes =
            std::fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn write(&self, content: &str) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }
        std::fs::write(&self.path, content)
            .with_context(|| format!("writing {}", self.path.display()))
    }
}
