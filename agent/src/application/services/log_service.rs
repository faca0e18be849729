//! Application service: log folder access and log analysis responses.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through the injected `LogFs` port.

use chrono::{DateTime, Local};
use factory_common::LogFileNode;
use serde::Serialize;
use serde_json::Value;

use crate::application::ports::LogFs;
use crate::domain::error::CommandError;
use crate::domain::log_analysis::{AnalysisOptions, LogAnalysis, analyze_log};
use crate::domain::paths::resolve_log_path;

/// Format of `modifiedDate` in the log tree.
pub const MODIFIED_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Text content of one log file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileContent {
    pub success: bool,
    pub content: String,
    pub size: usize,
    pub encoding: &'static str,
}

/// Read a log file as UTF-8 text. Invalid sequences are replaced.
///
/// # Errors
///
/// Returns `FileUnavailable` naming `path` when the file cannot be read.
pub fn read_file_content(fs: &dyn LogFs, path: &str) -> Result<FileContent, CommandError> {
    let bytes = fs.read_bytes(path).map_err(|e| {
        tracing::debug!(path, error = %format!("{e:#}"), "log file unreadable");
        CommandError::FileUnavailable(path.to_string())
    })?;
    Ok(FileContent {
        success: true,
        size: bytes.len(),
        content: String::from_utf8_lossy(&bytes).into_owned(),
        encoding: "UTF-8",
    })
}

/// Tree of the log folder rooted at `root`.
///
/// Node paths are relative to `root` and `\`-joined. Entries that cannot be
/// listed are skipped; a missing root yields an empty tree.
#[must_use]
pub fn log_structure(fs: &dyn LogFs, root: &str) -> Vec<LogFileNode> {
    collect_nodes(fs, root, "")
}

fn collect_nodes(fs: &dyn LogFs, dir: &str, relative: &str) -> Vec<LogFileNode> {
    let mut entries = match fs.list_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(dir, error = %format!("{e:#}"), "skipping unreadable directory");
            return Vec::new();
        }
    };
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    entries
        .into_iter()
        .map(|entry| {
            let path = if relative.is_empty() {
                entry.name.clone()
            } else {
                format!("{relative}\\{}", entry.name)
            };
            let modified_date = entry
                .modified
                .map(|t| DateTime::<Local>::from(t).format(MODIFIED_DATE_FORMAT).to_string());

            if entry.is_directory {
                let children = collect_nodes(fs, &resolve_log_path(dir, &entry.name), &path);
                LogFileNode {
                    name: entry.name,
                    path,
                    is_directory: true,
                    size: None,
                    modified_date,
                    children: Some(children),
                }
            } else {
                LogFileNode {
                    name: entry.name,
                    path,
                    is_directory: false,
                    size: Some(entry.size),
                    modified_date,
                    children: None,
                }
            }
        })
        .collect()
}

/// Response document of a log structure request.
#[must_use]
pub fn structure_response(files: &[LogFileNode]) -> Value {
    serde_json::json!({ "success": true, "files": files })
}

#[derive(Serialize)]
struct AnalysisResponse<'a> {
    success: bool,
    #[serde(flatten)]
    analysis: &'a LogAnalysis,
}

/// Response document of a successful analysis.
///
/// # Errors
///
/// Returns `AnalysisFailed` if the analysis cannot be serialized.
pub fn analysis_response(analysis: &LogAnalysis) -> Result<String, CommandError> {
    serde_json::to_string(&AnalysisResponse {
        success: true,
        analysis,
    })
    .map_err(|e| CommandError::AnalysisFailed(e.to_string()))
}

/// Analyse raw log text and render the response document.
///
/// # Errors
///
/// Returns `AnalysisFailed` if the response cannot be rendered.
pub fn analyze_content(content: &str, options: AnalysisOptions) -> Result<String, CommandError> {
    let analysis = analyze_log(content, options);
    tracing::debug!(
        barrels = analysis.summary.total_barrels,
        "log analysis finished"
    );
    analysis_response(&analysis)
}
