//! Command model: kinds, decoding of raw batch entries, results, and the
//! field extractors shared by the command handlers.
//!
//! Pure functions only: no I/O.

use std::fmt;
use std::str::FromStr;

use factory_common::{CommandInfo, CommandResultRequest, CommandStatus, ModelDeployment, command_type};
use serde_json::Value;

use crate::domain::error::CommandError;

// ── Kinds ────────────────────────────────────────────────────────────────────

/// Every command type the agent knows how to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    UpdateConfig,
    ChangeModel,
    DownloadModel,
    DeleteModel,
    UploadModel,
    GetLogFileContent,
    GetLogStructure,
    AnalyzeLog,
}

impl CommandKind {
    pub const ALL: [Self; 8] = [
        Self::UpdateConfig,
        Self::ChangeModel,
        Self::DownloadModel,
        Self::DeleteModel,
        Self::UploadModel,
        Self::GetLogFileContent,
        Self::GetLogStructure,
        Self::AnalyzeLog,
    ];

    /// Wire name used in `commandType`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UpdateConfig => command_type::UPDATE_CONFIG,
            Self::ChangeModel => command_type::CHANGE_MODEL,
            Self::DownloadModel => command_type::DOWNLOAD_MODEL,
            Self::DeleteModel => command_type::DELETE_MODEL,
            Self::UploadModel => command_type::UPLOAD_MODEL,
            Self::GetLogFileContent => command_type::GET_LOG_FILE_CONTENT,
            Self::GetLogStructure => command_type::GET_LOG_STRUCTURE,
            Self::AnalyzeLog => command_type::ANALYZE_LOG,
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandKind {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CommandError::UnknownType(s.to_string()))
    }
}

// ── Commands ─────────────────────────────────────────────────────────────────

/// A decoded command ready to be routed to its handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub id: i64,
    pub kind: CommandKind,
    pub data: Option<String>,
}

/// Outcome of decoding one raw batch entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// Well-formed command of a known kind.
    Ready(Command),
    /// Correlatable but unusable entry; the result is already decided.
    Rejected(CommandResult),
    /// No usable `commandId`, so no result can be reported.
    Uncorrelated(String),
}

/// Decode one raw entry of a heartbeat's command list.
#[must_use]
pub fn decode(raw: &Value) -> Decoded {
    let Some(id) = raw.get("commandId").and_then(Value::as_i64) else {
        return Decoded::Uncorrelated(format!("entry without numeric commandId: {raw}"));
    };

    let info: CommandInfo = match serde_json::from_value(raw.clone()) {
        Ok(info) => info,
        Err(e) => {
            return Decoded::Rejected(CommandResult::failed(
                id,
                &CommandError::Malformed(e.to_string()),
            ));
        }
    };

    match info.command_type.parse::<CommandKind>() {
        Ok(kind) => Decoded::Ready(Command {
            id,
            kind,
            data: info.command_data,
        }),
        Err(err) => Decoded::Rejected(CommandResult::failed(id, &err)),
    }
}

// ── Results ──────────────────────────────────────────────────────────────────

/// The single result produced for one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub command_id: i64,
    pub outcome: CommandStatus,
    pub result_data: String,
    pub error_message: Option<String>,
}

impl CommandResult {
    #[must_use]
    pub fn completed(command_id: i64, result_data: String) -> Self {
        Self {
            command_id,
            outcome: CommandStatus::Completed,
            result_data,
            error_message: None,
        }
    }

    #[must_use]
    pub fn failed(command_id: i64, err: &CommandError) -> Self {
        Self {
            command_id,
            outcome: CommandStatus::Failed,
            result_data: err.to_result_data(),
            error_message: Some(err.to_string()),
        }
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.outcome == CommandStatus::Completed
    }

    /// Wire form posted to the result endpoint.
    #[must_use]
    pub fn into_request(self) -> CommandResultRequest {
        CommandResultRequest {
            command_id: self.command_id,
            status: self.outcome,
            result_data: self.result_data,
            error_message: self.error_message,
        }
    }
}

// ── Command data extractors ──────────────────────────────────────────────────

/// Parse `commandData` as a JSON document. Absent data is a missing field.
///
/// # Errors
///
/// `MissingField` when absent, `Malformed` when it is not valid JSON.
pub fn parse_data(data: Option<&str>) -> Result<Value, CommandError> {
    let raw = data.ok_or(CommandError::MissingField("commandData"))?;
    serde_json::from_str(raw).map_err(|e| CommandError::Malformed(e.to_string()))
}

/// Read a required non-empty string field from a command document.
///
/// # Errors
///
/// `MissingField` when absent, not a string, or empty.
pub fn require_str<'a>(doc: &'a Value, field: &'static str) -> Result<&'a str, CommandError> {
    doc.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or(CommandError::MissingField(field))
}

/// `ModelName` of a `ChangeModel`, `DeleteModel` or `DownloadModel` command.
///
/// # Errors
///
/// Returns an error if the data is malformed or lacks `ModelName`.
pub fn model_name(data: Option<&str>) -> Result<String, CommandError> {
    let doc = parse_data(data)?;
    let name = require_str(&doc, "ModelName")?;
    crate::domain::model_config::validate_model_name(name)?;
    Ok(name.to_string())
}

/// Deployment details of an `UploadModel` command.
///
/// # Errors
///
/// Returns an error if the data is malformed or lacks `ModelName`/`DownloadUrl`.
pub fn deployment(data: Option<&str>) -> Result<ModelDeployment, CommandError> {
    let doc = parse_data(data)?;
    let name = require_str(&doc, "ModelName")?;
    require_str(&doc, "DownloadUrl")?;
    crate::domain::model_config::validate_model_name(name)?;
    serde_json::from_value(doc).map_err(|e| CommandError::Malformed(e.to_string()))
}

/// `FilePath` of a `GetLogFileContent` command.
///
/// # Errors
///
/// Returns an error if the data is malformed or lacks `FilePath`.
pub fn log_file_path(data: Option<&str>) -> Result<String, CommandError> {
    let doc = parse_data(data)?;
    Ok(require_str(&doc, "FilePath")?.to_string())
}

/// Optional `LogPath` of a `GetLogStructure` command; `None` means the
/// configured log root.
///
/// # Errors
///
/// Returns an error only if data is present but not valid JSON.
pub fn log_root_override(data: Option<&str>) -> Result<Option<String>, CommandError> {
    match data.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => {
            let doc: Value =
                serde_json::from_str(raw).map_err(|e| CommandError::Malformed(e.to_string()))?;
            Ok(require_str(&doc, "LogPath").ok().map(str::to_string))
        }
    }
}

/// Raw log text of an `AnalyzeLog` command.
///
/// # Errors
///
/// Returns an error if the data is malformed or `content` is not a string.
pub fn analysis_content(data: Option<&str>) -> Result<String, CommandError> {
    let doc = parse_data(data)?;
    doc.get("content")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(CommandError::MissingField("content"))
}

// ── Unit tests ───────────────────────────────────────────────────────────────
