use serde::{Deserialize, Serialize};

/// Final status of an executed command, as reported to the server.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CommandStatus {
    Completed,
    Failed,
}

impl CommandStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::Failed => "Failed",
        }
    }
}

/// A command as delivered inside a heartbeat response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommandInfo {
    pub command_id: i64,
    pub command_type: String,
    /// Opaque payload, often itself a JSON document.
    #[serde(default)]
    pub command_data: Option<String>,
}

/// Result posted back for every command the agent received.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommandResultRequest {
    pub command_id: i64,
    pub status: CommandStatus,
    pub result_data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

// ── Heartbeat ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HeartbeatRequest {
    pub pc_id: i64,
    pub is_application_running: bool,
}

/// Heartbeat response. Commands stay raw JSON so that one malformed entry
/// does not prevent decoding the rest of the batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeartbeatResponse {
    pub success: bool,
    pub has_pending_commands: bool,
    pub commands: Vec<serde_json::Value>,
}

// ── Registration ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AgentRegistrationRequest {
    pub line_number: i64,
    pub pc_number: i64,
    pub ip_address: String,
    pub config_file_path: String,
    pub log_folder_path: String,
    pub model_folder_path: String,
    pub model_version: String,
    pub exe_name: String,
    /// Serialized `Vec<LogFileNode>` of the log folder at registration time.
    pub log_structure_json: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentRegistrationResponse {
    pub success: bool,
    pub pc_id: i64,
    pub message: String,
}

// ── Sync payloads ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConfigUpdateRequest {
    pub pc_id: i64,
    pub config_content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LogStructureSyncRequest {
    pub pc_id: i64,
    pub log_structure_json: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LogContentSyncRequest {
    pub pc_id: i64,
    pub log_content: String,
    /// File name only, relative to the log folder.
    pub log_file_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ModelSyncRequest {
    pub pc_id: i64,
    pub models: Vec<ModelInfo>,
}

/// An installed model folder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub model_name: String,
    pub model_path: String,
    pub is_current: bool,
}

// ── Command payloads ─────────────────────────────────────────────────────────

/// `UploadModel` command data. The server serializes it with PascalCase keys.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ModelDeployment {
    #[serde(default)]
    pub model_file_id: Option<i64>,
    pub model_name: String,
    #[serde(default)]
    pub file_name: Option<String>,
    pub download_url: String,
    #[serde(default)]
    pub apply_on_upload: bool,
}

/// One entry of the log folder tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LogFileNode {
    pub name: String,
    /// Path relative to the log root, `\`-separated.
    pub path: String,
    pub is_directory: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Last modification time, `%Y-%m-%d %H:%M:%S` local time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<LogFileNode>>,
}
