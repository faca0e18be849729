/// Agent-facing endpoints on the management server, relative to `serverUrl`.
pub mod agent {
    /// Register this PC and obtain its `pcId`.
    /// Body: `AgentRegistrationRequest`, response: `AgentRegistrationResponse`.
    pub const REGISTER: &str = "/api/agent/register";

    /// Liveness report and command poll.
    /// Body: `HeartbeatRequest`, response: `HeartbeatResponse`.
    pub const HEARTBEAT: &str = "/api/agent/heartbeat";

    /// One result per executed command.
    /// Body: `CommandResultRequest`.
    pub const COMMAND_RESULT: &str = "/api/agent/commandresult";

    /// Push the watched config file when it changes.
    /// Body: `ConfigUpdateRequest`.
    pub const UPDATE_CONFIG: &str = "/api/agent/updateconfig";

    /// Push the first non-empty log file of the log folder when it changes.
    /// Body: `LogContentSyncRequest`.
    pub const UPDATE_LOG: &str = "/api/agent/updatelog";

    /// Push the serialized log folder tree when it changes.
    /// Body: `LogStructureSyncRequest`.
    pub const SYNC_LOG_STRUCTURE: &str = "/api/agent/synclogstructure";

    /// Push the list of installed models.
    /// Body: `ModelSyncRequest`.
    pub const SYNC_MODELS: &str = "/api/agent/syncmodels";

    /// Raw model archive upload.
    /// Format: /api/agent/modelarchive/{pcId}/{modelName}
    pub const MODEL_ARCHIVE: &str = "/api/agent/modelarchive";
}

/// Command type names as they appear in `commandType`.
pub mod command_type {
    pub const UPDATE_CONFIG: &str = "UpdateConfig";
    pub const CHANGE_MODEL: &str = "ChangeModel";
    pub const DOWNLOAD_MODEL: &str = "DownloadModel";
    pub const DELETE_MODEL: &str = "DeleteModel";
    pub const UPLOAD_MODEL: &str = "UploadModel";
    pub const GET_LOG_FILE_CONTENT: &str = "GetLogFileContent";
    pub const GET_LOG_STRUCTURE: &str = "GetLogStructure";
    pub const ANALYZE_LOG: &str = "AnalyzeLog";
}

/// Build the model archive endpoint for a PC and model.
#[must_use]
pub fn model_archive(pc_id: i64, model_name: &str) -> String {
    format!("{}/{pc_id}/{model_name}", agent::MODEL_ARCHIVE)
}

/// Join a server base URL and an endpoint path without doubling slashes.
#[must_use]
pub fn join_url(base: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}
