//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Command errors ────────────────────────────────────────────────────────────

/// Why a single command produced a `Failed` result.
///
/// Every variant is local to one command: the dispatcher reports it and moves
/// on to the next command of the batch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command type: {0}")]
    UnknownType(String),

    #[error("Malformed command data: {0}")]
    Malformed(String),

    #[error("Missing required field '{0}' in command data")]
    MissingField(&'static str),

    #[error("Invalid model name '{0}'")]
    InvalidModelName(String),

    #[error("Failed to open file: {0}")]
    FileUnavailable(String),

    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    /// A collaborator reported failure; carries its description.
    #[error("{0}")]
    Fault(String),

    #[error("Handler panicked: {0}")]
    Panicked(String),
}

impl CommandError {
    /// The `resultData` document reported alongside a `Failed` status.
    #[must_use]
    pub fn to_result_data(&self) -> String {
        serde_json::json!({ "success": false, "error": self.to_string() }).to_string()
    }

    /// Wrap a collaborator error, keeping its whole context chain.
    #[must_use]
    pub fn fault(err: &anyhow::Error) -> Self {
        Self::Fault(format!("{err:#}"))
    }
}
