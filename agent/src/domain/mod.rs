//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod command;
pub mod error;
pub mod log_analysis;
pub mod model_config;
pub mod paths;

pub use command::{Command, CommandKind, CommandResult, Decoded, decode};
pub use error::CommandError;
pub use log_analysis::{
    AnalysisOptions, AnalysisSummary, Barrel, IncompleteOperation, LogAnalysis, OperationRecord,
    analyze_log,
};
pub use model_config::{current_model, set_current_model, validate_model_name};
pub use paths::{is_absolute_path, resolve_log_path};
