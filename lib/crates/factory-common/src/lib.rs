pub mod config;
pub mod endpoints;
pub mod types;

pub use config::{AgentSettings, SettingsError, DEFAULT_MODEL_VERSION};
pub use endpoints::{agent, command_type};
pub use types::*;
