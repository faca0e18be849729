//! Command implementations

pub mod analyze;
pub mod config;
pub mod read_log;
pub mod register;
pub mod run;
pub mod version;
