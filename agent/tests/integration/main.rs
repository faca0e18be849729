//! Integration tests for the factory-agent CLI
//!
//! These tests spawn the actual binary and test end-to-end behavior.
//! Every test points `FACTORY_AGENT_SETTINGS` at a temp path so the real
//! settings file is never touched.

mod cli_tests;
mod read_log_command;
mod run_command;
