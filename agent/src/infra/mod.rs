//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: HTTP, filesystem access,
//! process execution, and settings persistence.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod command_runner;
pub mod fs;
pub mod http;
pub mod models;
pub mod network;
pub mod process;
pub mod settings;
