//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, the
//! `cf` CLI adapter, DNS resolution and config file loading.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod cf;
pub mod command_runner;
pub mod config;
pub mod resolver;

pub use cf::{CfCli, Identity};
pub use command_runner::TokioCommandRunner;
pub use config::YamlConfigStore;
pub use resolver::TokioHostResolver;
