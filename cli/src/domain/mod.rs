//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs` or `std::process`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod credentials;
pub mod error;
pub mod names;
pub mod security_group;
pub mod service;

pub use config::{MitsConfig, TestConfig, Timeouts};
pub use credentials::Credentials;
pub use error::{ConfigError, CredentialsError, ServiceError, StepError};
pub use names::{ScenarioNames, SuiteNames, prefixed_random_name};
pub use security_group::{Lifecycle, Protocol, SecurityRule};
pub use service::ServiceStatus;
