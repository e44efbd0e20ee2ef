//! # agora-common
//!
//! Shared utilities: configuration loading, the application-wide error type,
//! and tracing setup.

pub mod config;
pub mod error;
pub mod telemetry;

pub use config::{AppConfig, DatabaseConfig, Environment, HubConfig, ServerConfig};
pub use error::AppError;
pub use telemetry::{init_tracing, init_tracing_with_config, try_init_tracing, TracingConfig};
