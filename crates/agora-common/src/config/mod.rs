//! Configuration loading

mod app_config;

pub use app_config::{AppConfig, AppSettings, DatabaseConfig, Environment, HubConfig, ServerConfig};
