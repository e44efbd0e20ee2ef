//! Application configuration structs
//!
//! Loads configuration from environment variables (prefix `AGORA`), with a
//! `.env` file picked up in development.

use config::{Config, ConfigError};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub hub: HubConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            env: Environment::default(),
        }
    }
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Hub server bind configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Event hub tuning
#[derive(Debug, Clone, Deserialize)]
pub struct HubConfig {
    /// Per-connection outgoing message buffer
    #[serde(default = "default_message_buffer")]
    pub message_buffer: usize,
    /// Text sent in the `confirmation` event on connect
    #[serde(default = "default_confirmation_text")]
    pub confirmation_text: String,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            message_buffer: default_message_buffer(),
            confirmation_text: default_confirmation_text(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the environment
    ///
    /// Reads `AGORA`-prefixed variables (e.g. `AGORA__DATABASE__URL`), after
    /// loading a `.env` file if one is present.
    ///
    /// # Errors
    /// Returns an error if required variables are missing or malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Ignore a missing .env file; only development uses one
        let _ = dotenvy::dotenv();

        Config::builder()
            .add_source(config::Environment::with_prefix("AGORA").separator("__"))
            .build()?
            .try_deserialize()
    }
}

fn default_app_name() -> String {
    "agora".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4000
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_message_buffer() -> usize {
    100
}

fn default_confirmation_text() -> String {
    "connected!".to_string()
}
