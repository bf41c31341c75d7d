//! Configuration schema definitions and persistence.
//!
//! Defines the `config.toml` structure: general settings, the API server
//! address, the runtime record written by `cortex init` and init defaults.

mod loading;
mod path_ops;
mod paths;

#[cfg(test)]
mod tests;

pub use paths::ConfigPaths;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::wizard::{InitQuestionOptions, Instructions, RuntimeConfiguration};

/// Main configuration structure for cortex.
///
/// Represents the complete configuration schema loaded from TOML. All
/// fields have sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// General application settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Address of the local inference server.
    #[serde(default)]
    pub server: ServerConfig,

    /// Runtime selection recorded by `cortex init`.
    #[serde(default)]
    pub runtime: RuntimeConfiguration,

    /// Defaults applied by `cortex init`.
    #[serde(default)]
    pub init: InitConfig,
}

/// General configuration settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// Logging level for the application (e.g., "debug", "info", "warn", "error").
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Root folder for models and logs. Defaults to `~/.cortex`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_folder: Option<PathBuf>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            data_folder: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Local inference server address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Host the server listens on.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the server listens on.
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
    /// Base URL of the server, e.g. `http://127.0.0.1:3928`.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3928
}

/// Defaults for the init question set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct InitConfig {
    /// Instruction set preselected by `cortex init`. When unset the operator
    /// must choose explicitly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_instructions: Option<Instructions>,
}

impl From<InitConfig> for InitQuestionOptions {
    fn from(config: InitConfig) -> Self {
        InitQuestionOptions {
            default_instructions: config.default_instructions,
        }
    }
}
