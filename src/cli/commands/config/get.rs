use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::{
    cli::{
        CliError, Command, CommandResult,
        formatting::format_toml_value,
        types::{ArgType, CommandArg, CommandMetadata, Invocation},
    },
    config::Config,
};

/// Command for reading configuration values by dotted path.
///
/// # Example Usage
///
/// ```bash
/// cortex config get server.port
/// cortex config get runtime.runMode
/// ```
pub struct GetCommand {
    config_path: PathBuf,
}

impl GetCommand {
    /// Creates a new GetCommand reading the given config file.
    pub fn new(config_path: &Path) -> Self {
        Self {
            config_path: config_path.to_path_buf(),
        }
    }
}

#[async_trait]
impl Command for GetCommand {
    async fn execute(&self, invocation: &Invocation) -> CommandResult {
        let path = invocation.arg(0).ok_or_else(|| CliError::MissingArguments {
            usage: self.metadata().usage(),
        })?;

        let config =
            Config::load_from(&self.config_path).map_err(|e| CliError::ConfigError(e.to_string()))?;
        let value = config
            .get_by_path(path)
            .map_err(|e| CliError::ConfigError(e.to_string()))?;

        Ok(format!("{path}: {}", format_toml_value(&value)))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "get".to_string(),
            description: "Get configuration value".to_string(),
            category: Some("config".to_string()),
            args: vec![CommandArg::required(
                "path",
                "Configuration path (e.g., server.port)",
                ArgType::Path,
            )],
            flags: Vec::new(),
            examples: vec![
                "cortex config get server.port".to_string(),
                "cortex config get runtime.runMode".to_string(),
            ],
        }
    }
}
