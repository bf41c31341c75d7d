use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::info;

use crate::{
    cli::{
        CliError, Command, CommandResult,
        types::{ArgType, CommandArg, CommandMetadata, Invocation},
    },
    config::Config,
};

/// Command for writing configuration values by dotted path.
///
/// The value type is detected from the input and the updated file must
/// still match the configuration schema.
pub struct SetCommand {
    config_path: PathBuf,
}

impl SetCommand {
    /// Creates a new SetCommand writing the given config file.
    pub fn new(config_path: &Path) -> Self {
        Self {
            config_path: config_path.to_path_buf(),
        }
    }
}

#[async_trait]
impl Command for SetCommand {
    async fn execute(&self, invocation: &Invocation) -> CommandResult {
        let (Some(path), Some(value)) = (invocation.arg(0), invocation.arg(1)) else {
            return Err(CliError::MissingArguments {
                usage: self.metadata().usage(),
            });
        };

        let config_error = |e: crate::CortexError| CliError::ConfigError(e.to_string());

        let updated = Config::load_from(&self.config_path)
            .map_err(config_error)?
            .with_value_at_path(path, value)
            .map_err(config_error)?;
        updated.save_to(&self.config_path).map_err(config_error)?;

        info!(path, value, "Updated configuration");
        Ok(format!("Set new value '{value}' at path '{path}'"))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "set".to_string(),
            description: "Set configuration value".to_string(),
            category: Some("config".to_string()),
            args: vec![
                CommandArg::required("path", "Configuration path", ArgType::Path),
                CommandArg::required("value", "New value (auto-detected type)", ArgType::String),
            ],
            flags: Vec::new(),
            examples: vec![
                "cortex config set server.port 39281".to_string(),
                "cortex config set init.default_instructions AVX2".to_string(),
            ],
        }
    }
}
