use std::{io::Write, path::Path};

use tracing::{debug, info};

use super::{CliError, CommandRegistry, ExitStatus, formatting::format_error};
use crate::usecases::Usecases;

/// Result of one dispatched invocation, ready to be printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Command output for stdout
    pub stdout: Option<String>,
    /// One styled error line for stderr
    pub stderr: Option<String>,
    /// Process exit status
    pub status: ExitStatus,
}

impl Outcome {
    fn from_result(result: Result<String, CliError>) -> Self {
        match result {
            Ok(output) => Self {
                stdout: Some(output),
                stderr: None,
                status: ExitStatus::Success,
            },
            Err(error) => {
                let status = ExitStatus::from(&error);
                info!(error = %error, code = status.code(), "Command failed");
                Self {
                    stdout: None,
                    stderr: Some(format_error(&format!("Error: {error}"))),
                    status,
                }
            }
        }
    }

    /// Writes the output or error line to the given streams.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to either stream fails.
    pub fn write_to(&self, stdout: &mut impl Write, stderr: &mut impl Write) -> std::io::Result<()> {
        if let Some(output) = self.stdout.as_ref().filter(|output| !output.is_empty()) {
            writeln!(stdout, "{output}")?;
        }
        if let Some(error) = &self.stderr {
            writeln!(stderr, "{error}")?;
        }
        Ok(())
    }
}

/// High-level service for managing and executing CLI commands.
///
/// Provides a unified interface for command registration, discovery, and execution.
/// Commands are organized by category and can be listed or executed by name.
pub struct CliService {
    registry: CommandRegistry,
}

impl CliService {
    /// Creates a new CLI service with all available commands registered.
    ///
    /// # Arguments
    /// * `usecases` - Usecases bound into the commands
    /// * `config_path` - Config file read and written by `init` and `config`
    ///
    /// # Errors
    /// Returns `CliError::InvalidDescriptor` if a command descriptor is rejected.
    pub fn new(usecases: &Usecases, config_path: &Path) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        registry.register_all_commands(usecases, config_path)?;

        Ok(Self::with_registry(registry))
    }

    /// Wraps an already populated registry.
    pub fn with_registry(registry: CommandRegistry) -> Self {
        CliService { registry }
    }

    /// Executes the command named by the leading tokens.
    ///
    /// No tokens, `--help` and `-h` show the help text.
    ///
    /// # Errors
    /// Returns `CliError::CommandNotFound` if the command doesn't exist, argument
    /// validation errors, or the command's own failure.
    pub async fn execute_command(&self, tokens: &[String]) -> Result<String, CliError> {
        match tokens.first().map(String::as_str) {
            None | Some("--help" | "-h") => {
                debug!("Showing help");
                self.registry.dispatch(&["help".to_string()]).await
            }
            Some(_) => self.registry.dispatch(tokens).await,
        }
    }

    /// Executes the tokens and translates the result into an [`Outcome`].
    pub async fn dispatch(&self, tokens: &[String]) -> Outcome {
        Outcome::from_result(self.execute_command(tokens).await)
    }

    /// Lists all available commands organized by category.
    ///
    /// Returns a vector of tuples where each tuple contains a category name
    /// (empty for top-level commands) and a vector of command names within
    /// that category.
    pub fn list_all(&self) -> Vec<(String, Vec<String>)> {
        self.registry.list_commands()
    }
}
