//! Configuration management commands.
mod get;
mod set;

use std::path::Path;

pub use get::GetCommand;
pub use set::SetCommand;

use crate::cli::{CliError, CommandRegistry};

/// Registers all configuration-related commands with the command registry.
///
/// Registers commands in the "config" category. Both commands read the
/// config file on every execution.
///
/// # Arguments
///
/// * `registry` - Mutable reference to the command registry
/// * `config_path` - Path of the configuration file the commands operate on
///
/// # Errors
///
/// Returns `CliError::InvalidDescriptor` if a descriptor is rejected.
pub fn register_commands(registry: &mut CommandRegistry, config_path: &Path) -> Result<(), CliError> {
    registry.register_command(Box::new(GetCommand::new(config_path)))?;
    registry.register_command(Box::new(SetCommand::new(config_path)))
}
