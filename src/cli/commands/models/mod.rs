//! Model lifecycle commands.
mod alias;
mod get;
mod import;
mod list;
mod remove;

use std::sync::Arc;

pub use alias::AliasCommand;
pub use get::GetCommand;
pub use import::ImportCommand;
pub use list::ListCommand;
pub use remove::RemoveCommand;

use crate::{
    cli::{CliError, CommandRegistry},
    usecases::ModelUsecases,
};

const CATEGORY_NAME: &str = "models";

/// Registers all model commands in the "models" category.
///
/// # Errors
///
/// Returns `CliError::InvalidDescriptor` if a descriptor is rejected.
pub fn register_commands(
    registry: &mut CommandRegistry,
    usecases: Arc<dyn ModelUsecases>,
) -> Result<(), CliError> {
    registry.register_command(Box::new(ListCommand::new(usecases.clone())))?;
    registry.register_command(Box::new(GetCommand::new(usecases.clone())))?;
    registry.register_command(Box::new(RemoveCommand::new(usecases.clone())))?;
    registry.register_command(Box::new(RemoveCommand::delete(usecases.clone())))?;
    registry.register_command(Box::new(ImportCommand::new(usecases.clone())))?;
    registry.register_command(Box::new(AliasCommand::new(usecases)))
}
