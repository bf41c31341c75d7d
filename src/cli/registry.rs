use std::{collections::HashMap, path::Path};

use tracing::{debug, instrument};

use super::{
    CliError, Command, CommandResult,
    commands::{chat, config, help, init, models},
    types::{CommandMetadata, Invocation},
};
use crate::usecases::Usecases;

/// Registry for CLI commands organized by category.
///
/// The CommandRegistry provides a hierarchical structure for managing CLI commands,
/// allowing commands to be grouped by logical categories (e.g., "models", "config")
/// next to top-level commands such as `init` and `chat`.
///
/// # Example Structure
///
/// ```text
/// registry
/// ├── init
/// ├── chat
/// ├── help
/// ├── models
/// │   ├── list
/// │   ├── get
/// │   ├── remove
/// │   ├── delete
/// │   ├── import
/// │   └── alias
/// └── config
///     ├── get
///     └── set
/// ```
#[derive(Default)]
pub struct CommandRegistry {
    /// Nested HashMap structure: category name -> (command name -> command implementation)
    categories: HashMap<String, HashMap<String, Box<dyn Command>>>,
    /// Commands invoked without a category
    top_level: HashMap<String, Box<dyn Command>>,
}

impl CommandRegistry {
    /// Creates a new empty command registry.
    ///
    /// The registry starts with no commands registered. Commands must be added
    /// using the `register_command` method, typically during application initialization.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command under the category named in its metadata.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidDescriptor` if:
    /// - A required argument follows an optional one
    /// - The command name is already taken in its category
    /// - A top-level command and a category share a name
    pub fn register_command(&mut self, command: Box<dyn Command>) -> Result<(), CliError> {
        let metadata = command.metadata();
        Self::validate_descriptor(&metadata)?;

        let name = metadata.name.clone();

        match &metadata.category {
            Some(category) => {
                if self.top_level.contains_key(category) {
                    return Err(already_registered(category));
                }

                let commands = self.categories.entry(category.clone()).or_default();
                if commands.contains_key(&name) {
                    return Err(already_registered(&metadata.invocation_name()));
                }
                commands.insert(name, command);
            }
            None => {
                if self.top_level.contains_key(&name) || self.categories.contains_key(&name) {
                    return Err(already_registered(&name));
                }
                self.top_level.insert(name, command);
            }
        }

        Ok(())
    }

    /// Finds the command named by the leading tokens.
    ///
    /// Returns the command together with the remaining argument tokens.
    ///
    /// # Errors
    ///
    /// Returns `CliError::CommandNotFound` if no command matches.
    pub fn resolve<'a>(
        &'a self,
        tokens: &'a [String],
    ) -> Result<(&'a dyn Command, &'a [String]), CliError> {
        let Some((first, rest)) = tokens.split_first() else {
            return Err(CliError::CommandNotFound("no command given".to_string()));
        };

        if let Some(commands) = self.categories.get(first) {
            let Some((command_name, args)) = rest.split_first() else {
                return Err(CliError::CommandNotFound(format!(
                    "Missing command for category '{first}'"
                )));
            };

            let found_command = commands.get(command_name).ok_or_else(|| {
                CliError::CommandNotFound(format!("Failed to find command '{first} {command_name}'"))
            })?;

            return Ok((found_command.as_ref(), args));
        }

        let found_command = self.top_level.get(first).ok_or_else(|| {
            CliError::CommandNotFound(format!("Failed to find command '{first}'"))
        })?;

        Ok((found_command.as_ref(), rest))
    }

    /// Resolves, validates and executes one invocation.
    ///
    /// # Errors
    ///
    /// Returns resolution and validation errors without calling the command;
    /// other errors come from the command's execute method.
    #[instrument(skip(self))]
    pub async fn dispatch(&self, tokens: &[String]) -> CommandResult {
        let (command, raw_args) = self.resolve(tokens)?;
        let metadata = command.metadata();
        let invocation = Invocation::parse(raw_args);

        Self::validate_args(&metadata, &invocation)?;
        debug!(command = %metadata.invocation_name(), "Executing command");

        command.execute(&invocation).await
    }

    /// Lists all registered commands organized by category.
    ///
    /// Returns a vector of tuples where each tuple contains:
    /// - Category name (empty for top-level commands)
    /// - Vector of command names within that category
    ///
    /// Categories and commands are sorted alphabetically for consistent display.
    pub fn list_commands(&self) -> Vec<(String, Vec<String>)> {
        let mut top_level: Vec<String> = self.top_level.keys().cloned().collect();
        top_level.sort();

        let mut categories: Vec<(String, Vec<String>)> = self
            .categories
            .iter()
            .map(|(category, commands)| {
                let mut command_list: Vec<String> = commands.keys().cloned().collect();
                command_list.sort();

                (category.clone(), command_list)
            })
            .collect();

        categories.push((String::new(), top_level));
        categories.sort();

        categories
    }

    /// Metadata of every registered command, top-level commands first.
    pub fn commands(&self) -> Vec<CommandMetadata> {
        let mut top_level: Vec<CommandMetadata> =
            self.top_level.values().map(|c| c.metadata()).collect();
        top_level.sort_by(|a, b| a.name.cmp(&b.name));

        let mut categorized: Vec<CommandMetadata> = self
            .categories
            .values()
            .flat_map(|commands| commands.values().map(|c| c.metadata()))
            .collect();
        categorized.sort_by_key(CommandMetadata::invocation_name);

        top_level.extend(categorized);
        top_level
    }

    fn validate_descriptor(metadata: &CommandMetadata) -> Result<(), CliError> {
        if metadata.name.is_empty() || metadata.name.starts_with('-') {
            return Err(CliError::InvalidDescriptor(format!(
                "invalid command name '{}'",
                metadata.name
            )));
        }

        let mut seen_optional = false;
        for arg in &metadata.args {
            if arg.required && seen_optional {
                return Err(CliError::InvalidDescriptor(format!(
                    "required argument '{}' of '{}' follows an optional one",
                    arg.name,
                    metadata.invocation_name()
                )));
            }
            seen_optional |= !arg.required;
        }

        Ok(())
    }

    fn validate_args(metadata: &CommandMetadata, invocation: &Invocation) -> Result<(), CliError> {
        let required_count = metadata.required_count();
        let total_count = metadata.args.len();
        let given = invocation.args.len();

        if given < required_count {
            return Err(CliError::MissingArguments {
                usage: metadata.usage(),
            });
        }

        if given > total_count {
            return Err(CliError::InvalidArguments(format!(
                "Expected at most {total_count} arguments, got {given}",
            )));
        }

        if let Some(unknown) = invocation
            .flags
            .iter()
            .find(|flag| !metadata.flags.iter().any(|known| &known.name == *flag))
        {
            return Err(CliError::InvalidArguments(format!(
                "Unknown flag '--{unknown}' for '{}'",
                metadata.invocation_name()
            )));
        }

        Ok(())
    }

    /// Registers all available CLI commands in their respective categories.
    ///
    /// This function serves as the central registration point for all CLI commands,
    /// delegating to individual modules to register their commands. `help` is
    /// registered last so it can describe everything else.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidDescriptor` if any descriptor is rejected.
    pub fn register_all_commands(
        &mut self,
        usecases: &Usecases,
        config_path: &Path,
    ) -> Result<(), CliError> {
        init::register_commands(self, config_path)?;
        chat::register_commands(self, usecases.chat.clone())?;
        models::register_commands(self, usecases.models.clone())?;
        config::register_commands(self, config_path)?;
        help::register_commands(self)
    }
}

fn already_registered(name: &str) -> CliError {
    CliError::InvalidDescriptor(format!("'{name}' is already registered"))
}
