//! Help output rendered from command metadata.

use async_trait::async_trait;

use crate::cli::{
    CliError, Command, CommandRegistry, CommandResult,
    formatting::{format_category, format_command, format_description, format_header, format_usage},
    types::{ArgType, CommandArg, CommandMetadata, Invocation},
};

/// Registers `help` with a snapshot of everything registered so far.
///
/// # Errors
///
/// Returns `CliError::InvalidDescriptor` if the descriptor is rejected.
pub fn register_commands(registry: &mut CommandRegistry) -> Result<(), CliError> {
    let mut commands = registry.commands();
    commands.push(HelpCommand::descriptor());

    registry.register_command(Box::new(HelpCommand { commands }))
}

/// Shows available commands, optionally for one category
pub struct HelpCommand {
    commands: Vec<CommandMetadata>,
}

impl HelpCommand {
    fn descriptor() -> CommandMetadata {
        CommandMetadata {
            name: "help".to_string(),
            description: "Show available commands".to_string(),
            category: None,
            args: vec![CommandArg::optional(
                "category",
                "Only show commands of this category",
                ArgType::String,
            )],
            flags: Vec::new(),
            examples: vec!["cortex help".to_string(), "cortex help models".to_string()],
        }
    }

    fn render_section(title: &str, commands: &[&CommandMetadata]) -> Vec<String> {
        let width = commands
            .iter()
            .map(|c| c.usage().len())
            .max()
            .unwrap_or_default();

        let mut lines = vec![title.to_string()];
        lines.extend(commands.iter().map(|c| {
            format!(
                "  {}  {}",
                format_command(&format!("{:<width$}", c.usage())),
                format_description(&c.description)
            )
        }));
        lines
    }
}

#[async_trait]
impl Command for HelpCommand {
    async fn execute(&self, invocation: &Invocation) -> CommandResult {
        let filter = invocation.arg(0);

        let mut top_level: Vec<&CommandMetadata> = Vec::new();
        let mut categories: Vec<(&str, Vec<&CommandMetadata>)> = Vec::new();

        for command in &self.commands {
            match command.category.as_deref() {
                None => top_level.push(command),
                Some(category) => {
                    let position = categories.iter().position(|(name, _)| *name == category);
                    match position {
                        Some(index) => categories[index].1.push(command),
                        None => categories.push((category, vec![command])),
                    }
                }
            }
        }

        if let Some(filter) = filter {
            let (_, members) = categories
                .iter()
                .find(|(name, _)| *name == filter)
                .ok_or_else(|| CliError::CommandNotFound(format!("Unknown category '{filter}'")))?;

            let mut lines = Self::render_section(&format_category(filter), members);
            lines.push(String::new());
            lines.push(format_header("Examples:"));
            lines.extend(
                members
                    .iter()
                    .flat_map(|c| c.examples.iter())
                    .map(|example| format!("  {}", format_usage(example))),
            );
            return Ok(lines.join("\n"));
        }

        let mut lines = vec![
            format_header("cortex: manage local model runtimes"),
            String::new(),
            format_usage("Usage: cortex <command> [args...] | cortex <category> <command> [args...]"),
            String::new(),
        ];
        lines.extend(Self::render_section(&format_header("Commands:"), &top_level));

        for (category, members) in &categories {
            lines.push(String::new());
            lines.extend(Self::render_section(&format_category(category), members));
        }

        Ok(lines.join("\n"))
    }

    fn metadata(&self) -> CommandMetadata {
        Self::descriptor()
    }
}
