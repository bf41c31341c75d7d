//! Chat command.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    cli::{
        CliError, Command, CommandRegistry, CommandResult,
        types::{ArgType, CommandArg, CommandMetadata, Invocation},
    },
    usecases::ChatUsecases,
};

/// Registers the top-level `chat` command.
///
/// # Errors
///
/// Returns `CliError::InvalidDescriptor` if the descriptor is rejected.
pub fn register_commands(
    registry: &mut CommandRegistry,
    usecases: Arc<dyn ChatUsecases>,
) -> Result<(), CliError> {
    registry.register_command(Box::new(ChatCommand::new(usecases)))
}

/// Opens a chat session and optionally sends one message
pub struct ChatCommand {
    usecases: Arc<dyn ChatUsecases>,
}

impl ChatCommand {
    /// Creates the command over the chat usecases
    pub fn new(usecases: Arc<dyn ChatUsecases>) -> Self {
        Self { usecases }
    }
}

#[async_trait]
impl Command for ChatCommand {
    async fn execute(&self, invocation: &Invocation) -> CommandResult {
        let model_id = invocation.arg(0).ok_or_else(|| CliError::MissingArguments {
            usage: self.metadata().usage(),
        })?;

        let session = self.usecases.start_chat(model_id).await?;

        match invocation.arg(1) {
            Some(message) => Ok(self.usecases.send(&session, message).await?),
            None => Ok(format!(
                "Chat session with {} ({}) started at {}",
                session.model_id,
                session.engine,
                session.started_at.format("%Y-%m-%d %H:%M:%S UTC")
            )),
        }
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "chat".to_string(),
            description: "Start a chat session with a local model".to_string(),
            category: None,
            args: vec![
                CommandArg::required("model_id", "Model to chat with", ArgType::ModelId),
                CommandArg::optional("message", "Message to send", ArgType::String),
            ],
            flags: Vec::new(),
            examples: vec![
                "cortex chat tinyllama".to_string(),
                "cortex chat tinyllama \"Hello there\"".to_string(),
            ],
        }
    }
}
