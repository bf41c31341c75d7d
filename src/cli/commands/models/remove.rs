use std::sync::Arc;

use async_trait::async_trait;

use super::CATEGORY_NAME;
use crate::{
    cli::{
        CliError, Command, CommandResult,
        types::{ArgType, CommandArg, CommandMetadata, Invocation},
    },
    usecases::ModelUsecases,
};

/// Removes a model and its files
///
/// Any download still running for the model is aborted first. Registered as
/// both `remove` and `delete`.
pub struct RemoveCommand {
    usecases: Arc<dyn ModelUsecases>,
    name: &'static str,
}

impl RemoveCommand {
    /// Creates `models remove` over the model usecases
    pub fn new(usecases: Arc<dyn ModelUsecases>) -> Self {
        Self {
            usecases,
            name: "remove",
        }
    }

    /// Creates the same command under the name `delete`
    pub fn delete(usecases: Arc<dyn ModelUsecases>) -> Self {
        Self {
            usecases,
            name: "delete",
        }
    }
}

#[async_trait]
impl Command for RemoveCommand {
    async fn execute(&self, invocation: &Invocation) -> CommandResult {
        let model_id = invocation.arg(0).ok_or_else(|| CliError::MissingArguments {
            usage: self.metadata().usage(),
        })?;

        Ok(self.usecases.remove_model(model_id).await?)
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: self.name.to_string(),
            description: "Remove a model by ID locally".to_string(),
            category: Some(CATEGORY_NAME.to_string()),
            args: vec![CommandArg::required(
                "model_id",
                "Model to remove",
                ArgType::ModelId,
            )],
            flags: Vec::new(),
            examples: vec![format!("cortex models {} tinyllama", self.name)],
        }
    }
}
