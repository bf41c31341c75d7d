use std::sync::Arc;

use async_trait::async_trait;

use super::CATEGORY_NAME;
use crate::{
    cli::{
        CliError, Command, CommandResult,
        formatting::format_model_details,
        types::{ArgType, CommandArg, CommandMetadata, Invocation},
    },
    usecases::ModelUsecases,
};

/// Shows a local model
pub struct GetCommand {
    usecases: Arc<dyn ModelUsecases>,
}

impl GetCommand {
    /// Creates the command over the model usecases
    pub fn new(usecases: Arc<dyn ModelUsecases>) -> Self {
        Self { usecases }
    }
}

#[async_trait]
impl Command for GetCommand {
    async fn execute(&self, invocation: &Invocation) -> CommandResult {
        let model_id = invocation.arg(0).ok_or_else(|| CliError::MissingArguments {
            usage: self.metadata().usage(),
        })?;

        let model = self.usecases.get_model(model_id).await?;
        Ok(format_model_details(&model))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "get".to_string(),
            description: "Show a local model".to_string(),
            category: Some(CATEGORY_NAME.to_string()),
            args: vec![CommandArg::required(
                "model_id",
                "Model identifier or alias",
                ArgType::ModelId,
            )],
            flags: Vec::new(),
            examples: vec!["cortex models get tinyllama".to_string()],
        }
    }
}
