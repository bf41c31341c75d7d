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

/// Sets a unique alias for a model
pub struct AliasCommand {
    usecases: Arc<dyn ModelUsecases>,
}

impl AliasCommand {
    /// Creates the command over the model usecases
    pub fn new(usecases: Arc<dyn ModelUsecases>) -> Self {
        Self { usecases }
    }
}

#[async_trait]
impl Command for AliasCommand {
    async fn execute(&self, invocation: &Invocation) -> CommandResult {
        let (Some(model_id), Some(alias)) = (invocation.arg(0), invocation.arg(1)) else {
            return Err(CliError::MissingArguments {
                usage: self.metadata().usage(),
            });
        };

        let model = self.usecases.set_alias(model_id, alias).await?;
        Ok(format!("Model {} is now also known as {alias}", model.id))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "alias".to_string(),
            description: "Set a unique alias for a model".to_string(),
            category: Some(CATEGORY_NAME.to_string()),
            args: vec![
                CommandArg::required("model_id", "Model identifier", ArgType::ModelId),
                CommandArg::required("alias", "Alias to assign", ArgType::String),
            ],
            flags: Vec::new(),
            examples: vec!["cortex models alias tinyllama:1b tiny".to_string()],
        }
    }
}
