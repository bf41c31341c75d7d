use std::sync::Arc;

use async_trait::async_trait;

use super::CATEGORY_NAME;
use crate::{
    cli::{
        Command, CommandResult,
        formatting::format_model_table,
        types::{CommandMetadata, Invocation},
    },
    usecases::ModelUsecases,
};

/// Lists locally available models
pub struct ListCommand {
    usecases: Arc<dyn ModelUsecases>,
}

impl ListCommand {
    /// Creates the command over the model usecases
    pub fn new(usecases: Arc<dyn ModelUsecases>) -> Self {
        Self { usecases }
    }
}

#[async_trait]
impl Command for ListCommand {
    async fn execute(&self, _invocation: &Invocation) -> CommandResult {
        let models = self.usecases.list_models().await?;

        if models.is_empty() {
            return Ok("No local models found".to_string());
        }

        Ok(format_model_table(&models))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "list".to_string(),
            description: "List locally available models".to_string(),
            category: Some(CATEGORY_NAME.to_string()),
            args: Vec::new(),
            flags: Vec::new(),
            examples: vec!["cortex models list".to_string()],
        }
    }
}
