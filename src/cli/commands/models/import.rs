use std::{path::Path, sync::Arc};

use async_trait::async_trait;

use super::CATEGORY_NAME;
use crate::{
    cli::{
        CliError, Command, CommandResult,
        types::{ArgType, CommandArg, CommandMetadata, Invocation},
    },
    usecases::ModelUsecases,
};

/// Registers a model file or folder that already exists on disk
///
/// The files are referenced in place; removing the model later keeps them.
pub struct ImportCommand {
    usecases: Arc<dyn ModelUsecases>,
}

impl ImportCommand {
    /// Creates the command over the model usecases
    pub fn new(usecases: Arc<dyn ModelUsecases>) -> Self {
        Self { usecases }
    }
}

#[async_trait]
impl Command for ImportCommand {
    async fn execute(&self, invocation: &Invocation) -> CommandResult {
        let (Some(model_id), Some(path)) = (invocation.arg(0), invocation.arg(1)) else {
            return Err(CliError::MissingArguments {
                usage: self.metadata().usage(),
            });
        };

        let model = self
            .usecases
            .import_model(model_id, Path::new(path), invocation.arg(2))
            .await?;

        Ok(format!(
            "Model {} is imported successfully from {}",
            model.id,
            model.path.display()
        ))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "import".to_string(),
            description: "Import a local model file under a new ID".to_string(),
            category: Some(CATEGORY_NAME.to_string()),
            args: vec![
                CommandArg::required("model_id", "Identifier for the model", ArgType::ModelId),
                CommandArg::required("path", "Model file or folder", ArgType::Path),
                CommandArg::optional("engine", "Engine to run it with (default llamacpp)", ArgType::String),
            ],
            flags: Vec::new(),
            examples: vec![
                "cortex models import llama3 ~/Downloads/llama3.gguf".to_string(),
                "cortex models import phi3 ./phi3-onnx onnxruntime".to_string(),
            ],
        }
    }
}
