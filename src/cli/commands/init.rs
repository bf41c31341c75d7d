//! Runtime setup command.

use std::{
    io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tracing::{info, instrument};

use crate::{
    cli::{
        CliError, Command, CommandRegistry, CommandResult,
        types::{CommandFlag, CommandMetadata, Invocation},
    },
    config::Config,
    wizard::{
        DialoguerPrompter, LinePrompter, Prompter, RuntimeConfiguration, Wizard, WizardContext,
        WizardOptions, init_questions,
    },
};

const SILENT_FLAG: &str = "silent";

/// Registers the top-level `init` command.
///
/// # Errors
///
/// Returns `CliError::InvalidDescriptor` if the descriptor is rejected.
pub fn register_commands(registry: &mut CommandRegistry, config_path: &Path) -> Result<(), CliError> {
    registry.register_command(Box::new(InitCommand::new(config_path)))
}

/// Runs the setup wizard and stores the result in `[runtime]`
///
/// The wizard blocks on operator input, so it runs on the blocking pool.
/// A cancelled run leaves the config file untouched.
pub struct InitCommand {
    config_path: PathBuf,
}

impl InitCommand {
    /// Creates the command writing to the given config file
    pub fn new(config_path: &Path) -> Self {
        Self {
            config_path: config_path.to_path_buf(),
        }
    }
}

fn terminal_prompter() -> Box<dyn Prompter> {
    if console::user_attended() {
        Box::new(DialoguerPrompter::new())
    } else {
        Box::new(LinePrompter::stdio())
    }
}

fn describe(record: &RuntimeConfiguration, context: &WizardContext) -> String {
    let mut fields = Vec::new();
    if let Some(run_mode) = record.run_mode {
        fields.push(format!("runMode={run_mode}"));
    }
    if let Some(gpu_type) = record.gpu_type {
        fields.push(format!("gpuType={gpu_type}"));
    }
    if let Some(instructions) = record.instructions {
        fields.push(format!("instructions={instructions}"));
    }

    let mut summary = format!("Runtime configured for {}", context.platform);
    if !fields.is_empty() {
        summary.push_str(": ");
        summary.push_str(&fields.join(", "));
    }

    format!(
        "{summary}\nEngine build: {}",
        record.engine_variant(context.platform)
    )
}

#[async_trait]
impl Command for InitCommand {
    #[instrument(skip(self, invocation), fields(silent = invocation.has_flag(SILENT_FLAG)))]
    async fn execute(&self, invocation: &Invocation) -> CommandResult {
        let config =
            Config::load_from(&self.config_path).map_err(|e| CliError::ConfigError(e.to_string()))?;

        let graph =
            init_questions(config.init.into()).map_err(|e| CliError::ConfigError(e.to_string()))?;
        let options = WizardOptions {
            interactive: !invocation.has_flag(SILENT_FLAG),
        };
        let context = WizardContext::detect();

        let record = tokio::task::spawn_blocking(move || {
            let prompter = terminal_prompter();
            Wizard::new(&graph, prompter.as_ref())
                .with_options(options)
                .configure(&context)
        })
        .await
        .map_err(|e| CliError::IoError(io::Error::other(e)))??;

        let summary = describe(&record, &context);

        let mut updated = config;
        updated.runtime = record;
        updated
            .save_to(&self.config_path)
            .map_err(|e| CliError::ConfigError(e.to_string()))?;

        info!(path = %self.config_path.display(), "Saved runtime configuration");
        Ok(summary)
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "init".to_string(),
            description: "Configure the local runtime (run mode, GPU, instruction set)".to_string(),
            category: None,
            args: Vec::new(),
            flags: vec![CommandFlag {
                name: SILENT_FLAG.to_string(),
                description: "Take every default without prompting".to_string(),
            }],
            examples: vec!["cortex init".to_string(), "cortex init --silent".to_string()],
        }
    }
}
