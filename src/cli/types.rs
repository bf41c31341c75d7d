use async_trait::async_trait;
use thiserror::Error;

use crate::{usecases::UsecaseError, wizard::WizardError};

/// Errors that can occur during CLI command execution.
///
/// This enum represents all possible error conditions in the CLI system,
/// from command discovery failures to usecase errors. Each variant maps onto
/// one [`ExitStatus`](super::ExitStatus).
#[derive(Error, Debug)]
pub enum CliError {
    /// A command or category was not found in the registry.
    ///
    /// This occurs when users specify a command that doesn't exist, either
    /// because the category is invalid or the command name is wrong within
    /// a valid category.
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    /// Fewer positional arguments than the command requires.
    #[error("Missing arguments: expected {usage}")]
    MissingArguments {
        /// Usage line of the command
        usage: String,
    },

    /// Invalid arguments were provided to a command.
    ///
    /// This error is returned when argument validation fails, such as
    /// too many arguments or unknown flags.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// A command descriptor breaks the registration rules.
    #[error("Invalid command descriptor: {0}")]
    InvalidDescriptor(String),

    /// An error occurred in the configuration system.
    ///
    /// This wraps errors from the config file, such as invalid paths,
    /// type mismatches, or file system issues.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The bound usecase failed; its message is forwarded as is.
    #[error("{0}")]
    Usecase(#[from] UsecaseError),

    /// The setup wizard failed.
    #[error("Setup failed: {0}")]
    Setup(WizardError),

    /// The operator cancelled an interactive session.
    #[error("Cancelled")]
    Cancelled,

    /// An I/O operation failed.
    ///
    /// This automatically converts from `std::io::Error` for file
    /// operations or terminal I/O failures.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<WizardError> for CliError {
    fn from(error: WizardError) -> Self {
        match error {
            WizardError::Cancelled => CliError::Cancelled,
            other => CliError::Setup(other),
        }
    }
}

/// Type alias for command execution results.
///
/// All CLI commands return this type, providing either a success message
/// as a String or a CliError describing what went wrong. This standardizes
/// error handling across the entire CLI system.
pub type CommandResult = Result<String, CliError>;

/// Specification for a single positional argument.
///
/// This struct defines the metadata for command arguments, enabling
/// automatic help generation and validation. Arguments can be required or
/// optional; a required argument may not follow an optional one.
#[derive(Debug, Clone)]
pub struct CommandArg {
    /// The name of the argument (e.g., "model_id", "path", "value").
    pub name: String,

    /// Human-readable description of what this argument does.
    pub description: String,

    /// Whether this argument is required for command execution.
    pub required: bool,

    /// The expected type of this argument for help display.
    pub value_type: ArgType,
}

impl CommandArg {
    /// Required argument
    pub fn required(name: &str, description: &str, value_type: ArgType) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            required: true,
            value_type,
        }
    }

    /// Optional argument
    pub fn optional(name: &str, description: &str, value_type: ArgType) -> Self {
        Self {
            required: false,
            ..Self::required(name, description, value_type)
        }
    }

    /// Placeholder shown in usage lines: `<name>` or `[name]`
    pub fn placeholder(&self) -> String {
        if self.required {
            format!("<{}>", self.name)
        } else {
            format!("[{}]", self.name)
        }
    }
}

/// Type classification for command arguments.
///
/// Provides hints in help text about what kind of value is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
    /// A general string value.
    String,

    /// A model identifier or alias.
    ModelId,

    /// A dotted configuration path.
    Path,
}

/// A `--name` switch accepted by a command.
#[derive(Debug, Clone)]
pub struct CommandFlag {
    /// Flag name without the leading dashes.
    pub name: String,

    /// Human-readable description of the flag.
    pub description: String,
}

/// Complete metadata for a CLI command.
///
/// This struct serves as the single source of truth for everything about
/// a command: its identity, arguments, usage examples, and categorization.
/// The CLI system uses this metadata for help generation, argument validation,
/// and command discovery.
#[derive(Debug, Clone)]
pub struct CommandMetadata {
    /// The command name (e.g., "remove", "get", "init").
    pub name: String,

    /// Brief description of what this command does.
    pub description: String,

    /// Category this command belongs to (e.g., "models"); `None` for
    /// top-level commands.
    pub category: Option<String>,

    /// Ordered positional arguments.
    pub args: Vec<CommandArg>,

    /// Switches the command understands.
    pub flags: Vec<CommandFlag>,

    /// Example usage strings to show in help text.
    pub examples: Vec<String>,
}

impl CommandMetadata {
    /// Command tokens as typed by the operator, e.g. `models remove`.
    pub fn invocation_name(&self) -> String {
        match &self.category {
            Some(category) => format!("{category} {}", self.name),
            None => self.name.clone(),
        }
    }

    /// Full usage line, e.g. `models alias <model_id> <alias>`.
    pub fn usage(&self) -> String {
        let mut usage = self.invocation_name();
        for arg in &self.args {
            usage.push(' ');
            usage.push_str(&arg.placeholder());
        }
        for flag in &self.flags {
            usage.push_str(&format!(" [--{}]", flag.name));
        }
        usage
    }

    /// Number of arguments that must be supplied.
    pub fn required_count(&self) -> usize {
        self.args.iter().filter(|arg| arg.required).count()
    }
}

/// One parsed command invocation.
///
/// Tokens starting with `--` are flags; everything else is positional. A bare
/// `--` ends flag parsing, so every later token is positional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    /// Positional arguments in order.
    pub args: Vec<String>,

    /// Flag names without the leading dashes.
    pub flags: Vec<String>,
}

impl Invocation {
    /// Splits raw tokens into positional arguments and flags.
    pub fn parse(tokens: &[String]) -> Self {
        let mut invocation = Self::default();
        let mut remaining = tokens.iter();

        for token in remaining.by_ref() {
            match token.strip_prefix("--") {
                Some("") => break,
                Some(flag) => invocation.flags.push(flag.to_string()),
                None => invocation.args.push(token.clone()),
            }
        }
        invocation.args.extend(remaining.cloned());

        invocation
    }

    /// Positional argument at `index`.
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// Whether `--name` was passed.
    pub fn has_flag(&self, name: &str) -> bool {
        self.flags.iter().any(|flag| flag == name)
    }
}

/// Trait defining the interface for all CLI commands.
///
/// All commands implement this trait to provide consistent execution
/// and metadata discovery. Commands receive their usecases through
/// their constructors.
#[async_trait]
pub trait Command: Send + Sync {
    /// Executes the command with an already validated invocation.
    ///
    /// The registry has checked the positional count and the flags against
    /// the command's metadata before calling this.
    ///
    /// # Errors
    ///
    /// Returns `CliError` for any execution failures, including:
    /// - Usecase failures
    /// - Configuration system errors
    /// - Operator cancellation
    async fn execute(&self, invocation: &Invocation) -> CommandResult;

    /// Returns the complete metadata for this command.
    ///
    /// This metadata is used by the CLI system for help generation,
    /// argument validation, and command discovery.
    fn metadata(&self) -> CommandMetadata;
}
