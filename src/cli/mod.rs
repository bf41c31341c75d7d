//! Command-line interface for cortex.
//!
//! Provides a hierarchical command system over the usecase facade. Commands
//! are organized by category, validated against their metadata before they
//! run, and automatically generate help text from that metadata.

mod commands;
mod exit;
pub mod formatting;
mod registry;
mod service;
mod types;


pub use exit::ExitStatus;
pub use registry::CommandRegistry;
pub use service::{CliService, Outcome};
pub use types::{
    ArgType, CliError, Command, CommandArg, CommandFlag, CommandMetadata, CommandResult,
    Invocation,
};
