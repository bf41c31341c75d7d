//! Cortex - local model runtime manager.
//!
//! Cortex configures and operates local machine-learning model runtimes.
//! The main features include:
//!
//! - Setup wizard choosing run mode, GPU family and instruction set
//! - Hierarchical CLI dispatching to model and chat usecases
//! - File-backed model list, download tracking and engine lookup
//! - TOML configuration with dotted-path access
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use cortex::{
//!     cli::CliService, config::{Config, ConfigPaths}, services::Services, usecases::Usecases,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config_path = ConfigPaths::main_config()?;
//! let services = Services::new(Config::load_from(&config_path)?)?;
//! let cli = CliService::new(&Usecases::from_services(&services), &config_path)?;
//!
//! let outcome = cli.dispatch(&["models".to_string(), "list".to_string()]).await;
//! println!("{:?}", outcome.stdout);
//! # Ok(())
//! # }
//! ```

/// Command-line interface over the usecases.
pub mod cli;

/// Configuration schema, loading and dotted-path access.
pub mod config;

/// Core error types and result aliases.
pub mod core;

/// Host platform detection.
pub mod platform;

/// Collaborators behind the usecases.
pub mod services;

/// Tracing subscriber setup.
pub mod tracing_config;

/// Usecase facade consumed by the CLI.
pub mod usecases;

/// Interactive runtime configuration wizard.
pub mod wizard;

/// Re-exported core types for convenience.
pub use core::{CortexError, Result};
