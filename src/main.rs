//! Cortex command-line entry point.
//!
//! Loads the configuration, composes the services and dispatches one command.
//! Every failure becomes one line on stderr and a distinct exit code.

use std::{env, io, process::ExitCode};

use cortex::{
    cli::{CliService, ExitStatus, formatting::format_error},
    config::{Config, ConfigPaths},
    services::Services,
    tracing_config,
    usecases::Usecases,
};
use tracing::{debug, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();

    match run(&args).await {
        Ok(status) => status.into(),
        Err(e) => {
            eprintln!("{}", format_error(&format!("Error: {e}")));
            ExitStatus::Failure.into()
        }
    }
}

/// Loads everything the CLI needs and executes the arguments.
///
/// # Errors
/// Returns error if the configuration cannot be loaded or the services
/// cannot be composed. Command failures are reported through the status.
async fn run(args: &[String]) -> Result<ExitStatus, Box<dyn std::error::Error>> {
    let config_path = ConfigPaths::main_config()?;
    let config = Config::load_from(&config_path)?;

    let data_dir = config.data_dir()?;
    let log_dir = ConfigPaths::log_dir(&data_dir);
    let _guard = match &log_dir {
        Ok(dir) => tracing_config::init_cli_mode(Some(dir), &config.general.log_level)?,
        Err(_) => tracing_config::init_cli_mode(None, &config.general.log_level)?,
    };
    if let Err(e) = &log_dir {
        warn!(error = %e, "File logging disabled");
    }

    debug!(config = %config_path.display(), data = %data_dir.display(), "Starting cortex");

    let services = Services::new(config)?;
    let usecases = Usecases::from_services(&services);
    let cli = CliService::new(&usecases, &config_path)?;

    let outcome = cli.dispatch(args).await;
    outcome.write_to(&mut io::stdout(), &mut io::stderr())?;

    Ok(outcome.status)
}
