use std::{env, error::Error, path::Path};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

const DAYS_TO_KEEP: usize = 7;
const CLI_DEFAULT_LEVEL: &str = "warn";

fn json_requested() -> bool {
    env::var("CORTEX_LOG_FORMAT").is_ok_and(|format| format == "json")
}

/// Initialize tracing for a CLI invocation
///
/// Console logs go to stderr so command output on stdout stays clean. They
/// follow `RUST_LOG` and default to "warn". When `log_dir` is given, a
/// daily-rotated file in it additionally receives everything at
/// `file_level`. `CORTEX_LOG_FORMAT=json` switches both layers to JSON.
///
/// The returned guard flushes the file writer and must be kept alive until
/// the process exits.
///
/// # Errors
/// Returns error if the log file cannot be created or a subscriber is
/// already installed
pub fn init_cli_mode(
    log_dir: Option<&Path>,
    file_level: &str,
) -> Result<Option<WorkerGuard>, Box<dyn Error>> {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(CLI_DEFAULT_LEVEL));
    let json = json_requested();

    let console_layer = if json {
        fmt::layer()
            .json()
            .with_target(true)
            .with_level(true)
            .with_writer(std::io::stderr)
            .with_filter(console_filter)
            .boxed()
    } else {
        fmt::layer()
            .compact()
            .with_target(false)
            .with_level(true)
            .with_writer(std::io::stderr)
            .with_filter(console_filter)
            .boxed()
    };

    let Some(log_dir) = log_dir else {
        tracing_subscriber::registry().with(console_layer).try_init()?;
        return Ok(None);
    };

    let file_appender = tracing_appender::rolling::Builder::new()
        .rotation(tracing_appender::rolling::Rotation::DAILY)
        .max_log_files(DAYS_TO_KEEP)
        .filename_prefix("cortex")
        .filename_suffix("log")
        .build(log_dir)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_filter = EnvFilter::try_new(file_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = if json {
        fmt::layer()
            .json()
            .with_target(true)
            .with_level(true)
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_filter(file_filter)
            .boxed()
    } else {
        fmt::layer()
            .compact()
            .with_target(true)
            .with_level(true)
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_filter(file_filter)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(Some(guard))
}
