//! Formatting utilities for CLI output.
//!
//! Provides consistent formatting for configuration values, model tables
//! and help text. Styling goes through `console`, which drops colors when
//! the target stream is not a color terminal.

use console::style;
use toml::Value;

use crate::services::ModelEntry;

/// Formats section headers with styling
pub fn format_header(text: &str) -> String {
    style(text).cyan().bold().for_stdout().to_string()
}

/// Formats command names with styling
pub fn format_command(text: &str) -> String {
    style(text).green().bold().for_stdout().to_string()
}

/// Formats category names with styling
pub fn format_category(text: &str) -> String {
    style(text).blue().bold().for_stdout().to_string()
}

/// Formats descriptions with muted styling
pub fn format_description(text: &str) -> String {
    style(text).dim().for_stdout().to_string()
}

/// Formats usage examples with styling
pub fn format_usage(text: &str) -> String {
    style(text).dim().for_stdout().to_string()
}

/// Formats error messages with red styling
///
/// Colors are only emitted when stderr is a terminal that supports them, so
/// redirected diagnostics stay plain text.
pub fn format_error(text: &str) -> String {
    style(text).red().bold().for_stderr().to_string()
}

/// Formats a TOML value for human-readable CLI output.
///
/// Converts TOML values into string representations suitable for
/// display in command-line interfaces. Complex types like arrays
/// and tables show their size rather than full contents.
///
/// # Examples
///
/// ```
/// use cortex::cli::formatting::format_toml_value;
///
/// let value = toml::Value::String("hello".to_string());
/// assert_eq!(format_toml_value(&value), "\"hello\"");
///
/// let value = toml::Value::Integer(42);
/// assert_eq!(format_toml_value(&value), "42");
/// ```
pub fn format_toml_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{s}\""),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Array(arr) => format!("[{}]", arr.len()),
        Value::Table(table) => format!("{{{}}}", table.len()),
        Value::Datetime(dt) => dt.to_string(),
    }
}

/// Formats model entries as an aligned plain-text table.
pub fn format_model_table(models: &[ModelEntry]) -> String {
    const HEADERS: [&str; 4] = ["ID", "ALIAS", "ENGINE", "STATUS"];

    let rows: Vec<[String; 4]> = models
        .iter()
        .map(|model| {
            [
                model.id.clone(),
                model.alias.clone().unwrap_or_else(|| "-".to_string()),
                model.engine.clone(),
                model.status.to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render = |cells: [&str; 4]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![render(HEADERS)];
    lines.extend(
        rows.iter()
            .map(|row| render([&row[0], &row[1], &row[2], &row[3]])),
    );
    lines.join("\n")
}

/// Formats one model as `key: value` lines.
pub fn format_model_details(model: &ModelEntry) -> String {
    [
        format!("id: {}", model.id),
        format!("alias: {}", model.alias.as_deref().unwrap_or("-")),
        format!("engine: {}", model.engine),
        format!("path: {}", model.path.display()),
        format!("status: {}", model.status),
    ]
    .join("\n")
}
