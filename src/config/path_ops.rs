use toml::Value;

use crate::CortexError;

/// Navigates through a TOML value structure following a dot-separated path
///
/// # Arguments
/// * `value` - The root TOML value to navigate from
/// * `path` - Dot-separated path (e.g., "server.port")
///
/// # Errors
/// * `CortexError::InvalidPath` - If the path doesn't exist or is malformed
pub(super) fn navigate_path<'a>(value: &'a Value, path: &str) -> Result<&'a Value, CortexError> {
    let parts: Vec<&str> = path.split('.').collect();
    let mut current = value;

    for (i, part) in parts.iter().enumerate() {
        match current {
            Value::Table(table) => {
                current = table.get(*part).ok_or_else(|| {
                    CortexError::InvalidPath(format!(
                        "Key '{}' not found in table at path '{}'",
                        part,
                        parts[..i].join(".")
                    ))
                })?;
            }
            _ => {
                return Err(CortexError::InvalidPath(format!(
                    "Cannot navigate into {} at path '{}'",
                    current.type_str(),
                    parts[..i].join("."),
                )));
            }
        }
    }

    Ok(current)
}

/// Sets a value at the specified path, creating intermediate tables
///
/// # Errors
/// * `CortexError::InvalidPath` - If the path is empty or crosses a non-table value
pub(super) fn set_value_at_path(
    value: &mut Value,
    path: &str,
    new_value: Value,
) -> Result<(), CortexError> {
    let parts: Vec<&str> = path.split('.').collect();

    let Some((last_key, parents)) = parts.split_last() else {
        return Err(CortexError::InvalidPath("Empty path".to_string()));
    };
    if last_key.is_empty() {
        return Err(CortexError::InvalidPath("Empty path".to_string()));
    }

    let mut current = value;
    for (i, part) in parents.iter().enumerate() {
        current = navigate_step_mut(current, part, &parts[..i])?;
    }

    match current {
        Value::Table(table) => {
            table.insert(last_key.to_string(), new_value);
            Ok(())
        }
        other => Err(CortexError::InvalidPath(format!(
            "Cannot insert into {}",
            other.type_str()
        ))),
    }
}

/// Performs a single navigation step, inserting an empty table when the key is missing
fn navigate_step_mut<'a>(
    current: &'a mut Value,
    key: &str,
    path_so_far: &[&str],
) -> Result<&'a mut Value, CortexError> {
    match current {
        Value::Table(table) => Ok(table
            .entry(key.to_string())
            .or_insert_with(|| Value::Table(toml::map::Map::new()))),
        other => Err(CortexError::InvalidPath(format!(
            "Cannot navigate into {} at path '{}'",
            other.type_str(),
            path_so_far.join(".")
        ))),
    }
}

/// Parses a CLI string into the most specific TOML scalar
pub(super) fn parse_scalar(value_str: &str) -> Value {
    if let Ok(b) = value_str.parse::<bool>() {
        return Value::Boolean(b);
    }

    if let Ok(i) = value_str.parse::<i64>() {
        return Value::Integer(i);
    }

    if let Ok(f) = value_str.parse::<f64>() {
        return Value::Float(f);
    }

    Value::String(value_str.to_string())
}
