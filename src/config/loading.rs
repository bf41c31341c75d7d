use std::{
    fs,
    path::{Path, PathBuf},
};

use toml::Value;
use tracing::{debug, info, instrument};

use super::{Config, ConfigPaths, path_ops};
use crate::{CortexError, Result};

const FILE_HEADER: &str = "# cortex configuration file\n";

impl Config {
    /// Loads a configuration file, creating it with defaults if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The parent directory or file cannot be created
    /// - The file cannot be read
    /// - The TOML content is invalid or does not match the schema
    #[instrument]
    pub fn load_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            info!("Creating default configuration file");
            Config::default().save_to(path)?;
        }

        let content = fs::read_to_string(path).map_err(|e| CortexError::io_at(e, path))?;
        toml::from_str(&content).map_err(|e| CortexError::toml_parse(e, Some(path)))
    }

    /// Writes the configuration to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or any filesystem operation fails.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| CortexError::io_at(e, parent))?;
        }

        let body = toml::to_string_pretty(self).map_err(|e| CortexError::ConfigValidation {
            component: "config serialization".to_string(),
            details: e.to_string(),
        })?;

        debug!(path = %path.display(), "Writing configuration");
        fs::write(path, format!("{FILE_HEADER}{body}")).map_err(|e| CortexError::io_at(e, path))
    }

    /// Reads a value by dotted path, e.g. `server.port`.
    ///
    /// # Errors
    ///
    /// Returns `CortexError::InvalidPath` if the path does not resolve.
    pub fn get_by_path(&self, path: &str) -> Result<Value> {
        let root = self.to_value()?;
        path_ops::navigate_path(&root, path).cloned()
    }

    /// Returns a copy with the value at `path` replaced.
    ///
    /// The raw string is parsed into the most specific TOML scalar. The
    /// result must still match the schema.
    ///
    /// # Errors
    ///
    /// Returns `CortexError::InvalidPath` for unknown locations and
    /// `CortexError::ConfigValidation` when the new value has the wrong type
    /// or leaves an inconsistent runtime record.
    pub fn with_value_at_path(&self, path: &str, raw: &str) -> Result<Config> {
        let mut root = self.to_value()?;
        path_ops::set_value_at_path(&mut root, path, path_ops::parse_scalar(raw))?;

        let updated: Config = root.try_into().map_err(|e: toml::de::Error| {
            CortexError::ConfigValidation {
                component: path.to_string(),
                details: e.to_string(),
            }
        })?;

        if path_ops::navigate_path(&updated.to_value()?, path).is_err() {
            return Err(CortexError::InvalidPath(format!("Unknown config key '{path}'")));
        }

        updated
            .runtime
            .validate()
            .map_err(|details| CortexError::ConfigValidation {
                component: path.to_string(),
                details,
            })?;

        Ok(updated)
    }

    /// Root folder for models and logs.
    ///
    /// # Errors
    ///
    /// Returns an error when no folder is configured and HOME is unset.
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.general.data_folder {
            Some(folder) => Ok(folder.clone()),
            None => Ok(ConfigPaths::app_data_dir()?),
        }
    }

    fn to_value(&self) -> Result<Value> {
        Value::try_from(self).map_err(|e| CortexError::ConfigValidation {
            component: "config serialization".to_string(),
            details: e.to_string(),
        })
    }
}
