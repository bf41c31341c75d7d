use std::{
    env,
    io::{Error, ErrorKind},
    path::{Path, PathBuf},
};

/// Utility struct for managing configuration file paths
///
/// Provides methods to locate configuration and data directories following
/// the XDG Base Directory specification
pub struct ConfigPaths;

impl ConfigPaths {
    /// Returns the configuration directory path for the application
    ///
    /// Follows the XDG Base Directory specification:
    /// - First checks `XDG_CONFIG_HOME`
    /// - Falls back to `$HOME/.config`
    /// - Appends "cortex" to the base config directory
    ///
    /// # Errors
    /// Returns an error if neither `XDG_CONFIG_HOME` nor `HOME` environment variables are set
    pub fn config_dir() -> Result<PathBuf, Error> {
        let config_home = env::var("XDG_CONFIG_HOME")
            .or_else(|_| env::var("HOME").map(|home| format!("{home}/.config")))
            .map_err(|_| {
                Error::new(
                    ErrorKind::NotFound,
                    "Neither XDG_CONFIG_HOME nor HOME environment variable found",
                )
            })?;

        Ok(PathBuf::from(config_home).join("cortex"))
    }

    /// Returns the default data directory (`$HOME/.cortex`)
    ///
    /// # Errors
    /// Returns an error if HOME environment variable is not set
    pub fn app_data_dir() -> Result<PathBuf, Error> {
        env::var("HOME")
            .map(|home| PathBuf::from(home).join(".cortex"))
            .map_err(|_| Error::new(ErrorKind::NotFound, "HOME environment variable not found"))
    }

    /// Get the log directory inside a data folder
    ///
    /// Creates the directory if it doesn't exist.
    ///
    /// # Errors
    /// Returns error if directory cannot be created
    pub fn log_dir(data_dir: &Path) -> Result<PathBuf, Error> {
        let log_dir = data_dir.join("logs");

        if !log_dir.exists() {
            std::fs::create_dir_all(&log_dir)?;
        }

        Ok(log_dir)
    }

    /// Directory holding model files and the model list
    pub fn models_dir(data_dir: &Path) -> PathBuf {
        data_dir.join("models")
    }

    /// Returns the path to the main configuration file
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined
    pub fn main_config() -> Result<PathBuf, Error> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}
