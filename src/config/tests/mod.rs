//! Unit tests for config module
//!
//! Tests configuration types, defaults, serialization and dotted-path access.

#![allow(clippy::panic, clippy::unwrap_used)]

use std::fs;

use tempfile::TempDir;

use crate::CortexError;
use crate::config::{Config, ConfigPaths};
use crate::wizard::{GpuType, Instructions, RunMode};

#[test]
fn config_default() {
    let config = Config::default();

    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.server.base_url(), "http://127.0.0.1:3928");
    assert!(config.runtime.is_empty());
    assert_eq!(config.init.default_instructions, None);
}

#[test]
fn config_serialize_toml() {
    let config = Config::default();

    let toml_str = toml::to_string(&config).unwrap();
    assert!(toml_str.contains("[general]"));
    assert!(toml_str.contains("[server]"));
    assert!(!toml_str.contains("runMode"));
}

#[test]
fn config_deserialize_runtime_section() {
    let toml_str = r#"
        [runtime]
        runMode = "GPU"
        gpuType = "Others (Vulkan)"
        instructions = "AVX"

        [init]
        default_instructions = "AVX2"
    "#;

    let config: Config = toml::from_str(toml_str).unwrap();

    assert_eq!(config.runtime.run_mode, Some(RunMode::Gpu));
    assert_eq!(config.runtime.gpu_type, Some(GpuType::Vulkan));
    assert_eq!(config.runtime.instructions, Some(Instructions::Avx));
    assert_eq!(config.init.default_instructions, Some(Instructions::Avx2));
}

#[test]
fn config_empty_toml() {
    let config: Config = toml::from_str("").unwrap();

    assert_eq!(config, Config::default());
}

#[test]
fn config_invalid_toml() {
    let invalid_toml = r#"
        [general
        invalid syntax here
    "#;

    let result: Result<Config, toml::de::Error> = toml::from_str(invalid_toml);

    assert!(result.is_err());
}

#[test]
fn config_unknown_fields() {
    let toml_with_unknown = r#"
        [general]
        log_level = "warn"
        unknown_field = "should be ignored"

        [unknown_section]
        some_field = "ignored"
    "#;

    let config: Config = toml::from_str(toml_with_unknown).unwrap();
    assert_eq!(config.general.log_level, "warn");
}

#[test]
fn config_paths_end_with_app_name() {
    if std::env::var("HOME").is_ok() {
        let main_path = ConfigPaths::main_config().unwrap();
        assert!(main_path.ends_with("cortex/config.toml"));

        let data_dir = ConfigPaths::app_data_dir().unwrap();
        assert!(data_dir.ends_with(".cortex"));
        assert!(ConfigPaths::models_dir(&data_dir).ends_with(".cortex/models"));
    }
}

#[test]
fn load_from_creates_default_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested/config.toml");

    let config = Config::load_from(&path).unwrap();

    assert!(path.exists());
    assert_eq!(config, Config::default());
    assert!(
        fs::read_to_string(&path)
            .unwrap()
            .starts_with("# cortex configuration file")
    );
}

#[test]
fn save_and_reload_keeps_runtime_record() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");

    let mut config = Config::default();
    config.runtime.run_mode = Some(RunMode::Cpu);
    config.runtime.instructions = Some(Instructions::Avx512);
    config.save_to(&path).unwrap();

    let reloaded = Config::load_from(&path).unwrap();
    assert_eq!(reloaded.runtime, config.runtime);
}

#[test]
fn load_from_reports_parse_location() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, "[server]\nport = \"not a number\"\n").unwrap();

    let error = Config::load_from(&path).unwrap_err();

    assert!(error.to_string().contains("config.toml"));
}

#[test]
fn get_by_path_reads_nested_values() {
    let config = Config::default();

    assert_eq!(
        config.get_by_path("server.port").unwrap(),
        toml::Value::Integer(3928)
    );
    assert!(config.get_by_path("server.missing").is_err());
    assert!(config.get_by_path("server.port.deeper").is_err());
}

#[test]
fn with_value_at_path_parses_and_validates() {
    let config = Config::default();

    let updated = config.with_value_at_path("server.port", "39281").unwrap();
    assert_eq!(updated.server.port, 39281);

    let updated = config
        .with_value_at_path("init.default_instructions", "AVX-512")
        .unwrap();
    assert_eq!(updated.init.default_instructions, Some(Instructions::Avx512));

    assert!(config.with_value_at_path("server.port", "abc").is_err());
    assert!(config.with_value_at_path("runtime.runMode", "TPU").is_err());
    assert!(config.with_value_at_path("general.nonexistent", "1").is_err());
    assert!(config.with_value_at_path("", "1").is_err());
}

#[test]
fn gpu_type_requires_gpu_run_mode() {
    let config = Config::default();

    let orphan = config.with_value_at_path("runtime.gpuType", "Nvidia");
    assert!(matches!(orphan, Err(CortexError::ConfigValidation { .. })));

    let cpu = config.with_value_at_path("runtime.runMode", "CPU").unwrap();
    assert!(cpu.with_value_at_path("runtime.gpuType", "Nvidia").is_err());

    let gpu = config
        .with_value_at_path("runtime.runMode", "GPU")
        .unwrap()
        .with_value_at_path("runtime.gpuType", "Nvidia")
        .unwrap();
    assert_eq!(gpu.runtime.gpu_type, Some(GpuType::Nvidia));

    assert!(gpu.with_value_at_path("runtime.runMode", "CPU").is_err());
}
