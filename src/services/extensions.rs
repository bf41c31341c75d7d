use std::collections::BTreeMap;

use crate::platform::Platform;

/// Engine name for llama.cpp
pub const LLAMACPP: &str = "llamacpp";
/// Engine name for ONNX Runtime
pub const ONNX: &str = "onnxruntime";
/// Engine name for TensorRT-LLM
pub const TENSORRT_LLM: &str = "tensorrt-llm";

/// An inference engine extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineExtension {
    /// Registry key, matched against `ModelEntry::engine`
    pub name: String,
    /// Human readable name
    pub display_name: String,
    /// Platforms the engine runs on
    pub platforms: Vec<Platform>,
}

impl EngineExtension {
    /// Whether the engine runs on `platform`
    pub fn supports(&self, platform: Platform) -> bool {
        self.platforms.contains(&platform)
    }
}

/// Lookup of available engine extensions
pub trait ExtensionRegistry: Send + Sync {
    /// Finds an engine by name
    fn engine(&self, name: &str) -> Option<EngineExtension>;

    /// All registered engines, sorted by name
    fn engines(&self) -> Vec<EngineExtension>;
}

/// Registry holding a fixed set of engines
#[derive(Debug, Clone, Default)]
pub struct StaticExtensionRegistry {
    engines: BTreeMap<String, EngineExtension>,
}

impl StaticExtensionRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the engines bundled with cortex
    pub fn with_builtin_engines() -> Self {
        use Platform::{Linux, MacOs, Windows};

        Self::new()
            .with_engine(EngineExtension {
                name: LLAMACPP.to_string(),
                display_name: "llama.cpp".to_string(),
                platforms: vec![Linux, MacOs, Windows],
            })
            .with_engine(EngineExtension {
                name: ONNX.to_string(),
                display_name: "ONNX Runtime".to_string(),
                platforms: vec![Windows],
            })
            .with_engine(EngineExtension {
                name: TENSORRT_LLM.to_string(),
                display_name: "TensorRT-LLM".to_string(),
                platforms: vec![Linux, Windows],
            })
    }

    /// Adds or replaces an engine
    pub fn with_engine(mut self, engine: EngineExtension) -> Self {
        self.engines.insert(engine.name.clone(), engine);
        self
    }
}

impl ExtensionRegistry for StaticExtensionRegistry {
    fn engine(&self, name: &str) -> Option<EngineExtension> {
        self.engines.get(name).cloned()
    }

    fn engines(&self) -> Vec<EngineExtension> {
        self.engines.values().cloned().collect()
    }
}
