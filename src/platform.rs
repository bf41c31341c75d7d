//! Host platform detection.
//!
//! The wizard consults the platform before deciding whether run-mode and
//! instruction-set questions apply at all.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Host platform category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Apple desktop (macOS). Runtimes there always use Metal/CPU builds.
    MacOs,
    /// Linux
    Linux,
    /// Windows
    Windows,
    /// Anything else the runtime can be built for
    Other,
}

impl Platform {
    /// Returns the platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Other
        }
    }

    /// Whether this is the Apple desktop category.
    pub fn is_apple_desktop(self) -> bool {
        self == Platform::MacOs
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::MacOs => "macos",
            Platform::Linux => "linux",
            Platform::Windows => "windows",
            Platform::Other => "other",
        };
        f.write_str(name)
    }
}
