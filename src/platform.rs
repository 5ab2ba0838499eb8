use std::env::consts::OS;

use serde::{Deserialize, Serialize};

/// Desktop platform the host process was compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    Macos,
    Linux,
}

impl Platform {
    /// Platform of the running process, if it is a supported desktop.
    pub fn current() -> Option<Self> {
        match OS {
            "windows" => Some(Self::Windows),
            "macos" => Some(Self::Macos),
            "linux" => Some(Self::Linux),
            _ => None,
        }
    }

    /// Whether the UI draws its own title bar. macOS keeps native decorations.
    pub fn uses_custom_title_bar(&self) -> bool {
        !matches!(self, Self::Macos)
    }
}
