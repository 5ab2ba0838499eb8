//! Runner type definitions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::instance::Instance;

/// Remote protocol version this console speaks.
pub const SUPPORTED_PROTOCOL: u64 = 1;

/// Runners keyed by runner id.
pub type RunnerMap = HashMap<String, Runner>;

/// An execution agent and the instances it currently reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Runner {
    pub name: String,
    pub url: String,
    pub connected: bool,
    /// Instances keyed by instance name.
    pub instances: HashMap<String, Instance>,
}

impl Runner {
    pub fn instance(&self, name: &str) -> Option<&Instance> {
        self.instances.get(name)
    }

    pub fn has_instance(&self, name: &str) -> bool {
        self.instances.contains_key(name)
    }

    /// Instance names in display order.
    pub fn instance_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.instances.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Descriptor returned by `runner_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerInfo {
    pub version: String,
    pub protocol: u64,
    pub mode: RunnerMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunnerMode {
    #[serde(rename = "noAuth")]
    NoAuth,
}

impl RunnerInfo {
    pub fn is_supported(&self) -> bool {
        self.protocol == SUPPORTED_PROTOCOL
    }
}
