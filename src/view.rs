use serde::{Deserialize, Serialize};

/// Navigational location within the console UI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum View {
    #[default]
    Home,
    InstanceOverview { runner: String, instance: String },
    NewInstance { runner: String, name: String },
}

impl View {
    pub fn instance_overview(runner: impl Into<String>, instance: impl Into<String>) -> Self {
        Self::InstanceOverview {
            runner: runner.into(),
            instance: instance.into(),
        }
    }

    pub fn new_instance(runner: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NewInstance {
            runner: runner.into(),
            name: name.into(),
        }
    }

    /// Runner the view is scoped to, if any.
    pub fn runner(&self) -> Option<&str> {
        match self {
            Self::Home => None,
            Self::InstanceOverview { runner, .. } | Self::NewInstance { runner, .. } => {
                Some(runner)
            }
        }
    }
}
