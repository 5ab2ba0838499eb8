//! Instance-related type definitions.

use serde::{Deserialize, Serialize};

/// An instance hosted by a runner. Identified by `name` within its runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Instance {
    pub name: String,
    #[serde(rename = "type")]
    pub inst_type: InstanceType,
    pub status: InstanceStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceType {
    Volkanic { source: VolkanicSource },
}

/// Where a Volkanic instance image comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolkanicSource {
    Url(String),
    Base64(String),
}

/// Lifecycle status reported by the runner.
///
/// Plain statuses travel as bare strings (`"running"`); `Creating` carries
/// its progress as `{"creating": 42}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceStatus {
    Inactive,
    Running,
    Creating(f64),
    Deleting,
    Starting,
    Stopping,
}

/// Payload of the `new_instance` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstanceRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub inst_type: InstanceType,
}

impl InstanceStatus {
    /// Wire tag of the status.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::Running => "running",
            Self::Creating(_) => "creating",
            Self::Deleting => "deleting",
            Self::Starting => "starting",
            Self::Stopping => "stopping",
        }
    }

    pub fn progress(&self) -> Option<f64> {
        match self {
            Self::Creating(progress) => Some(*progress),
            _ => None,
        }
    }

    /// The runner is moving the instance between stable states.
    pub fn is_transitional(&self) -> bool {
        matches!(
            self,
            Self::Creating(_) | Self::Deleting | Self::Starting | Self::Stopping
        )
    }

    pub fn can_start(&self) -> bool {
        matches!(self, Self::Inactive)
    }

    pub fn can_stop(&self) -> bool {
        matches!(self, Self::Running)
    }
}

impl InstanceType {
    pub fn volkanic_url(url: impl Into<String>) -> Self {
        Self::Volkanic {
            source: VolkanicSource::Url(url.into()),
        }
    }

    pub fn volkanic_base64(encoded: impl Into<String>) -> Self {
        Self::Volkanic {
            source: VolkanicSource::Base64(encoded.into()),
        }
    }

    pub fn source(&self) -> &VolkanicSource {
        match self {
            Self::Volkanic { source } => source,
        }
    }
}

impl InstanceRequest {
    pub fn new(name: impl Into<String>, inst_type: InstanceType) -> Self {
        Self {
            name: name.into(),
            inst_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{Instance, InstanceRequest, InstanceStatus, InstanceType, VolkanicSource};

    #[test]
    fn decodes_instance_wire_shape() {
        let instance: Instance = serde_json::from_value(json!({
            "name": "alpine",
            "type": { "volkanic": { "source": { "url": "https://images.example/alpine.img" } } },
            "status": "running"
        }))
        .unwrap();

        assert_eq!(instance.name, "alpine");
        assert_eq!(instance.status, InstanceStatus::Running);
        assert_eq!(
            instance.inst_type.source(),
            &VolkanicSource::Url("https://images.example/alpine.img".to_string())
        );
    }

    #[test]
    fn creating_carries_progress() {
        let status: InstanceStatus = serde_json::from_value(json!({ "creating": 42 })).unwrap();
        assert_eq!(status, InstanceStatus::Creating(42.0));
        assert_eq!(status.progress(), Some(42.0));
        assert!(status.is_transitional());
    }

    #[test]
    fn bare_creating_tag_is_rejected() {
        assert!(serde_json::from_value::<InstanceStatus>(json!("creating")).is_err());
    }

    #[test]
    fn status_taxonomy_has_six_forms() {
        let mut kinds: Vec<&str> = [
            json!("inactive"),
            json!("running"),
            json!("deleting"),
            json!("starting"),
            json!("stopping"),
            json!({ "creating": 0 }),
        ]
        .into_iter()
        .map(|v| serde_json::from_value::<InstanceStatus>(v).unwrap().kind())
        .collect();

        kinds.sort_unstable();
        kinds.dedup();
        assert_eq!(kinds.len(), 6);

        for unknown in [json!("paused"), json!("Running"), json!({ "running": 1 })] {
            assert!(serde_json::from_value::<InstanceStatus>(unknown).is_err());
        }
    }

    #[test]
    fn plain_statuses_encode_as_strings() {
        assert_eq!(
            serde_json::to_value(InstanceStatus::Stopping).unwrap(),
            json!("stopping")
        );
        assert_eq!(
            serde_json::to_value(InstanceStatus::Creating(10.0)).unwrap(),
            json!({ "creating": 10.0 })
        );
    }

    #[test]
    fn start_and_stop_guards() {
        assert!(InstanceStatus::Inactive.can_start());
        assert!(!InstanceStatus::Running.can_start());
        assert!(InstanceStatus::Running.can_stop());
        assert!(!InstanceStatus::Starting.can_stop());
        assert!(!InstanceStatus::Running.is_transitional());
    }

    #[test]
    fn request_encodes_base64_source() {
        let request = InstanceRequest::new("dev", InstanceType::volkanic_base64("aGVsbG8="));
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "name": "dev", "type": { "volkanic": { "source": { "base64": "aGVsbG8=" } } } })
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = serde_json::from_value::<Instance>(json!({
            "name": "alpine",
            "type": { "volkanic": { "source": { "url": "u" } } },
            "status": "inactive",
            "id": "legacy"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn legacy_capitalized_tags_are_rejected() {
        let result =
            serde_json::from_value::<InstanceType>(json!({ "Volkanic": { "source": { "Url": ["u"] } } }));
        assert!(result.is_err());
    }
}
