use crate::utils::error::{DescriberError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Region and name of the cluster to describe. Both are required.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ClusterRef {
    region: String,
    name: String,
}

impl ClusterRef {
    pub fn new(region: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let region = region.into();
        let name = name.into();
        if region.is_empty() || name.is_empty() {
            return Err(DescriberError::config("region and cluster name are required"));
        }
        Ok(Self { region, name })
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for ClusterRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.region, self.name)
    }
}

/// Fields not modelled explicitly; carried through to the output untouched.
pub type ExtraFields = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescription {
    pub service_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_definition: Option<String>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl ServiceDescription {
    pub fn named(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerDescription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// One task as reported by DescribeTasks. Nothing here is interpreted; the
/// record is only carried into the snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDescription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_definition_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stopped_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stopped_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub containers: Vec<ContainerDescription>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl TaskDescription {
    pub fn with_arn(task_arn: impl Into<String>) -> Self {
        Self {
            task_arn: Some(task_arn.into()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_ref_requires_region_and_name() {
        for (region, name) in [("", "demo"), ("us-east-1", ""), ("", "")] {
            match ClusterRef::new(region, name) {
                Err(DescriberError::ConfigError { message }) => {
                    assert_eq!(message, "region and cluster name are required")
                }
                other => panic!("expected ConfigError, got {:?}", other),
            }
        }

        let cluster = ClusterRef::new("us-east-1", "demo-cluster").unwrap();
        assert_eq!(cluster.region(), "us-east-1");
        assert_eq!(cluster.name(), "demo-cluster");
        assert_eq!(cluster.to_string(), "us-east-1/demo-cluster");
    }

    #[test]
    fn test_task_description_preserves_unknown_fields() {
        let raw = serde_json::json!({
            "taskArn": "arn:aws:ecs:us-east-1:123456789012:task/demo/abc",
            "lastStatus": "RUNNING",
            "createdAt": "2024-05-01T12:00:00Z",
            "tags": [{"key": "team", "value": "payments"}],
            "version": 3
        });

        let task: TaskDescription = serde_json::from_value(raw).unwrap();
        assert_eq!(task.last_status.as_deref(), Some("RUNNING"));
        assert!(task.created_at.is_some());
        assert_eq!(task.extra.get("version"), Some(&serde_json::json!(3)));

        let back = serde_json::to_value(&task).unwrap();
        assert_eq!(back["tags"][0]["value"], "payments");
        assert_eq!(back["version"], 3);
        assert!(back.get("containers").is_none());
        assert!(back.get("stoppedAt").is_none());
    }
}
