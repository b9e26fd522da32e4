use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// An artifact as reported by `GET /repos/{owner}/{repo}/actions/artifacts`.
///
/// Only the fields the pipeline looks at are typed; everything else the
/// platform sends is kept in `extra` so the manifest mirrors the API record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub size_in_bytes: u64,
    /// Outer `None` when the platform omits the field, `Some(None)` for an
    /// explicit `null`. Only `Some(Some(true))` counts as expired.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub expired: Option<Option<bool>>,
    #[serde(default)]
    pub workflow_run: Option<WorkflowRunRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowRunRef {
    #[serde(default)]
    pub head_branch: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Distinguishes an explicit `null` from a missing field; missing fields go
/// through `#[serde(default)]` and never reach this.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl ArtifactRecord {
    pub fn is_expired(&self) -> bool { self.expired == Some(Some(true)) }

    pub fn head_branch(&self) -> Option<&str> {
        self.workflow_run.as_ref().and_then(|run| run.head_branch.as_deref())
    }
}

impl fmt::Display for ArtifactRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "id: {} name: {} size: {} branch: {} expired: {}",
            self.id,
            self.name,
            self.size_in_bytes,
            self.head_branch().unwrap_or("[unknown]"),
            match self.expired {
                Some(Some(true)) => "true",
                Some(Some(false)) => "false",
                Some(None) => "null",
                None => "undefined",
            }
        )
    }
}

/// A single page of the artifact listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtifactPage {
    #[serde(default)]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub artifacts: Vec<ArtifactRecord>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> Value {
        json!({
            "id": 11,
            "node_id": "MDg6QXJ0aWZhY3QxMQ==",
            "name": "build-linux",
            "size_in_bytes": 556,
            "url": "https://api.github.com/repos/octo/widgets/actions/artifacts/11",
            "archive_download_url": "https://api.github.com/repos/octo/widgets/actions/artifacts/11/zip",
            "expired": false,
            "created_at": "2020-01-10T14:59:22Z",
            "expires_at": "2020-03-21T14:59:22Z",
            "updated_at": "2020-02-21T14:59:22Z",
            "workflow_run": {
                "id": 2332938,
                "repository_id": 1296269,
                "head_repository_id": 1296269,
                "head_branch": "main",
                "head_sha": "328faa0536e6fef19753d9d91dc96a9931694ce3"
            }
        })
    }

    #[test]
    fn test_deserialize_artifact() {
        let artifact: ArtifactRecord = serde_json::from_value(sample()).unwrap();
        assert_eq!(artifact.id, 11);
        assert_eq!(artifact.name, "build-linux");
        assert_eq!(artifact.size_in_bytes, 556);
        assert_eq!(artifact.expired, Some(Some(false)));
        assert!(!artifact.is_expired());
        assert_eq!(artifact.head_branch(), Some("main"));
        assert_eq!(artifact.extra["node_id"], "MDg6QXJ0aWZhY3QxMQ==");
        assert_eq!(artifact.workflow_run.as_ref().unwrap().extra["id"], 2332938);
    }

    #[test]
    fn test_preserves_unknown_fields() {
        let artifact: ArtifactRecord = serde_json::from_value(sample()).unwrap();
        assert_eq!(serde_json::to_value(&artifact).unwrap(), sample());
    }

    #[test]
    fn test_missing_optional_fields() {
        let artifact: ArtifactRecord =
            serde_json::from_value(json!({ "id": 3, "name": "logs", "workflow_run": null }))
                .unwrap();
        assert_eq!(artifact.expired, None);
        assert_eq!(artifact.size_in_bytes, 0);
        assert_eq!(artifact.head_branch(), None);
        assert_eq!(
            artifact.to_string(),
            "id: 3 name: logs size: 0 branch: [unknown] expired: undefined"
        );
    }

    #[test]
    fn test_display() {
        let artifact: ArtifactRecord = serde_json::from_value(sample()).unwrap();
        assert_eq!(
            artifact.to_string(),
            "id: 11 name: build-linux size: 556 branch: main expired: false"
        );
    }

    #[test]
    fn test_expired_null_round_trip() {
        let value = json!({ "id": 4, "name": "logs", "expired": null, "workflow_run": null });
        let artifact: ArtifactRecord = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(artifact.expired, Some(None));
        assert!(!artifact.is_expired());
        assert!(artifact.to_string().ends_with("expired: null"));
        let written = serde_json::to_value(&artifact).unwrap();
        assert_eq!(written.get("expired"), Some(&Value::Null));
        assert_eq!(
            written,
            json!({
                "id": 4,
                "name": "logs",
                "size_in_bytes": 0,
                "expired": null,
                "workflow_run": null
            })
        );
    }

    #[test]
    fn test_deserialize_page() {
        let page: ArtifactPage =
            serde_json::from_value(json!({ "total_count": 1, "artifacts": [sample()] })).unwrap();
        assert_eq!(page.total_count, Some(1));
        assert_eq!(page.artifacts.len(), 1);
    }
}
