use std::path::Path;

use anyhow::Context;

use crate::{Error, Result, models::ArtifactRecord};

/// Write `artifacts` as pretty-printed JSON to `path`, replacing any existing
/// file. Missing parent directories are created.
pub fn write(path: &Path, artifacts: &[ArtifactRecord]) -> Result<()> {
    let wrap = |cause: anyhow::Error| Error::Write { path: path.to_path_buf(), cause };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))
            .map_err(wrap)?;
    }
    let data = serde_json::to_vec_pretty(artifacts)
        .context("Failed to serialize artifacts")
        .map_err(wrap)?;
    std::fs::write(path, data).context("Failed to write file").map_err(wrap)
}

#[cfg(test)]
pub(crate) fn read(path: &Path) -> anyhow::Result<Vec<ArtifactRecord>> {
    let data =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("Failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn artifacts() -> Vec<ArtifactRecord> {
        serde_json::from_value(json!([
            {
                "id": 1,
                "name": "build-linux",
                "size_in_bytes": 1024,
                "expired": false,
                "archive_download_url": "https://api.github.com/repos/octo/widgets/actions/artifacts/1/zip",
                "workflow_run": { "id": 7, "head_branch": "main" }
            },
            { "id": 4, "name": "build-mac", "size_in_bytes": 2048, "workflow_run": null },
            { "id": 6, "name": "build-win", "size_in_bytes": 16, "expired": null, "workflow_run": null }
        ]))
        .unwrap()
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("artifacts.json");
        write(&path, &artifacts()).unwrap();
        assert_eq!(read(&path).unwrap(), artifacts());
        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw[2].get("expired"), Some(&serde_json::Value::Null));
        assert_eq!(raw[1].get("expired"), None);
    }

    #[test]
    fn test_pretty_printed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("artifacts.json");
        write(&path, &artifacts()[1..2]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[\n  {\n    \""), "{text}");
    }

    #[test]
    fn test_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("artifacts.json");
        std::fs::write(&path, "stale contents that are much longer than an empty list").unwrap();
        write(&path, &[]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn test_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"").unwrap();
        let err = write(&blocker.join("artifacts.json"), &artifacts()).unwrap_err();
        assert!(matches!(err, Error::Write { .. }), "{err}");
    }
}
