use regex::Regex;

use crate::models::ArtifactRecord;

/// An artifact is kept when its name matches `pattern` anywhere and it is not
/// flagged as expired. A missing or `null` flag counts as not expired.
pub fn matches(artifact: &ArtifactRecord, pattern: &Regex) -> bool {
    pattern.is_match(&artifact.name) && !artifact.is_expired()
}

/// Keep the matching artifacts, preserving their order.
pub fn retain(artifacts: Vec<ArtifactRecord>, pattern: &Regex) -> Vec<ArtifactRecord> {
    artifacts.into_iter().filter(|a| matches(a, pattern)).collect()
}
