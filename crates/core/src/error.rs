use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Every way a run can stop. None of these are recovered from; the first one
/// raised ends the run and its message is reported verbatim.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed input.
    #[error("{0}")]
    Configuration(String),
    /// The artifact listing endpoint failed.
    #[error("Failed to list artifacts for {owner}/{repo}: {cause:#}")]
    Upstream { owner: String, repo: String, cause: anyhow::Error },
    /// Fetching a single artifact archive failed.
    #[error("Failed to download artifact {id} ({name}): {cause:#}")]
    Download { id: u64, name: String, cause: anyhow::Error },
    /// The downloaded payload could not be expanded.
    #[error("Failed to extract artifact {id} into {}: {cause:#}", .path.display())]
    Extraction { id: u64, path: PathBuf, cause: anyhow::Error },
    /// Writing the manifest failed.
    #[error("Failed to write artifacts metadata to {}: {cause:#}", .path.display())]
    Write { path: PathBuf, cause: anyhow::Error },
}

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self { Self::Configuration(message.into()) }
}
