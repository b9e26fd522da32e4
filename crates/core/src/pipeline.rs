use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;

use crate::{
    Error, Result, archive,
    config::Config,
    filter, manifest,
    models::{ArtifactPage, ArtifactRecord},
};

/// Number of records requested per listing page.
pub const PAGE_SIZE: u8 = 100;

/// Remote side of the pipeline: where artifact listings and archives come from.
#[async_trait]
pub trait ArtifactSource: Send + Sync {
    /// Fetch one page (1-based) of the repository's artifact listing.
    async fn list_page(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
        per_page: u8,
    ) -> anyhow::Result<ArtifactPage>;

    /// Fetch the ZIP archive for a single artifact.
    async fn download(&self, owner: &str, repo: &str, artifact_id: u64) -> anyhow::Result<Bytes>;
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Default)]
pub struct Summary {
    pub listed: usize,
    pub retained: Vec<ArtifactRecord>,
    pub extracted: Vec<PathBuf>,
    pub manifest: Option<PathBuf>,
}

/// List every artifact in the repository, following pages until the listing
/// is exhausted. Order is the platform's.
pub async fn list_artifacts<S>(source: &S, owner: &str, repo: &str) -> Result<Vec<ArtifactRecord>>
where S: ArtifactSource + ?Sized {
    let mut artifacts = Vec::new();
    let mut page = 1u32;
    loop {
        let response = source.list_page(owner, repo, page, PAGE_SIZE).await.map_err(|cause| {
            Error::Upstream { owner: owner.to_string(), repo: repo.to_string(), cause }
        })?;
        let received = response.artifacts.len();
        tracing::debug!(
            "Fetched artifacts page {} for {}/{} ({} items, total {:?})",
            page,
            owner,
            repo,
            received,
            response.total_count
        );
        for artifact in response.artifacts {
            tracing::info!("==> found artifact: {}", artifact);
            artifacts.push(artifact);
        }
        if received < PAGE_SIZE as usize
            || response.total_count.is_some_and(|total| artifacts.len() as u64 >= total)
        {
            break;
        }
        page += 1;
    }
    Ok(artifacts)
}

/// Download one artifact and expand it into `base/<id>`.
pub async fn materialize<S>(
    source: &S,
    owner: &str,
    repo: &str,
    artifact: &ArtifactRecord,
    base: &Path,
) -> Result<PathBuf>
where
    S: ArtifactSource + ?Sized,
{
    tracing::info!(" - download> {}", artifact);
    let bytes = source.download(owner, repo, artifact.id).await.map_err(|cause| {
        Error::Download { id: artifact.id, name: artifact.name.clone(), cause }
    })?;
    let dest = base.join(artifact.id.to_string());
    let entries = archive::extract(&bytes, &dest)
        .map_err(|cause| Error::Extraction { id: artifact.id, path: dest.clone(), cause })?;
    tracing::debug!("Extracted {} entries into {}", entries, dest.display());
    Ok(dest)
}

/// Run the whole pipeline: list, filter, materialize each retained artifact in
/// turn, then write the manifest if one was requested.
///
/// The first failure stops the run; artifacts after a failing one are never
/// downloaded.
pub async fn run<S>(source: &S, config: &Config) -> Result<Summary>
where S: ArtifactSource + ?Sized {
    let artifacts = list_artifacts(source, &config.owner, &config.repo).await?;
    let listed = artifacts.len();
    let retained = filter::retain(artifacts, &config.pattern);
    tracing::info!("==> got artifacts: {} items:", retained.len());

    let mut extracted = Vec::with_capacity(retained.len());
    for artifact in &retained {
        let dest = materialize(source, &config.owner, &config.repo, artifact, &config.path).await?;
        extracted.push(dest);
    }

    let manifest = match &config.metadata {
        Some(path) => {
            tracing::info!("saving artifacts JSON metadata to {}", path.display());
            manifest::write(path, &retained)?;
            Some(path.clone())
        }
        None => None,
    };
    Ok(Summary { listed, retained, extracted, manifest })
}
