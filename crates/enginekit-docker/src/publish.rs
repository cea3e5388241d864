use std::path::{Path, PathBuf};

use enginekit_core::{Platform, is_semver, validate_ref};
use serde::Deserialize;

use crate::docker::DockerError;
use crate::executor::{DockerExecutor, RealExecutor};
use crate::export::buildx_args;

/// Builds the engine for every published platform and pushes it.
pub struct Publisher<E: DockerExecutor = RealExecutor> {
    executor: E,
    context: PathBuf,
    dockerfile: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    /// `<image>:<version>` as pushed.
    pub reference: String,
    /// Manifest digest reported by buildx.
    pub digest: String,
    /// `false` for the trunk ref; SDK pins only follow real releases.
    pub semver: bool,
}

#[derive(Deserialize)]
struct BuildMetadata {
    #[serde(rename = "containerimage.digest")]
    digest: Option<String>,
}

impl Publisher<RealExecutor> {
    pub fn new(context: impl Into<PathBuf>, dockerfile: impl Into<PathBuf>) -> Self {
        Self::with_executor(RealExecutor::new(), context, dockerfile)
    }
}

impl<E: DockerExecutor> Publisher<E> {
    pub fn with_executor(
        executor: E,
        context: impl Into<PathBuf>,
        dockerfile: impl Into<PathBuf>,
    ) -> Self {
        Self {
            executor,
            context: context.into(),
            dockerfile: dockerfile.into(),
        }
    }

    /// Push `<image>:<version>`. The version is validated before anything runs.
    pub async fn publish(
        &self,
        image: &str,
        version: &str,
        platforms: &[Platform],
    ) -> Result<PublishOutcome, PublishError> {
        validate_ref(version).map_err(|e| PublishError::InvalidVersion { source: e })?;
        if platforms.is_empty() {
            return Err(PublishError::NoPlatforms);
        }

        let reference = format!("{image}:{version}");
        let scratch = tempfile::Builder::new()
            .prefix("enginekit-publish-")
            .tempdir()
            .map_err(|e| PublishError::Scratch { source: e })?;
        let metadata_path = scratch.path().join("metadata.json");

        tracing::info!(
            %reference,
            platforms = %Platform::join(platforms),
            "publishing engine image"
        );

        let cmd = buildx_args(
            &self.dockerfile,
            &self.context,
            platforms,
            Some(version),
            &[
                "--tag".to_owned(),
                reference.clone(),
                "--push".to_owned(),
                "--metadata-file".to_owned(),
                metadata_path.display().to_string(),
            ],
        );
        self.executor
            .exec_streaming(&cmd)
            .await
            .map_err(|e| PublishError::Build { source: e })?;

        let digest = read_digest(&metadata_path)?;
        let semver = is_semver(version);
        if !semver {
            tracing::info!(%version, "not a semver version, skipping SDK bump");
        }

        Ok(PublishOutcome {
            reference,
            digest,
            semver,
        })
    }
}

fn read_digest(path: &Path) -> Result<String, PublishError> {
    let content = std::fs::read_to_string(path).map_err(|e| PublishError::ReadMetadata {
        path: path.to_path_buf(),
        source: e,
    })?;
    let metadata: BuildMetadata =
        serde_json::from_str(&content).map_err(|e| PublishError::ParseMetadata {
            path: path.to_path_buf(),
            source: e,
        })?;
    metadata
        .digest
        .filter(|d| !d.is_empty())
        .ok_or_else(|| PublishError::MissingDigest {
            path: path.to_path_buf(),
        })
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("refusing to publish")]
    InvalidVersion { source: enginekit_core::Error },

    #[error("no target platforms configured — set [build].platforms in enginekit.toml")]
    NoPlatforms,

    #[error("failed to create scratch directory for build metadata")]
    Scratch { source: std::io::Error },

    #[error("image build and push failed")]
    Build { source: DockerError },

    #[error("failed to read build metadata at {path}")]
    ReadMetadata {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse build metadata at {path}")]
    ParseMetadata {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("build metadata at {path} has no containerimage.digest")]
    MissingDigest { path: PathBuf },
}
