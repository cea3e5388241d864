use std::path::{Path, PathBuf};

use enginekit_core::Platform;

use crate::docker::DockerError;
use crate::executor::{DockerExecutor, RealExecutor};

/// Build argument carrying the engine version into the image.
pub const VERSION_BUILD_ARG: &str = "ENGINE_VERSION";

/// Produces a single-file image archive for a set of platforms.
#[allow(async_fn_in_trait)]
pub trait ImageExporter {
    async fn export(
        &self,
        platforms: &[Platform],
        version: Option<&str>,
        dest: &Path,
    ) -> Result<(), ExportError>;
}

/// Exports the engine image with `docker buildx build --output`.
///
/// One platform is written in the `docker` format so it can be loaded
/// directly; several platforms need the `oci` layout.
pub struct BuildxExporter<E: DockerExecutor = RealExecutor> {
    executor: E,
    context: PathBuf,
    dockerfile: PathBuf,
}

impl BuildxExporter<RealExecutor> {
    pub fn new(context: impl Into<PathBuf>, dockerfile: impl Into<PathBuf>) -> Self {
        Self::with_executor(RealExecutor::new(), context, dockerfile)
    }
}

impl<E: DockerExecutor> BuildxExporter<E> {
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

    /// Build the client binary from the `target` stage and write it to
    /// `bin_path`.
    ///
    /// The stage's root is exported into the parent of `bin_path`, so the
    /// stage must hold the binary under the same file name.
    pub async fn build_client(
        &self,
        target: &str,
        platform: &Platform,
        bin_path: &Path,
    ) -> Result<PathBuf, ExportError> {
        let dest = match bin_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        tracing::info!(
            %target,
            %platform,
            dest = %dest.display(),
            "building client binary"
        );

        let cmd = buildx_args(
            &self.dockerfile,
            &self.context,
            std::slice::from_ref(platform),
            None,
            &[
                "--target".to_owned(),
                target.to_owned(),
                "--output".to_owned(),
                format!("type=local,dest={}", dest.display()),
            ],
        );
        self.executor
            .exec_streaming(&cmd)
            .await
            .map_err(|e| ExportError::Build { source: e })?;

        if !bin_path.is_file() {
            return Err(ExportError::MissingArtifact {
                path: bin_path.to_path_buf(),
            });
        }
        tracing::info!(path = %bin_path.display(), "client binary built");
        Ok(bin_path.to_path_buf())
    }
}

impl<E: DockerExecutor> ImageExporter for BuildxExporter<E> {
    async fn export(
        &self,
        platforms: &[Platform],
        version: Option<&str>,
        dest: &Path,
    ) -> Result<(), ExportError> {
        if platforms.is_empty() {
            return Err(ExportError::NoPlatforms);
        }

        let format = if platforms.len() == 1 { "docker" } else { "oci" };
        let output = format!("type={format},dest={}", dest.display());

        tracing::info!(
            platforms = %Platform::join(platforms),
            dest = %dest.display(),
            "exporting engine image"
        );

        let cmd = buildx_args(
            &self.dockerfile,
            &self.context,
            platforms,
            version,
            &["--output".to_owned(), output],
        );
        self.executor
            .exec_streaming(&cmd)
            .await
            .map_err(|e| ExportError::Build { source: e })
    }
}

/// `buildx build` invocation shared by export and publish; `extra` goes
/// right before the context argument.
pub(crate) fn buildx_args(
    dockerfile: &Path,
    context: &Path,
    platforms: &[Platform],
    version: Option<&str>,
    extra: &[String],
) -> Vec<String> {
    let mut cmd = vec![
        "buildx".to_owned(),
        "build".to_owned(),
        "--file".to_owned(),
        dockerfile.display().to_string(),
        "--platform".to_owned(),
        Platform::join(platforms),
    ];
    if let Some(v) = version.filter(|v| !v.is_empty()) {
        cmd.push("--build-arg".to_owned());
        cmd.push(format!("{VERSION_BUILD_ARG}={v}"));
    }
    cmd.extend(extra.iter().cloned());
    cmd.push(context.display().to_string());
    cmd
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("no target platforms given")]
    NoPlatforms,

    #[error("failed to create scratch directory for the image archive")]
    Scratch { source: std::io::Error },

    #[error("image export failed")]
    Build { source: DockerError },

    #[error("build finished but {path} was not produced; check the Dockerfile stage")]
    MissingArtifact { path: PathBuf },
}
