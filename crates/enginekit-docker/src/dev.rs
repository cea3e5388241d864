//! Local dev engine workflow: load → tag → teardown → start.
//!
//! Each step aborts the workflow on failure. The only tolerated failure is
//! removing an instance that does not exist.

use std::fmt;
use std::time::Duration;

use enginekit_core::{EngineConfig, Platform};

use crate::archive::ImageArchive;
use crate::docker::DockerError;
use crate::export::{ExportError, ImageExporter};
use crate::runtime::{ImageLoader, ImageTagger, InstanceManager, InstanceSpec};

/// Marker preceding the content-addressed image ID in `load` output.
pub const IMAGE_ID_MARKER: &str = "sha256:";

/// URL scheme clients use to reach an engine through `docker exec`.
pub const ENDPOINT_SCHEME: &str = "docker-container";

/// Options applied identically on every dev run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevOptions {
    pub instance_name: String,
    pub volume_name: String,
    pub state_dir: String,
    pub passthrough_env: Vec<String>,
    pub startup_args: Vec<String>,
}

impl DevOptions {
    pub fn from_config(engine: &EngineConfig) -> Self {
        Self {
            instance_name: engine.name.clone(),
            volume_name: engine.volume_name().to_owned(),
            state_dir: engine.state_dir.clone(),
            passthrough_env: engine.passthrough_env.clone(),
            startup_args: engine.startup_args.clone(),
        }
    }

    /// Stable local tag for the loaded image.
    pub fn image_name(&self) -> String {
        format!("localhost/{}:latest", self.instance_name)
    }

    pub fn instance_spec(&self) -> InstanceSpec {
        InstanceSpec {
            name: self.instance_name.clone(),
            image: self.image_name(),
            passthrough_env: self.passthrough_env.clone(),
            volume: self.volume_name.clone(),
            state_dir: self.state_dir.clone(),
            privileged: true,
            args: self.startup_args.clone(),
        }
    }
}

/// Where a client connects to the running dev engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint(String);

impl Endpoint {
    pub fn for_instance(name: &str) -> Self {
        Self(format!("{ENDPOINT_SCHEME}://{name}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevStep {
    Export,
    Load,
    Tag,
    Teardown,
    Start,
}

impl fmt::Display for DevStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Export => "export",
            Self::Load => "load",
            Self::Tag => "tag",
            Self::Teardown => "teardown",
            Self::Start => "start",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DevError {
    #[error("engine image export failed")]
    Export { source: ExportError },

    #[error("image load failed")]
    Load { source: DockerError },

    #[error("unexpected output from image load (no sha256: image ID):\n{output}")]
    UnexpectedOutput { output: String },

    #[error("image tag failed")]
    Tag { source: DockerError },

    #[error("removing the previous engine instance failed")]
    Teardown { source: DockerError },

    #[error("starting the engine instance failed")]
    Start { source: DockerError },

    #[error("{step} step timed out after {after:?}")]
    Timeout { step: DevStep, after: Duration },
}

impl DevError {
    fn at(step: DevStep, source: DockerError) -> Self {
        if let Some(after) = source.timed_out() {
            return Self::Timeout { step, after };
        }
        match step {
            DevStep::Load => Self::Load { source },
            DevStep::Tag => Self::Tag { source },
            DevStep::Teardown => Self::Teardown { source },
            DevStep::Start => Self::Start { source },
            DevStep::Export => Self::Export {
                source: ExportError::Build { source },
            },
        }
    }

    fn from_export(source: ExportError) -> Self {
        match source {
            ExportError::Build { source } => Self::at(DevStep::Export, source),
            other => Self::Export { source: other },
        }
    }

    /// The workflow step that failed.
    pub fn step(&self) -> DevStep {
        match self {
            Self::Export { .. } => DevStep::Export,
            Self::Load { .. } | Self::UnexpectedOutput { .. } => DevStep::Load,
            Self::Tag { .. } => DevStep::Tag,
            Self::Teardown { .. } => DevStep::Teardown,
            Self::Start { .. } => DevStep::Start,
            Self::Timeout { step, .. } => *step,
        }
    }

    /// Raw runtime output behind the failure, if any.
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::UnexpectedOutput { output } => Some(output),
            Self::Load { source }
            | Self::Tag { source }
            | Self::Teardown { source }
            | Self::Start { source } => source.output(),
            Self::Export {
                source: ExportError::Build { source },
            } => source.output(),
            Self::Export { .. } | Self::Timeout { .. } => None,
        }
    }
}

/// Pull the image ID out of `load` output: the first whitespace-delimited
/// token after [`IMAGE_ID_MARKER`].
pub fn extract_image_id(output: &str) -> Option<&str> {
    let (_, rest) = output.split_once(IMAGE_ID_MARKER)?;
    rest.split_whitespace().next()
}

/// Turns an image archive into a single running dev engine, replacing any
/// previous instance with the same name.
///
/// Callers must not run two workflows for the same instance name at once.
pub struct LocalDevRunner<R> {
    runtime: R,
}

impl<R> LocalDevRunner<R>
where
    R: ImageLoader + ImageTagger + InstanceManager,
{
    pub fn new(runtime: R) -> Self {
        Self { runtime }
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Load, tag, tear down and start. Consumes the archive; a scoped
    /// archive is deleted when this returns, on success or failure.
    pub async fn run_dev(
        &self,
        archive: ImageArchive,
        opts: &DevOptions,
    ) -> Result<Endpoint, DevError> {
        let output = self
            .runtime
            .load(archive.path())
            .await
            .map_err(|e| DevError::at(DevStep::Load, e))?;

        let image_id = extract_image_id(&output).ok_or_else(|| DevError::UnexpectedOutput {
            output: output.clone(),
        })?;
        tracing::debug!(%image_id, "image loaded");

        let image_name = opts.image_name();
        self.runtime
            .tag(image_id, &image_name)
            .await
            .map_err(|e| DevError::at(DevStep::Tag, e))?;
        tracing::info!(image = %image_name, "image tagged");

        let replaced = match self.runtime.remove(&opts.instance_name).await {
            Ok(()) => true,
            Err(e) if e.is_no_such_container() => false,
            Err(e) => return Err(DevError::at(DevStep::Teardown, e)),
        };
        tracing::info!(name = %opts.instance_name, replaced, "previous engine cleared");

        self.runtime
            .start(&opts.instance_spec())
            .await
            .map_err(|e| DevError::at(DevStep::Start, e))?;
        tracing::info!(
            name = %opts.instance_name,
            volume = %opts.volume_name,
            "engine started"
        );

        Ok(Endpoint::for_instance(&opts.instance_name))
    }
}

/// Export the engine for `platform` into a scoped archive and run it.
///
/// The archive is removed on every exit path, including when the returned
/// future is dropped before completion.
pub async fn export_and_run<X, R>(
    exporter: &X,
    runner: &LocalDevRunner<R>,
    platform: &Platform,
    opts: &DevOptions,
) -> Result<Endpoint, DevError>
where
    X: ImageExporter,
    R: ImageLoader + ImageTagger + InstanceManager,
{
    let archive = ImageArchive::scoped("engine.tar").map_err(|e| DevError::Export {
        source: ExportError::Scratch { source: e },
    })?;

    exporter
        .export(std::slice::from_ref(platform), None, archive.path())
        .await
        .map_err(DevError::from_export)?;

    runner.run_dev(archive, opts).await
}
