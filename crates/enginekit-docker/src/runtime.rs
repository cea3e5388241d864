//! Narrow views of the container runtime used by the dev workflow.
//!
//! [`DockerClient`](crate::DockerClient) implements all three; tests can
//! substitute fakes that simulate failures without a real runtime.

use std::path::Path;

use crate::docker::DockerError;

/// Loads an image archive into the runtime's local image store.
#[allow(async_fn_in_trait)]
pub trait ImageLoader {
    /// Returns the runtime's combined load output.
    async fn load(&self, archive: &Path) -> Result<String, DockerError>;
}

/// Points a human-readable name at a loaded image.
#[allow(async_fn_in_trait)]
pub trait ImageTagger {
    async fn tag(&self, image_id: &str, image_name: &str) -> Result<(), DockerError>;
}

/// Creates and destroys named instances.
#[allow(async_fn_in_trait)]
pub trait InstanceManager {
    /// Force-remove the instance and its anonymous volumes.
    ///
    /// A missing instance is reported as [`DockerError::NoSuchContainer`].
    async fn remove(&self, name: &str) -> Result<(), DockerError>;

    /// Start a detached instance.
    async fn start(&self, spec: &InstanceSpec) -> Result<(), DockerError>;
}

/// Everything needed to start one engine instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceSpec {
    pub name: String,
    pub image: String,
    /// Variables forwarded by name from the invoker's environment.
    pub passthrough_env: Vec<String>,
    pub volume: String,
    pub state_dir: String,
    pub privileged: bool,
    pub args: Vec<String>,
}

impl InstanceSpec {
    /// `run` arguments in the fixed order the engine expects.
    pub fn run_args(&self) -> Vec<String> {
        let mut args = vec!["run".to_owned(), "-d".to_owned()];
        for var in &self.passthrough_env {
            args.push("-e".to_owned());
            args.push(var.clone());
        }
        args.push("-v".to_owned());
        args.push(format!("{}:{}", self.volume, self.state_dir));
        args.push("--name".to_owned());
        args.push(self.name.clone());
        if self.privileged {
            args.push("--privileged".to_owned());
        }
        args.push(self.image.clone());
        args.extend(self.args.iter().cloned());
        args
    }
}
