use std::path::Path;

use crate::docker::{DockerError, reports_missing_container};
use crate::executor::{DockerExecutor, RealExecutor};
use crate::runtime::{ImageLoader, ImageTagger, InstanceManager, InstanceSpec};

/// Local container runtime operations, parameterized over the executor for testability.
pub struct DockerClient<E: DockerExecutor = RealExecutor> {
    executor: E,
}

impl DockerClient<RealExecutor> {
    pub fn new() -> Self {
        Self {
            executor: RealExecutor::new(),
        }
    }
}

impl Default for DockerClient<RealExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: DockerExecutor> DockerClient<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }
}

impl<E: DockerExecutor> ImageLoader for DockerClient<E> {
    async fn load(&self, archive: &Path) -> Result<String, DockerError> {
        let archive = archive.to_string_lossy();
        self.executor.exec(&args(["load", "-i", &archive])).await
    }
}

impl<E: DockerExecutor> ImageTagger for DockerClient<E> {
    async fn tag(&self, image_id: &str, image_name: &str) -> Result<(), DockerError> {
        self.executor
            .exec(&args(["tag", image_id, image_name]))
            .await?;
        Ok(())
    }
}

impl<E: DockerExecutor> InstanceManager for DockerClient<E> {
    async fn remove(&self, name: &str) -> Result<(), DockerError> {
        match self.executor.exec(&args(["rm", "-fv", name])).await {
            Ok(_) => Ok(()),
            Err(DockerError::CommandFailed { output, .. }) if reports_missing_container(&output) => {
                Err(DockerError::NoSuchContainer {
                    name: name.to_owned(),
                    output,
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn start(&self, spec: &InstanceSpec) -> Result<(), DockerError> {
        self.executor.exec(&spec.run_args()).await?;
        Ok(())
    }
}

// ── Helper ──

pub(crate) fn args<const N: usize>(a: [&str; N]) -> Vec<String> {
    a.iter().map(|s| (*s).to_owned()).collect()
}
