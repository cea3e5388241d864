use std::path::{Path, PathBuf};

use crate::docker::DockerError;
use crate::executor::{DockerExecutor, RealExecutor};

/// Where the source tree is mounted inside the lint container.
pub const LINT_WORKDIR: &str = "/app";

/// Runs golangci-lint over a source tree in a throwaway container.
pub struct Linter<E: DockerExecutor = RealExecutor> {
    executor: E,
    image: String,
    args: Vec<String>,
}

impl Linter<RealExecutor> {
    pub fn new(image: impl Into<String>, args: Vec<String>) -> Self {
        Self::with_executor(RealExecutor::new(), image, args)
    }
}

impl<E: DockerExecutor> Linter<E> {
    pub fn with_executor(executor: E, image: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            executor,
            image: image.into(),
            args,
        }
    }

    /// Lint `source`, streaming findings to stderr.
    pub async fn lint(&self, source: &Path) -> Result<(), LintError> {
        let source = std::fs::canonicalize(source).map_err(|e| LintError::Source {
            path: source.to_path_buf(),
            source: e,
        })?;

        tracing::info!(image = %self.image, source = %source.display(), "linting");

        let mut cmd = vec![
            "run".to_owned(),
            "--rm".to_owned(),
            "-v".to_owned(),
            format!("{}:{LINT_WORKDIR}", source.display()),
            "-w".to_owned(),
            LINT_WORKDIR.to_owned(),
            self.image.clone(),
        ];
        cmd.extend(self.args.iter().cloned());

        self.executor
            .exec_streaming(&cmd)
            .await
            .map_err(|e| LintError::Failed { source: e })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LintError {
    #[error("cannot resolve lint source {path}")]
    Source {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("lint failed")]
    Failed { source: DockerError },
}

impl LintError {
    /// Linter output behind the failure, if any.
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::Failed { source } => source.output(),
            Self::Source { .. } => None,
        }
    }
}
