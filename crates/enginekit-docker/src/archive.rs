use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A single-file image archive handed from the exporter to the runtime.
///
/// A scoped archive lives in a private temporary directory that is removed
/// when the archive is dropped, whichever way the workflow exits. An archive
/// created with [`ImageArchive::at`] belongs to the caller and is left alone.
#[derive(Debug)]
pub struct ImageArchive {
    path: PathBuf,
    scope: Option<TempDir>,
}

impl ImageArchive {
    /// Reserve `file_name` inside a fresh temporary directory.
    pub fn scoped(file_name: &str) -> std::io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("enginekit-").tempdir()?;
        Ok(Self {
            path: dir.path().join(file_name),
            scope: Some(dir),
        })
    }

    /// Refer to an existing archive owned by the caller.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            scope: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_scoped(&self) -> bool {
        self.scope.is_some()
    }
}
