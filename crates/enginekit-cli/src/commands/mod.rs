mod build;
mod check_ref;
mod dev;
mod lint;
mod publish;
mod test_publish;

use std::path::{Path, PathBuf};
use std::time::Duration;

use enginekit_core::EnginekitConfig;
use enginekit_docker::RealExecutor;

pub use build::build;
pub use check_ref::check_ref;
pub use dev::dev;
pub use lint::lint;
pub use publish::publish;
pub use test_publish::test_publish;

/// Load `.env` and `enginekit.toml` from the working directory.
pub(crate) fn load_config() -> anyhow::Result<EnginekitConfig> {
    let dotenv = match dotenvy::dotenv() {
        Ok(path) => Some(path),
        Err(e) if e.not_found() => None,
        Err(e) => return Err(e.into()),
    };
    tracing::debug!(dotenv = ?dotenv, "environment loaded");
    Ok(EnginekitConfig::load(Path::new("."))?)
}

/// Runtime executor honoring `[runtime]` and an optional timeout override.
pub(crate) fn executor(config: &EnginekitConfig, timeout_secs: Option<u64>) -> RealExecutor {
    let timeout = timeout_secs
        .or(config.runtime.timeout_secs)
        .map(Duration::from_secs);
    RealExecutor::new()
        .with_program(&config.runtime.binary)
        .with_timeout(timeout)
}

/// Client binary location: `$DAGGER_SRC_ROOT/<bin_path>`, else relative to
/// the working directory.
pub(crate) fn cli_bin_path(config: &EnginekitConfig) -> PathBuf {
    let root = match std::env::var_os("DAGGER_SRC_ROOT") {
        Some(root) => PathBuf::from(root),
        None => PathBuf::from("."),
    };
    root.join(&config.cli.bin_path)
}
