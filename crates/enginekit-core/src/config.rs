use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::Platform;

/// File name looked up in the project directory.
pub const CONFIG_FILE: &str = "enginekit.toml";

/// enginekit.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnginekitConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub publish: PublishConfig,
    #[serde(default)]
    pub cli: CliConfig,
    #[serde(default)]
    pub lint: LintConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Name of the local dev engine container
    #[serde(default = "default_engine_name")]
    pub name: String,
    /// Named volume holding engine state (defaults to the container name)
    pub volume: Option<String>,
    /// State directory inside the engine container
    #[serde(default = "default_state_dir")]
    pub state_dir: String,
    /// Host environment variables forwarded into the engine container
    #[serde(default = "default_passthrough_env")]
    pub passthrough_env: Vec<String>,
    /// Arguments appended after the image name
    #[serde(default = "default_startup_args")]
    pub startup_args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Container runtime CLI
    #[serde(default = "default_runtime_binary")]
    pub binary: String,
    /// Per-command deadline in seconds; unset waits indefinitely
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Build context directory
    #[serde(default = "default_context")]
    pub context: PathBuf,
    /// Engine Dockerfile, relative to the working directory
    #[serde(default = "default_dockerfile")]
    pub dockerfile: PathBuf,
    /// Platforms built by `publish` and `test-publish`
    #[serde(default = "default_publish_platforms")]
    pub platforms: Vec<Platform>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Image repository; `DAGGER_ENGINE_IMAGE` takes precedence
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Client binary path written by `build`, relative to the source root
    #[serde(default = "default_cli_bin_path")]
    pub bin_path: PathBuf,
    /// Dockerfile stage holding the client binary
    #[serde(default = "default_cli_target")]
    pub target: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LintConfig {
    /// golangci-lint image
    #[serde(default = "default_lint_image")]
    pub image: String,
    /// Arguments passed to the image, run from the mounted source
    #[serde(default = "default_lint_args")]
    pub args: Vec<String>,
    /// Source tree mounted into the linter
    #[serde(default = "default_lint_source")]
    pub source: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: default_engine_name(),
            volume: None,
            state_dir: default_state_dir(),
            passthrough_env: default_passthrough_env(),
            startup_args: default_startup_args(),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            binary: default_runtime_binary(),
            timeout_secs: None,
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            context: default_context(),
            dockerfile: default_dockerfile(),
            platforms: default_publish_platforms(),
        }
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            bin_path: default_cli_bin_path(),
            target: default_cli_target(),
        }
    }
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            image: default_lint_image(),
            args: default_lint_args(),
            source: default_lint_source(),
        }
    }
}

impl EngineConfig {
    pub fn volume_name(&self) -> &str {
        match &self.volume {
            Some(volume) => volume,
            None => &self.name,
        }
    }
}

impl EnginekitConfig {
    /// Load from enginekit.toml at the given path, or return defaults if not found.
    pub fn load(project_dir: &std::path::Path) -> crate::Result<Self> {
        let config_path = project_dir.join(CONFIG_FILE);
        if config_path.exists() {
            tracing::debug!(path = %config_path.display(), "loading config");
            let content =
                std::fs::read_to_string(&config_path).map_err(|e| crate::Error::ConfigLoad {
                    path: config_path.clone(),
                    source: e,
                })?;
            toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
                path: config_path,
                source: e,
            })
        } else {
            Ok(Self::default())
        }
    }
}

fn default_engine_name() -> String {
    "dagger-engine".to_owned()
}

fn default_state_dir() -> String {
    "/var/lib/dagger".to_owned()
}

fn default_passthrough_env() -> Vec<String> {
    [
        "_EXPERIMENTAL_DAGGER_CACHE_CONFIG",
        "_EXPERIMENTAL_DAGGER_SERVICES_DNS",
        "_EXPERIMENTAL_DAGGER_CLOUD_TOKEN",
        "_EXPERIMENTAL_DAGGER_CLOUD_URL",
    ]
    .iter()
    .map(|s| (*s).to_owned())
    .collect()
}

fn default_startup_args() -> Vec<String> {
    vec!["--debug".to_owned()]
}

fn default_runtime_binary() -> String {
    "docker".to_owned()
}

fn default_context() -> PathBuf {
    PathBuf::from(".")
}

fn default_dockerfile() -> PathBuf {
    PathBuf::from("Dockerfile")
}

fn default_publish_platforms() -> Vec<Platform> {
    vec![Platform::linux("amd64"), Platform::linux("arm64")]
}

fn default_cli_bin_path() -> PathBuf {
    PathBuf::from("bin/dagger")
}

fn default_cli_target() -> String {
    "cli".to_owned()
}

fn default_lint_image() -> String {
    "golangci/golangci-lint:v1.51-alpine".to_owned()
}

fn default_lint_args() -> Vec<String> {
    ["golangci-lint", "run", "-v", "--timeout", "5m"]
        .iter()
        .map(|s| (*s).to_owned())
        .collect()
}

fn default_lint_source() -> PathBuf {
    PathBuf::from(".")
}
