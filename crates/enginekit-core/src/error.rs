use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load config from {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    // ── Release refs ──
    #[error("invalid semver tag: {tag}")]
    InvalidVersion { tag: String },

    // ── Platforms ──
    #[error("invalid platform {value:?}: expected <os>/<arch>")]
    InvalidPlatform { value: String },

    #[error("unsupported host architecture '{arch}' — engine images are built for amd64 and arm64")]
    UnsupportedArch { arch: String },

    #[error("unsupported host OS '{os}' for the client binary")]
    UnsupportedOs { os: String },
}
