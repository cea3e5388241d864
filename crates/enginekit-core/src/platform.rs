use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// An image target platform in `os/arch` form, e.g. `linux/amd64`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Platform {
    pub os: String,
    pub arch: String,
}

impl Platform {
    pub fn linux(arch: &str) -> Self {
        Self {
            os: "linux".to_owned(),
            arch: arch.to_owned(),
        }
    }

    /// The Linux platform matching the host CPU, named the way container
    /// registries name architectures.
    pub fn host() -> Result<Self> {
        Self::for_arch(std::env::consts::ARCH)
    }

    /// The host's own OS and CPU, for binaries that run outside a container.
    pub fn native() -> Result<Self> {
        Self::for_target(std::env::consts::OS, std::env::consts::ARCH)
    }

    fn for_target(rust_os: &str, rust_arch: &str) -> Result<Self> {
        let os = match rust_os {
            "linux" => "linux",
            "macos" => "darwin",
            "windows" => "windows",
            other => {
                return Err(Error::UnsupportedOs {
                    os: other.to_owned(),
                });
            }
        };
        let mut platform = Self::for_arch(rust_arch)?;
        platform.os = os.to_owned();
        Ok(platform)
    }

    fn for_arch(rust_arch: &str) -> Result<Self> {
        let arch = match rust_arch {
            "x86_64" => "amd64",
            "aarch64" => "arm64",
            other => {
                return Err(Error::UnsupportedArch {
                    arch: other.to_owned(),
                });
            }
        };
        Ok(Self::linux(arch))
    }

    /// Render a list as the comma-separated value buildx expects.
    pub fn join(platforms: &[Platform]) -> String {
        platforms
            .iter()
            .map(Platform::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('/') {
            Some((os, arch))
                if !os.is_empty() && !arch.is_empty() && !arch.contains('/') =>
            {
                Ok(Self {
                    os: os.to_owned(),
                    arch: arch.to_owned(),
                })
            }
            _ => Err(Error::InvalidPlatform {
                value: s.to_owned(),
            }),
        }
    }
}

impl TryFrom<String> for Platform {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Platform> for String {
    fn from(p: Platform) -> Self {
        p.to_string()
    }
}
