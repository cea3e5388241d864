//! Core types and configuration for enginekit.
//!
//! This crate defines the `enginekit.toml` schema ([`EnginekitConfig`]),
//! target [`Platform`]s, the release ref gate ([`validate_ref`]), and shared
//! error types.

pub mod config;
pub mod error;
pub mod platform;
pub mod version;

pub use config::{
    BuildConfig, CliConfig, EngineConfig, EnginekitConfig, LintConfig, PublishConfig,
    RuntimeConfig,
};
pub use error::{Error, Result};
pub use platform::Platform;
pub use version::{TRUNK_REF, is_semver, validate_ref};
