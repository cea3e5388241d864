//! Docker CLI operations for the engine.
//!
//! Every runtime verb goes through a [`DockerExecutor`], so the whole stack
//! (image export, client builds, linting, local dev runs, publishing) can be
//! driven by a mock.

pub mod archive;
pub mod client;
pub mod dev;
pub mod docker;
pub mod executor;
pub mod export;
pub mod lint;
pub mod publish;
pub mod runtime;

pub use archive::ImageArchive;
pub use client::DockerClient;
pub use dev::{DevError, DevOptions, DevStep, Endpoint, LocalDevRunner, export_and_run};
pub use docker::DockerError;
pub use executor::{DockerExecutor, RealExecutor};
pub use export::{BuildxExporter, ExportError, ImageExporter};
pub use lint::{LintError, Linter};
pub use publish::{PublishError, PublishOutcome, Publisher};
pub use runtime::{ImageLoader, ImageTagger, InstanceManager, InstanceSpec};
