use enginekit_core::Platform;
use enginekit_docker::{BuildxExporter, DevOptions, DockerClient, LocalDevRunner, export_and_run};

/// Build the engine for the host platform, replace the local dev engine,
/// then build the client binary that talks to it.
///
/// Prints shell exports on stdout so the caller can `eval` them.
pub async fn dev(
    name: Option<String>,
    volume: Option<String>,
    timeout_secs: Option<u64>,
) -> anyhow::Result<()> {
    let mut config = super::load_config()?;
    if let Some(name) = name {
        config.engine.name = name;
    }
    if let Some(volume) = volume {
        config.engine.volume = Some(volume);
    }

    let executor = super::executor(&config, timeout_secs);
    let exporter = BuildxExporter::with_executor(
        executor.clone(),
        &config.build.context,
        &config.build.dockerfile,
    );
    let runner = LocalDevRunner::new(DockerClient::with_executor(executor));
    let opts = DevOptions::from_config(&config.engine);
    let platform = Platform::host()?;

    let endpoint = export_and_run(&exporter, &runner, &platform, &opts).await?;
    let cli_bin = exporter
        .build_client(&config.cli.target, &Platform::native()?, &super::cli_bin_path(&config))
        .await?;

    println!("export _EXPERIMENTAL_DAGGER_CLI_BIN={}", cli_bin.display());
    println!("export _EXPERIMENTAL_DAGGER_RUNNER_HOST={endpoint}");

    Ok(())
}
