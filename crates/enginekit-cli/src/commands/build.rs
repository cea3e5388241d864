use enginekit_core::Platform;
use enginekit_docker::BuildxExporter;

/// Build the client binary for this host into `[cli].bin_path`.
pub async fn build() -> anyhow::Result<()> {
    let config = super::load_config()?;

    let exporter = BuildxExporter::with_executor(
        super::executor(&config, None),
        &config.build.context,
        &config.build.dockerfile,
    );
    let built = exporter
        .build_client(&config.cli.target, &Platform::native()?, &super::cli_bin_path(&config))
        .await?;

    println!("Built: {}", built.display());

    Ok(())
}
