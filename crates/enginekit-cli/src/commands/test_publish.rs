use std::path::Path;

use enginekit_docker::{BuildxExporter, ImageExporter};

/// Export every published platform to `output` without pushing.
pub async fn test_publish(output: &Path) -> anyhow::Result<()> {
    let config = super::load_config()?;

    let exporter = BuildxExporter::with_executor(
        super::executor(&config, None),
        &config.build.context,
        &config.build.dockerfile,
    );
    exporter
        .export(&config.build.platforms, None, output)
        .await?;

    println!("Exported: {}", output.display());

    Ok(())
}
