use enginekit_core::validate_ref;
use enginekit_docker::Publisher;

/// Environment variable naming the engine image repository.
const ENGINE_IMAGE_ENV: &str = "DAGGER_ENGINE_IMAGE";

pub async fn publish(version: &str) -> anyhow::Result<()> {
    validate_ref(version)?;

    let config = super::load_config()?;
    let image = std::env::var(ENGINE_IMAGE_ENV)
        // arch-lint: allow(no-silent-result-drop) reason="an unset variable falls back to [publish].image"
        .ok()
        .filter(|v| !v.is_empty())
        .or_else(|| config.publish.image.clone())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "engine image not set — export {ENGINE_IMAGE_ENV} or set [publish].image in enginekit.toml"
            )
        })?;

    let publisher = Publisher::with_executor(
        super::executor(&config, None),
        &config.build.context,
        &config.build.dockerfile,
    );
    let outcome = publisher
        .publish(&image, version, &config.build.platforms)
        .await?;

    println!("PUBLISHED IMAGE REF: {}@{}", outcome.reference, outcome.digest);

    Ok(())
}
