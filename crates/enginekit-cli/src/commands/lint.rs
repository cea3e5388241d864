use enginekit_docker::Linter;

pub async fn lint() -> anyhow::Result<()> {
    let config = super::load_config()?;

    let linter = Linter::with_executor(
        super::executor(&config, None),
        &config.lint.image,
        config.lint.args.clone(),
    );
    linter.lint(&config.lint.source).await?;

    println!("Lint passed: {}", config.lint.source.display());

    Ok(())
}
