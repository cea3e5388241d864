mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "enginekit", about = "Build, lint, publish, and run the engine with Docker")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the engine for this host and (re)start it as a local container
    Dev {
        /// Engine container name (default: [engine].name)
        #[arg(long)]
        name: Option<String>,
        /// State volume name (default: [engine].volume, then the container name)
        #[arg(long)]
        volume: Option<String>,
        /// Per-command timeout in seconds (default: [runtime].timeout_secs)
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Build the client binary for this host into [cli].bin_path
    Build,
    /// Run golangci-lint over [lint].source in a container
    Lint,
    /// Build the engine for all platforms and push it to the registry
    Publish {
        /// `main` or a release tag such as v0.6.2
        version: String,
    },
    /// Verify all platforms build by exporting them to a local archive
    TestPublish {
        /// Archive destination
        #[arg(long, short = 'o', default_value = "./engine.tar")]
        output: PathBuf,
    },
    /// Check that a ref is publishable
    CheckRef {
        /// `main` or a release tag such as v0.6.2
        tag: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                // arch-lint: allow(no-silent-result-drop) reason="an unset or malformed RUST_LOG falls back to the info level"
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Dropping the running command kills its child process and removes
    // scratch archives.
    tokio::select! {
        result = run(cli.command) => result,
        _ = tokio::signal::ctrl_c() => anyhow::bail!("interrupted"),
    }
}

async fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Dev {
            name,
            volume,
            timeout,
        } => commands::dev(name, volume, timeout).await?,
        Commands::Build => commands::build().await?,
        Commands::Lint => commands::lint().await?,
        Commands::Publish { version } => commands::publish(&version).await?,
        Commands::TestPublish { output } => commands::test_publish(&output).await?,
        Commands::CheckRef { tag } => commands::check_ref(&tag)?,
    }

    Ok(())
}
