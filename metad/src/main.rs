use clap::Parser;
use imds::config::Config;
use std::path::PathBuf;
use std::process::ExitCode;

/// Instance metadata service for guests without a cloud datasource
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(long, short)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match Config::from_file(&cli.config) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("could not load configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    // Fatal store states are rejected before the listener binds
    if let Err(err) = config.validate() {
        eprintln!("invalid configuration: {err}");
        return ExitCode::FAILURE;
    }

    tracing::info!(
        host = %config.listener.host,
        port = config.listener.port,
        store = %config.store.base_dir.display(),
        "starting metadata service"
    );

    if let Err(err) = imds::run(config).await {
        tracing::error!(error = %err, "server terminated");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
