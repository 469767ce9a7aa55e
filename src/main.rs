use std::path::PathBuf;

use clap::Parser;

use taskd::config::{load_config, ServerConfig};
use taskd::http::build_router;
use taskd::lifecycle::{signals, Lifecycle, Shutdown};
use taskd::observability::logging;

#[derive(Parser)]
#[command(name = "taskd")]
#[command(about = "Small task service host with graceful shutdown", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured bind address (e.g. "127.0.0.1:8080").
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_connections = config.listener.max_connections,
        shutdown_grace_secs = config.timeouts.shutdown_grace_secs,
        "taskd starting"
    );

    let shutdown = Shutdown::new();
    signals::listen(&shutdown);

    let router = build_router();
    Lifecycle::new(config, shutdown.token()).run(router).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
