use std::path::PathBuf;

use anyhow::Result;
use cabinet_server::config::load_config;
use clap::Parser;

/// Dental cabinet backend API.
#[derive(Debug, Parser)]
#[command(name = "cabinet-server", version, about)]
struct Cli {
    /// Configuration file (defaults to ./cabinet.toml when present)
    #[arg(short, long, env = "CABINET_CONFIG")]
    config: Option<PathBuf>,

    /// Listen host, overrides the configuration
    #[arg(long)]
    host: Option<String>,

    /// Listen port, overrides the configuration
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    cabinet_server::init_tracing(config.server.log_json);
    cabinet_server::serve(config).await
}
