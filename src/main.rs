use anyhow::Result;
use clap::Parser;
use coinboard::config::AppConfig;
use coinboard::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long)]
    config_path: Option<String>,

    /// Override the listen port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let mut config = match cli.config_path.as_deref() {
        Some(path) => AppConfig::load_from_path(path)?.apply_env(),
        None => AppConfig::load()?,
    };
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let result = coinboard::run(config).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
