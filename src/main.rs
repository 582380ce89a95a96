//! CKD Predict - Main Entry Point
//!
//! Serves the training/prediction API by default; `train` and `info` run the
//! pipeline offline.

use clap::Parser;
use ckd_predict::cli::{cmd_info, cmd_serve, cmd_train, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ckd_predict=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve { port, host, strict_status }) => {
            cmd_serve(&host, port, strict_status).await?;
        }
        Some(Commands::Train { data, k }) => {
            cmd_train(&data, k)?;
        }
        Some(Commands::Info { data }) => {
            cmd_info(&data)?;
        }
        None => {
            let config = ckd_predict::server::ServerConfig::default();
            cmd_serve(&config.host, config.port, config.strict_status).await?;
        }
    }

    Ok(())
}
