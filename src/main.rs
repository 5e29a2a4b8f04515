use anyhow::Result;
use clap::Parser;
use nhatky_lib::presentation::cli::{Cli, CliHandler};
use nhatky_lib::state::{AppState, StateOptions};
use nhatky_lib::AppConfig;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    nhatky_lib::init_logging(&cli.log_level, cli.json_logs)?;

    info!("Starting nhatky v{}", env!("CARGO_PKG_VERSION"));

    let options = StateOptions {
        force_offline: cli.offline,
        ephemeral: cli.ephemeral,
    };
    let state = AppState::new(AppConfig::from_env(), options).await?;
    let handler = CliHandler::new(state.clone());

    let result = handler.handle(cli.command).await;
    state.shutdown().await;
    result
}
