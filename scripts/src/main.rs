use anyhow::Result;
use clap::Parser;
use scripts::{cli::DeployConfig, deploy, env::init_console_subscriber};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_console_subscriber();
    let config = DeployConfig::parse();
    info!("{}", serde_json::to_string_pretty(&config)?);
    deploy::run(&config).await
}
