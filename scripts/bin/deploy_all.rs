use std::process::ExitCode;

use clap::Parser;
use scripts::{
    cli::RunConfig,
    deploy_all::{exit_code, run},
    env::init_console_subscriber,
};
use tracing::info;

#[tokio::main]
async fn main() -> ExitCode {
    init_console_subscriber();
    let config = RunConfig::parse();
    info!("{}", serde_json::to_string_pretty(&config).unwrap_or_default());
    let result = run(&config, &mut std::io::stdout()).await;
    ExitCode::from(exit_code(result, &mut std::io::stderr()))
}
