use alloy::{
    network::{Ethereum, EthereumWallet},
    providers::{Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
    transports::http::{Client, Http},
};
use anyhow::anyhow;
use time::macros::format_description;
use tracing_subscriber::{
    fmt::{format::FmtSpan, time::UtcTime},
    EnvFilter,
};
use url::Url;

/// Initialize the console subscriber for logging
pub fn init_console_subscriber() {
    let timer = UtcTime::new(format_description!(
        "[year]-[month]-[day]T[hour repr:24]:[minute]:[second].[subsecond digits:3]Z"
    ));
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_span_events(FmtSpan::CLOSE)
        .with_timer(timer)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(false)
        .with_file(false)
        .with_level(true)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Provider for nodes that sign with their own unlocked accounts.
pub fn create_provider(node_url: Url) -> impl Provider<Http<Client>, Ethereum> + Clone {
    ProviderBuilder::new()
        .with_recommended_fillers()
        .on_http(node_url)
}

/// Provider signing locally with `signers`. The first one is the default
/// sender, the others are used when a transaction names them as `from`.
pub fn create_signing_provider(
    node_url: Url,
    signers: Vec<PrivateKeySigner>,
) -> anyhow::Result<impl Provider<Http<Client>, Ethereum> + Clone> {
    let mut signers = signers.into_iter();
    let first = signers
        .next()
        .ok_or_else(|| anyhow!("at least one private key is required"))?;
    let mut wallet = EthereumWallet::from(first);
    for signer in signers {
        wallet.register_signer(signer);
    }
    Ok(ProviderBuilder::new()
        .with_recommended_fillers() // nonce, gas and chain id
        .wallet(wallet)
        .on_http(node_url))
}
