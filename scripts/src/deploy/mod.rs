//! Deploy scripts, in the order they run.

use std::path::Path;

use alloy::{
    network::Ethereum,
    primitives::Address,
    providers::Provider,
    transports::http::{Client, Http},
};
use anyhow::Result;
use deployments::{
    artifact::ArtifactSource, chain::Chain, run_deploy_scripts, DeployFunction, Deployments,
    DeploymentStore,
};
use tracing::{info, warn};

use crate::{
    cli::DeployConfig,
    env::{create_provider, create_signing_provider},
};

mod simple_dex;

pub use simple_dex::DeploySimpleDex;

pub fn scripts() -> Vec<Box<dyn DeployFunction>> {
    vec![Box::new(DeploySimpleDex)]
}

/// Runs the deploy scripts selected by the configured tags against the configured
/// node, signing locally when private keys are given.
pub async fn run(config: &DeployConfig) -> Result<()> {
    let node_url = config.base.node_url()?;
    let signers = config.base.signers()?;
    if signers.is_empty() {
        run_with(config, create_provider(node_url), vec![]).await
    } else {
        let addresses = signers.iter().map(|s| s.address()).collect();
        let provider = create_signing_provider(node_url, signers)?;
        run_with(config, provider, addresses).await
    }
}

async fn run_with<P>(config: &DeployConfig, provider: P, local_signers: Vec<Address>) -> Result<()>
where
    P: Provider<Http<Client>, Ethereum> + Clone + 'static,
{
    let tags = config.tags();
    let named_accounts = config.named_accounts()?;
    let chain = Chain::connect(provider, local_signers, config.base.chain_id).await?;
    let store = DeploymentStore::open(
        Path::new(&config.deployments_dir),
        &config.network,
        chain.chain_id(),
    )?;
    let env = Deployments::new(
        chain,
        ArtifactSource::new(&config.base.artifacts_dir),
        store,
        named_accounts,
    );

    let ran = run_deploy_scripts(&scripts(), &tags, &env).await?;
    if ran.is_empty() {
        warn!("No deploy script tagged with any of {:?}", tags);
    }
    for (name, deployment) in env.store().all()? {
        info!("{}: {}", name, deployment.address);
    }
    Ok(())
}
