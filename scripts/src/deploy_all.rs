use std::io::Write;

use alloy::dyn_abi::DynSolValue;
use anyhow::{anyhow, Result};
use deployments::{
    artifact::ArtifactSource, chain::Chain, factory::ArtifactClient, ChainClient, DeployedContract,
};
use tracing::debug;

use crate::{
    cli::RunConfig,
    env::{create_provider, create_signing_provider},
};

const TOKEN_A: &str = "TokenA";
const TOKEN_B: &str = "TokenB";
const SIMPLE_DEX: &str = "SimpleDEX";

/// Deploys TokenA, TokenB and SimpleDEX(TokenA, TokenB) from the first signer,
/// writing the deployer and the three addresses to `out`.
pub async fn deploy_all(client: &dyn ChainClient, out: &mut impl Write) -> Result<()> {
    let deployer = *client
        .signers()
        .await?
        .first()
        .ok_or_else(|| anyhow!("no signer available"))?;
    writeln!(out, "Deploying contracts with the account: {}", deployer)?;

    let token_a = deploy(client, TOKEN_A, vec![]).await?;
    let token_b = deploy(client, TOKEN_B, vec![]).await?;
    let simple_dex = deploy(
        client,
        SIMPLE_DEX,
        vec![
            DynSolValue::Address(token_a.address()),
            DynSolValue::Address(token_b.address()),
        ],
    )
    .await?;

    writeln!(out, "Address {}: {}", TOKEN_A, token_a.address())?;
    writeln!(out, "Address {}: {}", TOKEN_B, token_b.address())?;
    writeln!(out, "Address {}: {}", SIMPLE_DEX, simple_dex.address())?;
    Ok(())
}

async fn deploy(
    client: &dyn ChainClient,
    name: &str,
    args: Vec<DynSolValue>,
) -> Result<DeployedContract> {
    let contract = client.contract_factory(name).await?.deploy(args).await?;
    debug!("{} created in tx {}", name, contract.transaction_hash());
    Ok(contract)
}

/// Connects to the configured node and runs [`deploy_all`].
pub async fn run(config: &RunConfig, out: &mut impl Write) -> Result<()> {
    let node_url = config.base.node_url()?;
    let signers = config.base.signers()?;
    let artifacts = ArtifactSource::new(&config.base.artifacts_dir);
    if signers.is_empty() {
        let chain = Chain::connect(create_provider(node_url), vec![], config.base.chain_id).await?;
        deploy_all(&ArtifactClient::new(chain, artifacts), out).await
    } else {
        let addresses = signers.iter().map(|s| s.address()).collect();
        let provider = create_signing_provider(node_url, signers)?;
        let chain = Chain::connect(provider, addresses, config.base.chain_id).await?;
        deploy_all(&ArtifactClient::new(chain, artifacts), out).await
    }
}

/// Process exit status for a finished run: 0 on success, otherwise the error
/// goes to `err` and the status is 1.
pub fn exit_code(result: Result<()>, err: &mut impl Write) -> u8 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            // Nothing left to report to if stderr is gone.
            let _ = writeln!(err, "{:?}", e);
            1
        }
    }
}
