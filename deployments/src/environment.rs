use alloy::{
    dyn_abi::DynSolValue,
    primitives::{keccak256, Address},
};
use async_trait::async_trait;
use tracing::info;

use crate::{
    accounts::{NamedAccountSpec, NamedAccounts},
    artifact::ArtifactSource,
    chain::DeployBackend,
    store::{Deployment, DeploymentStore},
    DeployError,
};

#[derive(Clone, Debug, PartialEq)]
pub struct DeployOptions {
    pub from: Address,
    pub args: Vec<DynSolValue>,
    /// Report the deployment (or its reuse) in the log
    pub log: bool,
    /// Ask the node to mine as soon as the transaction is sent
    pub auto_mine: bool,
}

impl DeployOptions {
    pub fn new(from: Address) -> Self {
        Self {
            from,
            args: vec![],
            log: false,
            auto_mine: false,
        }
    }
}

/// What a deploy script gets to work with.
#[async_trait]
pub trait DeploymentEnvironment: Send + Sync {
    async fn named_accounts(&self) -> Result<NamedAccounts, DeployError>;

    /// Deploys the contract `name`, or returns the existing deployment when
    /// the same code and arguments are already on chain.
    async fn deploy(&self, name: &str, options: DeployOptions) -> Result<Deployment, DeployError>;

    async fn get(&self, name: &str) -> Result<Deployment, DeployError>;

    fn log(&self, message: &str);
}

pub struct Deployments<B> {
    chain: B,
    artifacts: ArtifactSource,
    store: DeploymentStore,
    named_accounts: Vec<NamedAccountSpec>,
}

impl<B> Deployments<B>
where
    B: DeployBackend,
{
    pub fn new(
        chain: B,
        artifacts: ArtifactSource,
        store: DeploymentStore,
        named_accounts: Vec<NamedAccountSpec>,
    ) -> Self {
        Self {
            chain,
            artifacts,
            store,
            named_accounts,
        }
    }

    pub fn store(&self) -> &DeploymentStore {
        &self.store
    }
}

#[async_trait]
impl<B> DeploymentEnvironment for Deployments<B>
where
    B: DeployBackend + 'static,
{
    async fn named_accounts(&self) -> Result<NamedAccounts, DeployError> {
        NamedAccounts::resolve(&self.named_accounts, self.chain.accounts())
    }

    async fn deploy(&self, name: &str, options: DeployOptions) -> Result<Deployment, DeployError> {
        let artifact = self.artifacts.load(name)?;
        let code = artifact.deploy_code(&options.args)?;
        let deploy_data_hash = keccak256(&code);

        if let Some(existing) = self.store.load(name)? {
            if existing.deploy_data_hash == deploy_data_hash
                && self.chain.has_code(existing.address).await?
            {
                if options.log {
                    info!("reusing \"{}\" at {}", name, existing.address);
                }
                return Ok(Deployment {
                    newly_deployed: false,
                    ..existing
                });
            }
        }

        let receipt = self
            .chain
            .deploy(name, options.from, code, options.auto_mine)
            .await?;
        if options.log {
            info!(
                "deploying \"{}\" (tx: {})...: deployed at {} with {} gas",
                name, receipt.transaction_hash, receipt.address, receipt.gas_used
            );
        }

        let deployment = Deployment {
            address: receipt.address,
            abi: artifact.abi,
            transaction_hash: Some(receipt.transaction_hash),
            deployer: options.from,
            block_number: receipt.block_number,
            gas_used: Some(receipt.gas_used),
            deploy_data_hash,
            newly_deployed: true,
        };
        self.store.save(name, &deployment)?;
        Ok(deployment)
    }

    async fn get(&self, name: &str) -> Result<Deployment, DeployError> {
        self.store
            .load(name)?
            .ok_or_else(|| DeployError::NotDeployed(name.to_string()))
    }

    fn log(&self, message: &str) {
        info!("{}", message);
    }
}
