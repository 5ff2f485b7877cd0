//! Contract factories for scripts that deploy without the deployment cache.

use alloy::{
    dyn_abi::DynSolValue,
    primitives::{Address, TxHash},
};
use async_trait::async_trait;

use crate::{
    artifact::{Artifact, ArtifactSource},
    chain::DeployBackend,
    DeployError,
};

/// A contract whose creation has been confirmed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeployedContract {
    address: Address,
    transaction_hash: TxHash,
}

impl DeployedContract {
    pub fn new(address: Address, transaction_hash: TxHash) -> Self {
        Self {
            address,
            transaction_hash,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn transaction_hash(&self) -> TxHash {
        self.transaction_hash
    }
}

#[async_trait]
pub trait ContractFactory: Send + Sync {
    /// Deploys a new instance and waits until it is mined.
    async fn deploy(&self, args: Vec<DynSolValue>) -> Result<DeployedContract, DeployError>;
}

#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn signers(&self) -> Result<Vec<Address>, DeployError>;

    async fn contract_factory(&self, name: &str) -> Result<Box<dyn ContractFactory>, DeployError>;
}

/// Builds factories from compiled artifacts, deploying from the first signer.
pub struct ArtifactClient<B> {
    chain: B,
    artifacts: ArtifactSource,
}

impl<B> ArtifactClient<B> {
    pub fn new(chain: B, artifacts: ArtifactSource) -> Self {
        Self { chain, artifacts }
    }
}

#[async_trait]
impl<B> ChainClient for ArtifactClient<B>
where
    B: DeployBackend + Clone + 'static,
{
    async fn signers(&self) -> Result<Vec<Address>, DeployError> {
        Ok(self.chain.accounts().to_vec())
    }

    async fn contract_factory(&self, name: &str) -> Result<Box<dyn ContractFactory>, DeployError> {
        let artifact = self.artifacts.load(name)?;
        let signer = *self.chain.accounts().first().ok_or(DeployError::NoSigner)?;
        Ok(Box::new(ArtifactFactory {
            chain: self.chain.clone(),
            artifact,
            signer,
        }))
    }
}

struct ArtifactFactory<B> {
    chain: B,
    artifact: Artifact,
    signer: Address,
}

#[async_trait]
impl<B> ContractFactory for ArtifactFactory<B>
where
    B: DeployBackend + 'static,
{
    async fn deploy(&self, args: Vec<DynSolValue>) -> Result<DeployedContract, DeployError> {
        let code = self.artifact.deploy_code(&args)?;
        let receipt = self
            .chain
            .deploy(&self.artifact.contract_name, self.signer, code, false)
            .await?;
        Ok(DeployedContract::new(
            receipt.address,
            receipt.transaction_hash,
        ))
    }
}
