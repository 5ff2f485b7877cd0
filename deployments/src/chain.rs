use alloy::{
    network::{Ethereum, TransactionBuilder},
    primitives::{Address, Bytes, TxHash},
    providers::Provider,
    rpc::types::TransactionRequest,
    transports::http::{Client, Http},
};
use async_trait::async_trait;
use tracing::{debug, info};

use crate::DeployError;

/// The chain operations deployments need.
#[async_trait]
pub trait DeployBackend: Send + Sync {
    /// Accounts deployments may be sent from, in named-account index order.
    fn accounts(&self) -> &[Address];

    async fn has_code(&self, address: Address) -> Result<bool, DeployError>;

    /// Sends a contract creation and waits for its receipt.
    ///
    /// With `auto_mine` the node is asked to mine a block right after the
    /// transaction is submitted.
    async fn deploy(
        &self,
        name: &str,
        from: Address,
        code: Bytes,
        auto_mine: bool,
    ) -> Result<DeployReceipt, DeployError>;
}

/// What the chain reports back for a confirmed contract creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeployReceipt {
    pub address: Address,
    pub transaction_hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

#[derive(Clone)]
pub struct Chain<P> {
    provider: P,
    accounts: Vec<Address>,
    chain_id: u64,
}

impl<P> Chain<P>
where
    P: Provider<Http<Client>, Ethereum> + Clone,
{
    /// Connects to the node behind `provider`.
    ///
    /// The account list is `local_signers` when the provider signs locally,
    /// otherwise whatever accounts the node manages itself.
    pub async fn connect(
        provider: P,
        local_signers: Vec<Address>,
        expected_chain_id: Option<u64>,
    ) -> Result<Self, DeployError> {
        let chain_id = provider.get_chain_id().await?;
        if let Some(expected) = expected_chain_id {
            if expected != chain_id {
                return Err(DeployError::UnexpectedChainId {
                    expected,
                    actual: chain_id,
                });
            }
        }

        let accounts = if local_signers.is_empty() {
            debug!("No local signers, using node accounts");
            provider.get_accounts().await?
        } else {
            local_signers
        };
        info!(
            "Connected to chain {} with {} accounts",
            chain_id,
            accounts.len()
        );

        Ok(Self {
            provider,
            accounts,
            chain_id,
        })
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Nodes without `evm_mine` are left alone.
    async fn mine(&self) {
        let res = self
            .provider
            .raw_request::<_, serde_json::Value>("evm_mine".into(), ())
            .await;
        if let Err(e) = res {
            debug!("evm_mine not available: {}", e);
        }
    }
}

#[async_trait]
impl<P> DeployBackend for Chain<P>
where
    P: Provider<Http<Client>, Ethereum> + Clone + 'static,
{
    fn accounts(&self) -> &[Address] {
        &self.accounts
    }

    async fn has_code(&self, address: Address) -> Result<bool, DeployError> {
        let code = self.provider.get_code_at(address).await?;
        Ok(!code.is_empty())
    }

    async fn deploy(
        &self,
        name: &str,
        from: Address,
        code: Bytes,
        auto_mine: bool,
    ) -> Result<DeployReceipt, DeployError> {
        let tx = TransactionRequest::default()
            .with_from(from)
            .with_deploy_code(code);
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|source| DeployError::SendTransaction {
                name: name.to_string(),
                source,
            })?;
        let tx_hash = *pending.tx_hash();
        debug!("Sent deployment of {} in tx {:#}", name, tx_hash);

        if auto_mine {
            self.mine().await;
        }

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|source| DeployError::Confirmation {
                name: name.to_string(),
                source,
            })?;
        if !receipt.status() {
            return Err(DeployError::Reverted {
                name: name.to_string(),
                tx_hash,
            });
        }
        let address = receipt
            .contract_address
            .ok_or_else(|| DeployError::MissingContractAddress {
                name: name.to_string(),
                tx_hash,
            })?;

        Ok(DeployReceipt {
            address,
            transaction_hash: tx_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
        })
    }
}
