use std::path::PathBuf;

use alloy::{
    primitives::TxHash,
    providers::PendingTransactionError,
    transports::TransportError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeployError {
    #[error("no account configured for named account `{0}`")]
    NoAccount(String),

    #[error("named account `{name}` refers to account #{index}, but only {available} accounts are available")]
    AccountIndex {
        name: String,
        index: usize,
        available: usize,
    },

    #[error("invalid named account `{0}`, expected `<name>=<index>` or `<name>=<address>`")]
    InvalidNamedAccount(String),

    #[error("no signer available")]
    NoSigner,

    #[error("no artifact for `{name}` under {}", root.display())]
    ArtifactNotFound { name: String, root: PathBuf },

    #[error("artifact for `{name}` is malformed: {reason}")]
    Artifact { name: String, reason: String },

    #[error("bytecode of `{0}` has unlinked library references")]
    UnlinkedBytecode(String),

    #[error("`{0}` has no creation bytecode (abstract contract or interface?)")]
    EmptyBytecode(String),

    #[error("bad constructor arguments for `{name}`: {reason}")]
    ConstructorArgs { name: String, reason: String },

    #[error("no deployment recorded for `{0}`")]
    NotDeployed(String),

    #[error("RPC request failed: {0}")]
    Rpc(#[from] TransportError),

    #[error("failed to send deployment of `{name}`: {source}")]
    SendTransaction {
        name: String,
        #[source]
        source: TransportError,
    },

    #[error("failed to confirm deployment of `{name}`: {source}")]
    Confirmation {
        name: String,
        #[source]
        source: PendingTransactionError,
    },

    #[error("deployment of `{name}` reverted (tx: {tx_hash})")]
    Reverted { name: String, tx_hash: TxHash },

    #[error("receipt of `{name}` deployment has no contract address (tx: {tx_hash})")]
    MissingContractAddress { name: String, tx_hash: TxHash },

    #[error("connected to chain {actual}, expected chain {expected}")]
    UnexpectedChainId { expected: u64, actual: u64 },

    #[error("network `{network}` was used with chain {recorded}, now connected to chain {actual}")]
    NetworkChainMismatch {
        network: String,
        recorded: u64,
        actual: u64,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
