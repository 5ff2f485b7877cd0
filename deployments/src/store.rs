use std::path::{Path, PathBuf};

use alloy::{
    json_abi::JsonAbi,
    primitives::{Address, TxHash, B256},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::DeployError;

const CHAIN_ID_FILE: &str = ".chainId";

/// The record kept for a deployed contract.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub address: Address,
    pub abi: JsonAbi,
    pub transaction_hash: Option<TxHash>,
    pub deployer: Address,
    pub block_number: Option<u64>,
    pub gas_used: Option<u64>,
    /// keccak256 of the creation code with its constructor arguments
    pub deploy_data_hash: B256,
    /// Set when this run sent the deployment, cleared when the record was reused
    #[serde(skip)]
    pub newly_deployed: bool,
}

/// Deployment records of one network, one JSON file per contract.
pub struct DeploymentStore {
    root_dir: PathBuf,
}

impl DeploymentStore {
    /// Opens `<root>/<network>`, refusing to mix records from different chains
    /// under the same network name.
    pub fn open(root: &Path, network: &str, chain_id: u64) -> Result<Self, DeployError> {
        let root_dir = root.join(network);
        std::fs::create_dir_all(&root_dir)?;

        let chain_id_path = root_dir.join(CHAIN_ID_FILE);
        if chain_id_path.is_file() {
            let recorded = std::fs::read_to_string(&chain_id_path)?;
            let recorded: u64 = recorded.trim().parse().map_err(|_| {
                DeployError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("{} is not a chain id", chain_id_path.display()),
                ))
            })?;
            if recorded != chain_id {
                return Err(DeployError::NetworkChainMismatch {
                    network: network.to_string(),
                    recorded,
                    actual: chain_id,
                });
            }
        } else {
            std::fs::write(&chain_id_path, chain_id.to_string())?;
        }

        debug!("Using deployments in {:#}", root_dir.display());
        Ok(Self { root_dir })
    }

    fn path(&self, name: &str) -> PathBuf {
        self.root_dir.join(format!("{name}.json"))
    }

    pub fn save(&self, name: &str, deployment: &Deployment) -> Result<(), DeployError> {
        let path = self.path(name);
        info!("Saving deployment of {} to: {:#}", name, path.display());
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, deployment)?;
        Ok(())
    }

    pub fn load(&self, name: &str) -> Result<Option<Deployment>, DeployError> {
        let path = self.path(name);
        if !path.is_file() {
            return Ok(None);
        }
        debug!("Loading deployment of {} from: {:#}", name, path.display());
        let file = std::fs::File::open(path)?;
        Ok(Some(serde_json::from_reader(file)?))
    }

    /// Every record in the store, sorted by contract name.
    pub fn all(&self) -> Result<Vec<(String, Deployment)>, DeployError> {
        let mut names = std::fs::read_dir(&self.root_dir)?
            .filter_map(|entry| {
                let path = entry.ok()?.path();
                if path.extension()? != "json" {
                    return None;
                }
                Some(path.file_stem()?.to_str()?.to_string())
            })
            .collect::<Vec<_>>();
        names.sort();

        names
            .into_iter()
            .filter_map(|name| match self.load(&name) {
                Ok(Some(d)) => Some(Ok((name, d))),
                Ok(None) => None,
                Err(e) => Some(Err(e)),
            })
            .collect()
    }
}
