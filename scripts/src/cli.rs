use std::str::FromStr;

use alloy::signers::local::PrivateKeySigner;
use clap::Parser;
use deployments::NamedAccountSpec;
use serde::Serialize;
use url::Url;

#[derive(Clone, Parser, Serialize)]
pub struct BaseConfig {
    /// Node host
    #[arg(long, env = "NODE_HOST", default_value = "localhost")]
    pub node_host: String,

    /// Node port
    #[arg(long, env = "NODE_PORT", default_value = "8545")]
    pub node_port: String,

    /// Private keys to deploy with (with or without 0x prefix), comma separated.
    /// Without keys the accounts managed by the node are used.
    #[arg(long, env = "PRIVATE_KEYS", value_delimiter = ',', hide_env_values = true)]
    #[serde(skip_serializing)]
    pub private_keys: Vec<String>,

    /// Refuse to run against any other chain
    #[arg(long, env = "CHAIN_ID")]
    pub chain_id: Option<u64>,

    /// Path to compiled contract artifacts
    #[arg(long, env = "ARTIFACTS_DIR", default_value = "artifacts")]
    pub artifacts_dir: String,
}

impl BaseConfig {
    pub fn node_url(&self) -> Result<Url, url::ParseError> {
        let node_url = format!("http://{}:{}", self.node_host, self.node_port);
        Url::parse(&node_url)
    }

    /// Local signers from `private_keys`. An empty `PRIVATE_KEYS` means none.
    pub fn signers(&self) -> anyhow::Result<Vec<PrivateKeySigner>> {
        non_blank(&self.private_keys)
            .map(|key| PrivateKeySigner::from_str(key).map_err(anyhow::Error::from))
            .collect()
    }
}

fn non_blank(values: &[String]) -> impl Iterator<Item = &str> {
    values.iter().map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Run the tagged deploy scripts, recording deployments per network
#[derive(Clone, Parser, Serialize)]
#[command(author, version, about, long_about = None)]
pub struct DeployConfig {
    #[clap(flatten)]
    pub base: BaseConfig,

    /// Network name, deployments are recorded under it
    #[arg(long, env = "NETWORK", default_value = "localhost")]
    pub network: String,

    /// Where deployment records are kept
    #[arg(long, env = "DEPLOYMENTS_DIR", default_value = "deployments")]
    pub deployments_dir: String,

    /// Only run deploy scripts with one of these tags, comma separated
    #[arg(long, env = "DEPLOY_TAGS", value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Named accounts as `<name>=<account index>` or `<name>=<address>`
    #[arg(
        long = "named-account",
        env = "NAMED_ACCOUNTS",
        value_delimiter = ',',
        default_value = DEFAULT_NAMED_ACCOUNT
    )]
    pub named_accounts: Vec<String>,
}

const DEFAULT_NAMED_ACCOUNT: &str = "deployer=0";

impl DeployConfig {
    /// Requested tags, blank entries dropped. Empty selects every script.
    pub fn tags(&self) -> Vec<String> {
        non_blank(&self.tags).map(str::to_string).collect()
    }

    /// Parsed named accounts, falling back to `deployer=0` when none are set.
    pub fn named_accounts(&self) -> anyhow::Result<Vec<NamedAccountSpec>> {
        let specs = non_blank(&self.named_accounts)
            .map(|spec| spec.parse::<NamedAccountSpec>().map_err(anyhow::Error::from))
            .collect::<anyhow::Result<Vec<_>>>()?;
        if specs.is_empty() {
            return Ok(vec![DEFAULT_NAMED_ACCOUNT.parse::<NamedAccountSpec>()?]);
        }
        Ok(specs)
    }
}

/// Deploy TokenA, TokenB and SimpleDEX with the first signer
#[derive(Clone, Parser, Serialize)]
#[command(author, version, about, long_about = None)]
pub struct RunConfig {
    #[clap(flatten)]
    pub base: BaseConfig,
}
