//! Contract deployment toolkit: named accounts, artifact loading, cached
//! deployments recorded per network, tagged deploy scripts and plain
//! contract factories.

pub mod accounts;
pub mod artifact;
pub mod chain;
pub mod environment;
mod error;
pub mod factory;
pub mod script;
pub mod store;

pub use accounts::{NamedAccountSpec, NamedAccounts};
pub use environment::{DeployOptions, DeploymentEnvironment, Deployments};
pub use error::DeployError;
pub use factory::{ChainClient, ContractFactory, DeployedContract};
pub use script::{run_deploy_scripts, DeployFunction};
pub use store::{Deployment, DeploymentStore};
