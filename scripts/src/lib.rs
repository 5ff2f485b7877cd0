pub mod cli;
pub mod deploy;
pub mod deploy_all;
pub mod env;
