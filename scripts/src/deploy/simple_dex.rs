use alloy::{dyn_abi::DynSolValue, primitives::Address};
use anyhow::Result;
use async_trait::async_trait;
use deployments::{DeployFunction, DeployOptions, DeploymentEnvironment};

/// Deploys both tokens, then the exchange over them.
pub struct DeploySimpleDex;

impl DeploySimpleDex {
    fn options(from: Address, args: Vec<DynSolValue>) -> DeployOptions {
        DeployOptions {
            args,
            log: true,
            auto_mine: true,
            ..DeployOptions::new(from)
        }
    }
}

#[async_trait]
impl DeployFunction for DeploySimpleDex {
    fn id(&self) -> &'static str {
        "00_deploy_simple_dex"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["SimpleDEX"]
    }

    async fn run(&self, env: &dyn DeploymentEnvironment) -> Result<()> {
        let deployer = env.named_accounts().await?.get("deployer")?;

        let token_a = env.deploy("TokenA", Self::options(deployer, vec![])).await?;
        env.log(&format!("TokenA deployed at: {}", token_a.address));

        let token_b = env.deploy("TokenB", Self::options(deployer, vec![])).await?;
        env.log(&format!("TokenB deployed at: {}", token_b.address));

        let args = vec![
            DynSolValue::Address(token_a.address),
            DynSolValue::Address(token_b.address),
        ];
        let dex = env.deploy("SimpleDEX", Self::options(deployer, args)).await?;
        env.log(&format!("SimpleDEX deployed at: {}", dex.address));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, sync::Mutex};

    use alloy::{json_abi::JsonAbi, primitives::B256};
    use deployments::{DeployError, Deployment, NamedAccounts};
    use proptest::prelude::*;

    use super::*;

    const DEPLOYER: Address = Address::repeat_byte(0x0d);

    struct MockEnv {
        accounts: NamedAccounts,
        addresses: HashMap<&'static str, Address>,
        fail_on: Option<&'static str>,
        deploys: Mutex<Vec<(String, DeployOptions)>>,
        logs: Mutex<Vec<String>>,
    }

    impl MockEnv {
        fn new(token_a: Address, token_b: Address) -> Self {
            let mut accounts = NamedAccounts::default();
            accounts.insert("deployer", DEPLOYER);
            Self {
                accounts,
                addresses: HashMap::from([
                    ("TokenA", token_a),
                    ("TokenB", token_b),
                    ("SimpleDEX", Address::repeat_byte(0xdd)),
                ]),
                fail_on: None,
                deploys: Mutex::new(vec![]),
                logs: Mutex::new(vec![]),
            }
        }

        fn deployed_names(&self) -> Vec<String> {
            self.deploys
                .lock()
                .unwrap()
                .iter()
                .map(|(name, _)| name.clone())
                .collect()
        }
    }

    #[async_trait]
    impl DeploymentEnvironment for MockEnv {
        async fn named_accounts(&self) -> Result<NamedAccounts, DeployError> {
            Ok(self.accounts.clone())
        }

        async fn deploy(&self, name: &str, options: DeployOptions) -> Result<Deployment, DeployError> {
            self.deploys
                .lock()
                .unwrap()
                .push((name.to_string(), options.clone()));
            if self.fail_on == Some(name) {
                return Err(DeployError::Reverted {
                    name: name.to_string(),
                    tx_hash: B256::repeat_byte(0xee),
                });
            }
            Ok(Deployment {
                address: self.addresses[name],
                abi: JsonAbi::default(),
                transaction_hash: Some(B256::repeat_byte(0x01)),
                deployer: options.from,
                block_number: Some(1),
                gas_used: Some(21_000),
                deploy_data_hash: B256::ZERO,
                newly_deployed: true,
            })
        }

        async fn get(&self, name: &str) -> Result<Deployment, DeployError> {
            Err(DeployError::NotDeployed(name.to_string()))
        }

        fn log(&self, message: &str) {
            self.logs.lock().unwrap().push(message.to_string());
        }
    }

    #[tokio::test]
    async fn deploys_tokens_then_exchange() {
        let token_a = Address::repeat_byte(0xaa);
        let token_b = Address::repeat_byte(0xbb);
        let env = MockEnv::new(token_a, token_b);

        DeploySimpleDex.run(&env).await.unwrap();

        let deploys = env.deploys.lock().unwrap();
        assert_eq!(deploys.len(), 3);
        assert_eq!(deploys[0].0, "TokenA");
        assert_eq!(deploys[1].0, "TokenB");
        assert_eq!(deploys[2].0, "SimpleDEX");
        assert!(deploys[0].1.args.is_empty());
        assert!(deploys[1].1.args.is_empty());
        assert_eq!(
            deploys[2].1.args,
            vec![DynSolValue::Address(token_a), DynSolValue::Address(token_b)]
        );
        for (_, options) in deploys.iter() {
            assert_eq!(options.from, DEPLOYER);
            assert!(options.log);
            assert!(options.auto_mine);
        }

        assert_eq!(
            *env.logs.lock().unwrap(),
            vec![
                format!("TokenA deployed at: {token_a}"),
                format!("TokenB deployed at: {token_b}"),
                format!("SimpleDEX deployed at: {}", Address::repeat_byte(0xdd)),
            ]
        );
    }

    #[tokio::test]
    async fn token_failure_stops_before_exchange() {
        let mut env = MockEnv::new(Address::repeat_byte(0xaa), Address::repeat_byte(0xbb));
        env.fail_on = Some("TokenB");

        let err = DeploySimpleDex.run(&env).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DeployError>(),
            Some(DeployError::Reverted { name, .. }) if name == "TokenB"
        ));
        assert_eq!(env.deployed_names(), vec!["TokenA", "TokenB"]);
        assert_eq!(env.logs.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn token_a_failure_stops_before_token_b() {
        let mut env = MockEnv::new(Address::repeat_byte(0xaa), Address::repeat_byte(0xbb));
        env.fail_on = Some("TokenA");

        assert!(DeploySimpleDex.run(&env).await.is_err());
        assert_eq!(env.deployed_names(), vec!["TokenA"]);
        assert!(env.logs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_deployer_deploys_nothing() {
        let mut env = MockEnv::new(Address::repeat_byte(0xaa), Address::repeat_byte(0xbb));
        env.accounts = NamedAccounts::default();

        let err = DeploySimpleDex.run(&env).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DeployError>(),
            Some(DeployError::NoAccount(name)) if name == "deployer"
        ));
        assert!(env.deployed_names().is_empty());
    }

    proptest! {
        #[test]
        fn token_addresses_reach_the_exchange_verbatim(
            a in any::<[u8; 20]>(),
            b in any::<[u8; 20]>(),
            same in any::<bool>(),
        ) {
            let token_a = Address::from(a);
            let token_b = if same { token_a } else { Address::from(b) };
            let env = MockEnv::new(token_a, token_b);

            let runtime = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();
            runtime.block_on(DeploySimpleDex.run(&env)).unwrap();

            let deploys = env.deploys.lock().unwrap();
            prop_assert_eq!(
                &deploys[2].1.args,
                &vec![DynSolValue::Address(token_a), DynSolValue::Address(token_b)]
            );
        }
    }
}
