use std::{collections::BTreeMap, str::FromStr};

use alloy::primitives::Address;

use crate::DeployError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccountRef {
    Index(usize),
    Address(Address),
}

/// `name=<index>` picks from the account list, `name=<0x address>` is taken as is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamedAccountSpec {
    pub name: String,
    pub account: AccountRef,
}

impl NamedAccountSpec {
    pub fn index(name: &str, index: usize) -> Self {
        Self {
            name: name.to_string(),
            account: AccountRef::Index(index),
        }
    }
}

impl FromStr for NamedAccountSpec {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DeployError::InvalidNamedAccount(s.to_string());
        let (name, value) = s.split_once('=').ok_or_else(invalid)?;
        let (name, value) = (name.trim(), value.trim());
        if name.is_empty() {
            return Err(invalid());
        }
        let account = if value.starts_with("0x") {
            AccountRef::Address(value.parse().map_err(|_| invalid())?)
        } else {
            AccountRef::Index(value.parse().map_err(|_| invalid())?)
        };
        Ok(Self {
            name: name.to_string(),
            account,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NamedAccounts(BTreeMap<String, Address>);

impl NamedAccounts {
    pub fn resolve(specs: &[NamedAccountSpec], accounts: &[Address]) -> Result<Self, DeployError> {
        specs
            .iter()
            .map(|spec| {
                let address = match spec.account {
                    AccountRef::Address(a) => a,
                    AccountRef::Index(index) => {
                        *accounts.get(index).ok_or_else(|| DeployError::AccountIndex {
                            name: spec.name.clone(),
                            index,
                            available: accounts.len(),
                        })?
                    }
                };
                Ok((spec.name.clone(), address))
            })
            .collect::<Result<BTreeMap<_, _>, DeployError>>()
            .map(Self)
    }

    pub fn insert(&mut self, name: &str, address: Address) {
        self.0.insert(name.to_string(), address);
    }

    pub fn get(&self, name: &str) -> Result<Address, DeployError> {
        self.0
            .get(name)
            .copied()
            .ok_or_else(|| DeployError::NoAccount(name.to_string()))
    }
}
