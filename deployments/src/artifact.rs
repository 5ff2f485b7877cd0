//! Loading compiled contract artifacts.
//!
//! Both the Hardhat layout (`<root>/contracts/**/<Source>.sol/<Name>.json`,
//! with `bytecode` as a hex string) and the Foundry layout
//! (`<root>/<Source>.sol/<Name>.json`, with `bytecode.object`) are understood.

use std::path::{Path, PathBuf};

use alloy::{
    dyn_abi::{DynSolValue, Specifier},
    json_abi::JsonAbi,
    primitives::{hex, Bytes},
};
use serde::Deserialize;
use tracing::debug;

use crate::DeployError;

#[derive(Clone, Debug)]
pub struct Artifact {
    pub contract_name: String,
    pub abi: JsonAbi,
    pub bytecode: Bytes,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BytecodeField {
    Hex(String),
    Object { object: String },
}

#[derive(Deserialize)]
struct ArtifactFile {
    abi: JsonAbi,
    bytecode: BytecodeField,
}

impl Artifact {
    pub fn from_json(name: &str, json: &str) -> Result<Self, DeployError> {
        let file: ArtifactFile = serde_json::from_str(json).map_err(|e| DeployError::Artifact {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        let code = match file.bytecode {
            BytecodeField::Hex(s) => s,
            BytecodeField::Object { object } => object,
        };
        let code = code.strip_prefix("0x").unwrap_or(&code);
        if code.contains("__") {
            return Err(DeployError::UnlinkedBytecode(name.to_string()));
        }
        if code.is_empty() {
            return Err(DeployError::EmptyBytecode(name.to_string()));
        }
        let bytecode = hex::decode(code).map_err(|e| DeployError::Artifact {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            contract_name: name.to_string(),
            abi: file.abi,
            bytecode: bytecode.into(),
        })
    }

    /// Creation code with the ABI-encoded constructor arguments appended.
    ///
    /// The arguments are checked against the constructor declared in the ABI,
    /// a contract without a constructor takes no arguments.
    pub fn deploy_code(&self, args: &[DynSolValue]) -> Result<Bytes, DeployError> {
        let inputs = self
            .abi
            .constructor()
            .map(|c| c.inputs.as_slice())
            .unwrap_or_default();
        if inputs.len() != args.len() {
            return Err(self.bad_args(format!(
                "expected {} arguments, got {}",
                inputs.len(),
                args.len()
            )));
        }
        for (i, (param, value)) in inputs.iter().zip(args).enumerate() {
            let ty = param.resolve().map_err(|e| self.bad_args(e.to_string()))?;
            if !ty.matches(value) {
                return Err(self.bad_args(format!(
                    "argument {} (`{}`) is not a {}",
                    i,
                    param.name,
                    ty.sol_type_name()
                )));
            }
        }

        let mut code = self.bytecode.to_vec();
        if !args.is_empty() {
            code.extend(DynSolValue::Tuple(args.to_vec()).abi_encode_params());
        }
        Ok(code.into())
    }

    fn bad_args(&self, reason: String) -> DeployError {
        DeployError::ConstructorArgs {
            name: self.contract_name.clone(),
            reason,
        }
    }
}

/// A directory of compiled artifacts.
#[derive(Clone, Debug)]
pub struct ArtifactSource {
    root: PathBuf,
}

impl ArtifactSource {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Finds the artifact of contract `name` anywhere under the root, whatever
    /// source file declared it. A name compiled from two sources is an error.
    pub fn load(&self, name: &str) -> Result<Artifact, DeployError> {
        let not_found = || DeployError::ArtifactNotFound {
            name: name.to_string(),
            root: self.root.clone(),
        };
        if !self.root.is_dir() {
            return Err(not_found());
        }

        let mut found = vec![];
        collect_artifacts(&self.root, &format!("{name}.json"), &mut found)?;
        found.sort();
        let path = match found.as_slice() {
            [] => return Err(not_found()),
            [path] => path,
            paths => {
                return Err(DeployError::Artifact {
                    name: name.to_string(),
                    reason: format!(
                        "found in several sources: {}",
                        paths
                            .iter()
                            .map(|p| p.display().to_string())
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                })
            }
        };
        debug!("Loading artifact for {} from {}", name, path.display());
        let json = std::fs::read_to_string(path)?;
        Artifact::from_json(name, &json)
    }
}

/// Collects `<Source>.sol/<file>` below `dir`. Build info is skipped.
fn collect_artifacts(dir: &Path, file: &str, found: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            if entry.file_name() != "build-info" {
                collect_artifacts(&path, file, found)?;
            }
        } else if entry.file_name() == file
            && dir.extension().is_some_and(|ext| ext == "sol")
        {
            found.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::Address;

    static EXCHANGE_ABI: &str = r#"[{
        "type": "constructor",
        "stateMutability": "nonpayable",
        "inputs": [
            {"name": "_tokenA", "type": "address", "internalType": "address"},
            {"name": "_tokenB", "type": "address", "internalType": "address"}
        ]
    }]"#;

    fn hardhat_json(abi: &str, bytecode: &str) -> String {
        format!(r#"{{"contractName": "X", "abi": {abi}, "bytecode": "{bytecode}"}}"#)
    }

    #[test]
    fn parses_hardhat_and_foundry_bytecode() {
        let hardhat = Artifact::from_json("TokenA", &hardhat_json("[]", "0x6080")).unwrap();
        assert_eq!(hardhat.bytecode.to_vec(), vec![0x60, 0x80]);

        let foundry = r#"{"abi": [], "bytecode": {"object": "0x6001", "linkReferences": {}}}"#;
        let foundry = Artifact::from_json("TokenB", foundry).unwrap();
        assert_eq!(foundry.bytecode.to_vec(), vec![0x60, 0x01]);
    }

    #[test]
    fn rejects_unlinked_and_empty_bytecode() {
        let unlinked = hardhat_json("[]", "0x73__$abcdef$__6080");
        assert!(matches!(
            Artifact::from_json("Lib", &unlinked),
            Err(DeployError::UnlinkedBytecode(_))
        ));
        assert!(matches!(
            Artifact::from_json("IERC20", &hardhat_json("[]", "0x")),
            Err(DeployError::EmptyBytecode(_))
        ));
    }

    #[test]
    fn appends_encoded_constructor_args() {
        let artifact = Artifact::from_json("SimpleDEX", &hardhat_json(EXCHANGE_ABI, "0xfe")).unwrap();
        let a = Address::repeat_byte(0xaa);
        let b = Address::repeat_byte(0xbb);
        let code = artifact
            .deploy_code(&[DynSolValue::Address(a), DynSolValue::Address(b)])
            .unwrap();

        assert_eq!(code.len(), 1 + 64);
        assert_eq!(code[0], 0xfe);
        assert_eq!(&code[13..33], a.as_slice());
        assert_eq!(&code[45..65], b.as_slice());
    }

    #[test]
    fn checks_constructor_arity_and_types() {
        let artifact = Artifact::from_json("SimpleDEX", &hardhat_json(EXCHANGE_ABI, "0xfe")).unwrap();
        let a = DynSolValue::Address(Address::ZERO);

        assert!(matches!(
            artifact.deploy_code(&[a.clone()]),
            Err(DeployError::ConstructorArgs { .. })
        ));
        assert!(matches!(
            artifact.deploy_code(&[a, DynSolValue::Bool(true)]),
            Err(DeployError::ConstructorArgs { .. })
        ));

        let token = Artifact::from_json("TokenA", &hardhat_json("[]", "0xfe")).unwrap();
        assert_eq!(token.deploy_code(&[]).unwrap().to_vec(), vec![0xfe]);
    }

    #[test]
    fn finds_artifacts_in_either_layout() {
        let dir = tempfile::tempdir().unwrap();
        let hardhat = dir.path().join("contracts/TokenA.sol");
        std::fs::create_dir_all(&hardhat).unwrap();
        std::fs::write(hardhat.join("TokenA.json"), hardhat_json("[]", "0x01")).unwrap();
        let foundry = dir.path().join("TokenB.sol");
        std::fs::create_dir_all(&foundry).unwrap();
        std::fs::write(
            foundry.join("TokenB.json"),
            r#"{"abi": [], "bytecode": {"object": "0x02"}}"#,
        )
        .unwrap();

        let source = ArtifactSource::new(dir.path());
        assert_eq!(source.load("TokenA").unwrap().bytecode.to_vec(), vec![0x01]);
        assert_eq!(source.load("TokenB").unwrap().bytecode.to_vec(), vec![0x02]);
        assert!(matches!(
            source.load("SimpleDEX"),
            Err(DeployError::ArtifactNotFound { .. })
        ));
    }

    #[test]
    fn finds_contracts_by_name_whatever_the_source_file() {
        let dir = tempfile::tempdir().unwrap();
        let tokens = dir.path().join("contracts/tokens/Tokens.sol");
        std::fs::create_dir_all(&tokens).unwrap();
        std::fs::write(tokens.join("TokenA.json"), hardhat_json("[]", "0x0a")).unwrap();
        std::fs::write(tokens.join("TokenA.dbg.json"), "{}").unwrap();
        std::fs::write(tokens.join("TokenB.json"), hardhat_json("[]", "0x0b")).unwrap();
        let build_info = dir.path().join("build-info/Tokens.sol");
        std::fs::create_dir_all(&build_info).unwrap();
        std::fs::write(build_info.join("TokenA.json"), "{}").unwrap();

        let source = ArtifactSource::new(dir.path());
        assert_eq!(source.load("TokenA").unwrap().bytecode.to_vec(), vec![0x0a]);
        assert_eq!(source.load("TokenB").unwrap().bytecode.to_vec(), vec![0x0b]);

        let other = dir.path().join("contracts/Other.sol");
        std::fs::create_dir_all(&other).unwrap();
        std::fs::write(other.join("TokenA.json"), hardhat_json("[]", "0x0c")).unwrap();
        assert!(matches!(
            source.load("TokenA"),
            Err(DeployError::Artifact { reason, .. }) if reason.contains("several sources")
        ));
        assert!(matches!(
            ArtifactSource::new(dir.path().join("missing")).load("TokenA"),
            Err(DeployError::ArtifactNotFound { .. })
        ));
    }
}
