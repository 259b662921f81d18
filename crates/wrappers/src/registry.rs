// Copyright (C) 2024-2026 The dao-rs contributors.
//
// registry.rs file belongs to the dao-rs project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! The contract registry.
//!
//! Maps each contract kind to its deployment coordinates: the address
//! of an existing deployment and, optionally, the bytecode for fresh
//! deployments. Built once at process start, from code or from a JSON
//! manifest, and passed by reference afterwards.

use crate::codec::ParamTable;
use crate::error::{WrapperError, WrapperResult};
use crate::{contribution_reward, dao_creator, genesis_protocol, scheme_registrar, vesting};
use dao_abi::AbiDescriptor;
use dao_primitives::{Address, Permissions};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The contract types this SDK wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractKind {
    /// The organization factory and orchestrator target.
    DaoCreator,
    /// The holographic-consensus voting machine.
    GenesisProtocol,
    /// The contribution reward scheme.
    ContributionReward,
    /// The scheme registrar scheme.
    SchemeRegistrar,
    /// The token vesting scheme.
    VestingScheme,
}

impl ContractKind {
    /// Contract name, as used in manifests and error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ContractKind::DaoCreator => "DaoCreator",
            ContractKind::GenesisProtocol => "GenesisProtocol",
            ContractKind::ContributionReward => "ContributionReward",
            ContractKind::SchemeRegistrar => "SchemeRegistrar",
            ContractKind::VestingScheme => "VestingScheme",
        }
    }

    /// The SDK-facing ABI of this contract type.
    #[must_use]
    pub fn abi(self) -> &'static AbiDescriptor {
        match self {
            ContractKind::DaoCreator => dao_creator::abi(),
            ContractKind::GenesisProtocol => genesis_protocol::abi(),
            ContractKind::ContributionReward => contribution_reward::abi(),
            ContractKind::SchemeRegistrar => scheme_registrar::abi(),
            ContractKind::VestingScheme => vesting::abi(),
        }
    }

    /// The parameter table of this contract type, for configurable
    /// contracts.
    #[must_use]
    pub fn param_table(self) -> Option<&'static ParamTable> {
        match self {
            ContractKind::DaoCreator => None,
            ContractKind::GenesisProtocol => Some(&genesis_protocol::PARAMS),
            ContractKind::ContributionReward => Some(&contribution_reward::PARAMS),
            ContractKind::SchemeRegistrar => Some(&scheme_registrar::PARAMS),
            ContractKind::VestingScheme => Some(&vesting::PARAMS),
        }
    }

    /// The permissions a scheme of this kind is conventionally granted
    /// when registered with a controller.
    #[must_use]
    pub const fn default_permissions(self) -> Permissions {
        match self {
            ContractKind::DaoCreator => Permissions::ALL,
            ContractKind::SchemeRegistrar => Permissions::REGISTERED
                .with(Permissions::MANAGE_SCHEMES),
            ContractKind::GenesisProtocol
            | ContractKind::ContributionReward
            | ContractKind::VestingScheme => Permissions::REGISTERED,
        }
    }
}

/// Deployment coordinates of one contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    /// Address of an existing deployment.
    #[serde(default)]
    pub address: Option<Address>,
    /// Deployment bytecode, hex encoded in manifests.
    #[serde(default, with = "opt_hex")]
    pub bytecode: Option<Vec<u8>>,
}

mod opt_hex {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        data: &Option<Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match data {
            Some(bytes) => serializer.serialize_some(&format!("0x{}", hex::encode(bytes))),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        let text: Option<String> = Option::deserialize(deserializer)?;
        match text {
            Some(s) => {
                let stripped = s.strip_prefix("0x").unwrap_or(&s);
                hex::decode(stripped).map(Some).map_err(D::Error::custom)
            }
            None => Ok(None),
        }
    }
}

/// Where each wrapped contract lives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractRegistry {
    deployments: HashMap<ContractKind, Deployment>,
}

impl ContractRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a registry from a JSON manifest mapping contract names to
    /// deployment coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`WrapperError::Manifest`] for malformed JSON or unknown
    /// contract names.
    pub fn from_json(manifest: &str) -> WrapperResult<Self> {
        serde_json::from_str(manifest).map_err(|err| WrapperError::Manifest(err.to_string()))
    }

    /// Registers the address of an existing deployment.
    pub fn register_address(&mut self, kind: ContractKind, address: Address) {
        self.deployments.entry(kind).or_default().address = Some(address);
    }

    /// Registers deployment bytecode for fresh deployments.
    pub fn register_bytecode(&mut self, kind: ContractKind, bytecode: Vec<u8>) {
        self.deployments.entry(kind).or_default().bytecode = Some(bytecode);
    }

    /// The registered address of a contract.
    ///
    /// # Errors
    ///
    /// Returns [`WrapperError::NotDeployed`] when none is registered.
    pub fn address_of(&self, kind: ContractKind) -> WrapperResult<Address> {
        self.deployments
            .get(&kind)
            .and_then(|d| d.address)
            .ok_or(WrapperError::NotDeployed {
                contract: kind.name(),
            })
    }

    /// The registered bytecode of a contract.
    ///
    /// # Errors
    ///
    /// Returns [`WrapperError::MissingBytecode`] when none is
    /// registered.
    pub fn bytecode_of(&self, kind: ContractKind) -> WrapperResult<Vec<u8>> {
        self.deployments
            .get(&kind)
            .and_then(|d| d.bytecode.clone())
            .ok_or(WrapperError::MissingBytecode {
                contract: kind.name(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_lookup() {
        let mut registry = ContractRegistry::new();
        let address = Address::from([7u8; 20]);
        registry.register_address(ContractKind::GenesisProtocol, address);

        assert_eq!(
            registry.address_of(ContractKind::GenesisProtocol).unwrap(),
            address
        );
        assert!(matches!(
            registry.address_of(ContractKind::DaoCreator),
            Err(WrapperError::NotDeployed {
                contract: "DaoCreator"
            })
        ));
    }

    #[test]
    fn test_manifest_round_trip() {
        let manifest = r#"{
            "deployments": {
                "DaoCreator": {
                    "address": "0x46cf7fa63cf4737cdf5fcb1f4a4fdbbeca5e93a7",
                    "bytecode": "0x6060"
                },
                "GenesisProtocol": {
                    "address": "0x1111111111111111111111111111111111111111"
                }
            }
        }"#;
        let registry = ContractRegistry::from_json(manifest).unwrap();
        assert_eq!(
            registry.bytecode_of(ContractKind::DaoCreator).unwrap(),
            vec![0x60, 0x60]
        );
        assert!(registry.address_of(ContractKind::GenesisProtocol).is_ok());
        assert!(matches!(
            registry.bytecode_of(ContractKind::GenesisProtocol),
            Err(WrapperError::MissingBytecode { .. })
        ));
    }

    #[test]
    fn test_malformed_manifest_rejected() {
        assert!(matches!(
            ContractRegistry::from_json("{ not json"),
            Err(WrapperError::Manifest(_))
        ));
        assert!(matches!(
            ContractRegistry::from_json(r#"{"deployments": {"NoSuchContract": {}}}"#),
            Err(WrapperError::Manifest(_))
        ));
    }

    #[test]
    fn test_default_permissions() {
        assert_eq!(
            ContractKind::SchemeRegistrar.default_permissions().bits(),
            0x03
        );
        assert_eq!(
            ContractKind::ContributionReward.default_permissions(),
            Permissions::REGISTERED
        );
    }
}
