// Copyright (C) 2024-2026 The dao-rs contributors.
//
// scheme_registrar.rs file belongs to the dao-rs project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Typed facade over the SchemeRegistrar scheme.
//!
//! Proposes adding a scheme to (or removing one from) an already
//! configured organization, subject to a vote. Distinct from the
//! one-shot `set_schemes` of the creator: registrar proposals run at
//! any point in the organization's life.

use crate::binding::{extract_bytes32, ContractBinding, SetParametersResult};
use crate::codec::{require_nonzero, ParamInput, ParamSpec, ParamTable};
use crate::error::WrapperResult;
use crate::registry::{ContractKind, ContractRegistry};
use dao_abi::{AbiDescriptor, AbiKind, AbiValue, EventParam, EventSchema, FunctionSchema};
use dao_primitives::{Address, Bytes32, Permissions};
use dao_rpc_client::{ChainProvider, ClientSettings, ProposalResult};
use num_bigint::BigUint;
use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::info;

/// The ordered parameter table of the scheme.
pub static PARAMS: ParamTable = ParamTable {
    contract: "SchemeRegistrar",
    specs: &[
        ParamSpec::bytes32("voteRegisterParams"),
        ParamSpec::bytes32("voteRemoveParams"),
        ParamSpec::address("votingMachine"),
    ],
};

static ABI: Lazy<AbiDescriptor> = Lazy::new(|| {
    AbiDescriptor::new(
        vec![
            EventSchema::new(
                "NewSchemeProposal",
                vec![
                    EventParam::new("_avatar", AbiKind::Address, true),
                    EventParam::new("_proposalId", AbiKind::Bytes32, true),
                    EventParam::new("_scheme", AbiKind::Address, false),
                    EventParam::new("_parametersHash", AbiKind::Bytes32, false),
                    EventParam::new("_permissions", AbiKind::Uint, false),
                ],
            ),
            EventSchema::new(
                "RemoveSchemeProposal",
                vec![
                    EventParam::new("_avatar", AbiKind::Address, true),
                    EventParam::new("_proposalId", AbiKind::Bytes32, true),
                    EventParam::new("_scheme", AbiKind::Address, false),
                ],
            ),
        ],
        vec![
            FunctionSchema::new(
                "setParameters",
                vec![AbiKind::Bytes32, AbiKind::Bytes32, AbiKind::Address],
            ),
            FunctionSchema::new(
                "proposeScheme",
                vec![
                    AbiKind::Address,
                    AbiKind::Address,
                    AbiKind::Bytes32,
                    AbiKind::Uint,
                ],
            ),
            FunctionSchema::new(
                "proposeToRemoveScheme",
                vec![AbiKind::Address, AbiKind::Address],
            ),
        ],
    )
});

/// The SDK-facing ABI of the scheme.
#[must_use]
pub fn abi() -> &'static AbiDescriptor {
    &ABI
}

/// Configuration of the registrar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemeRegistrarParams {
    /// Voting machine configuration hash for registration proposals.
    pub vote_register_params: Bytes32,
    /// Voting machine configuration hash for removal proposals.
    pub vote_remove_params: Bytes32,
    /// Address of the voting machine.
    pub voting_machine: Address,
}

impl SchemeRegistrarParams {
    /// The named-input form consumed by the parameter codec.
    #[must_use]
    pub fn input(&self) -> ParamInput {
        ParamInput::new()
            .bytes32("voteRegisterParams", self.vote_register_params)
            .bytes32("voteRemoveParams", self.vote_remove_params)
            .address("votingMachine", self.voting_machine)
    }
}

/// Inputs for proposing to register a scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposeToRegisterOptions {
    /// The organization the scheme would join.
    pub avatar: Address,
    /// Deployed address of the scheme.
    pub scheme: Address,
    /// Parameter hash the scheme would run under.
    pub scheme_parameters_hash: Bytes32,
    /// Controller permissions the scheme would be granted.
    pub permissions: Permissions,
}

/// Typed facade over one deployed SchemeRegistrar instance.
#[derive(Clone)]
pub struct SchemeRegistrar {
    binding: ContractBinding,
}

impl SchemeRegistrar {
    /// Binds to the registrar at a known address.
    #[must_use]
    pub fn at(
        address: Address,
        provider: Arc<dyn ChainProvider>,
        settings: ClientSettings,
    ) -> Self {
        Self {
            binding: ContractBinding::at(
                ContractKind::SchemeRegistrar,
                address,
                provider,
                settings,
            ),
        }
    }

    /// Binds to the registered deployment.
    ///
    /// # Errors
    ///
    /// Returns [`crate::WrapperError::NotDeployed`] when no address is
    /// registered.
    pub fn deployed(
        registry: &ContractRegistry,
        provider: Arc<dyn ChainProvider>,
        settings: ClientSettings,
    ) -> WrapperResult<Self> {
        Ok(Self {
            binding: ContractBinding::deployed(
                ContractKind::SchemeRegistrar,
                registry,
                provider,
                settings,
            )?,
        })
    }

    /// Deploys a fresh instance from the registry's bytecode.
    ///
    /// # Errors
    ///
    /// Returns [`crate::WrapperError::MissingBytecode`] or
    /// chain-interaction failures.
    pub async fn deploy(
        registry: &ContractRegistry,
        provider: Arc<dyn ChainProvider>,
        settings: ClientSettings,
    ) -> WrapperResult<Self> {
        Ok(Self {
            binding: ContractBinding::deploy(
                ContractKind::SchemeRegistrar,
                registry,
                provider,
                settings,
            )
            .await?,
        })
    }

    /// The bound contract address.
    #[must_use]
    pub fn address(&self) -> Address {
        self.binding.address()
    }

    /// The underlying binding, for event queries and subscriptions.
    #[must_use]
    pub fn binding(&self) -> &ContractBinding {
        &self.binding
    }

    /// Registers a configuration and returns its parameter hash.
    ///
    /// # Errors
    ///
    /// Parameter validation failures before submission,
    /// chain-interaction failures after.
    pub async fn set_parameters(
        &self,
        params: &SchemeRegistrarParams,
    ) -> WrapperResult<SetParametersResult> {
        require_nonzero("votingMachine", params.voting_machine)?;
        let set = PARAMS.encode(&params.input())?;
        let tx = self.binding.invoke("setParameters", &set.values()).await?;
        info!(params_hash = %set.hash(), "scheme registrar configured");
        Ok(SetParametersResult {
            params_hash: set.hash(),
            tx,
        })
    }

    /// Proposes registering a scheme, correlating the proposal id from
    /// `NewSchemeProposal`.
    ///
    /// # Errors
    ///
    /// Zero-address validation failures before submission,
    /// chain-interaction and correlation failures after.
    pub async fn propose_to_register(
        &self,
        options: &ProposeToRegisterOptions,
    ) -> WrapperResult<ProposalResult> {
        let avatar = require_nonzero("avatar", options.avatar)?;
        let scheme = require_nonzero("scheme", options.scheme)?;
        let tx = self
            .binding
            .invoke(
                "proposeScheme",
                &[
                    AbiValue::Address(avatar),
                    AbiValue::Address(scheme),
                    AbiValue::Bytes32(options.scheme_parameters_hash),
                    AbiValue::Uint(BigUint::from(options.permissions.bits())),
                ],
            )
            .await?;
        let proposal_id = extract_bytes32(&tx, "NewSchemeProposal", "_proposalId")?;
        info!(%proposal_id, %scheme, "scheme registration proposed");
        Ok(ProposalResult { proposal_id, tx })
    }

    /// Proposes removing a scheme, correlating the proposal id from
    /// `RemoveSchemeProposal`.
    ///
    /// # Errors
    ///
    /// Zero-address validation failures before submission,
    /// chain-interaction and correlation failures after.
    pub async fn propose_to_remove(
        &self,
        avatar: Address,
        scheme: Address,
    ) -> WrapperResult<ProposalResult> {
        let avatar = require_nonzero("avatar", avatar)?;
        let scheme = require_nonzero("scheme", scheme)?;
        let tx = self
            .binding
            .invoke(
                "proposeToRemoveScheme",
                &[AbiValue::Address(avatar), AbiValue::Address(scheme)],
            )
            .await?;
        let proposal_id = extract_bytes32(&tx, "RemoveSchemeProposal", "_proposalId")?;
        info!(%proposal_id, %scheme, "scheme removal proposed");
        Ok(ProposalResult { proposal_id, tx })
    }
}
