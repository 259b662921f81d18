// Copyright (C) 2024-2026 The dao-rs contributors.
//
// lib.rs file belongs to the dao-rs project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! # DAO Wrappers
//!
//! Typed facades over the deployed DAO governance contracts. Each
//! facade owns a [`ContractBinding`] to one deployed instance and turns
//! named, validated inputs into contract invocations:
//!
//! - [`DaoCreator`]: the organization orchestrator — `forge_org` and
//!   the one-shot `set_schemes`.
//! - [`GenesisProtocol`]: the binary voting machine — configure,
//!   propose, vote, stake, redeem.
//! - [`ContributionReward`], [`SchemeRegistrar`], [`VestingScheme`]:
//!   the governed schemes.
//!
//! All input validation happens before anything is submitted; an
//! operation that rejects its inputs has sent nothing to the chain.
//! Configuration hashes are computed locally through the parameter
//! codec ([`codec`]) and match the values the contracts derive.

#![warn(missing_docs)]

/// The binding shared by every facade.
pub mod binding;
/// The parameter codec: tables, validation, canonical hashing.
pub mod codec;
/// The contribution reward scheme facade.
pub mod contribution_reward;
/// The organization orchestrator facade.
pub mod dao_creator;
/// Error types.
pub mod error;
/// The voting machine facade.
pub mod genesis_protocol;
/// The contract registry.
pub mod registry;
/// The scheme registrar facade.
pub mod scheme_registrar;
/// The token vesting scheme facade.
pub mod vesting;

pub use binding::{ContractBinding, SetParametersResult};
pub use codec::{Constraint, ParamInput, ParamSpec, ParamTable, ParamValue, ParameterSet};
pub use contribution_reward::{
    ContributionReward, ContributionRewardParams, ProposeRewardOptions, RedeemRewardOptions,
};
pub use dao_creator::{
    DaoCreator, ForgeOrgOptions, ForgedOrg, FounderSpec, SchemeRegistration, SchemesSet,
};
pub use error::{WrapperError, WrapperResult};
pub use genesis_protocol::{
    GenesisProtocol, GenesisProtocolParams, ProposeOptions, RedeemOptions, StakeOptions,
    VoteOptions, VOTE_NO, VOTE_YES,
};
pub use registry::{ContractKind, ContractRegistry, Deployment};
pub use scheme_registrar::{ProposeToRegisterOptions, SchemeRegistrar, SchemeRegistrarParams};
pub use vesting::{CreateVestingOptions, VestedAgreement, VestingParams, VestingScheme};
