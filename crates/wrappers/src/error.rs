// Copyright (C) 2024-2026 The dao-rs contributors.
//
// error.rs file belongs to the dao-rs project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! The caller-facing error taxonomy.
//!
//! Every facade operation fails with exactly one of these variants, so
//! callers can branch on the *class* of failure: inputs rejected before
//! any submission (`MissingParameter`, `InvalidParameter`), failures of
//! the chain interaction (`Transport`, `Reverted`), correlation
//! failures (`EventNotFound`), and orchestration preconditions
//! (`Unauthorized`, `AlreadyConfigured`, `UnknownOrganization`).

use dao_abi::AbiError;
use dao_primitives::Address;
use dao_rpc_client::RpcError;
use thiserror::Error;

/// Result type alias for facade operations.
pub type WrapperResult<T> = Result<T, WrapperError>;

/// Errors raised by the typed contract facades.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WrapperError {
    /// A required parameter was absent. Raised before anything is
    /// submitted to the chain.
    #[error("Missing required parameter '{field}'")]
    MissingParameter {
        /// Dotted path of the absent field.
        field: String,
    },

    /// A parameter was present but violated its constraint. Raised
    /// before anything is submitted to the chain.
    #[error("Invalid parameter '{field}': {constraint}")]
    InvalidParameter {
        /// Dotted path of the offending field.
        field: String,
        /// The violated constraint, in words.
        constraint: String,
    },

    /// No deployed address is registered for the contract.
    #[error("No deployed address registered for {contract}")]
    NotDeployed {
        /// Contract name.
        contract: &'static str,
    },

    /// No deployment bytecode is registered for the contract.
    #[error("No deployment bytecode registered for {contract}")]
    MissingBytecode {
        /// Contract name.
        contract: &'static str,
    },

    /// The deployment manifest could not be parsed.
    #[error("Invalid deployment manifest: {0}")]
    Manifest(String),

    /// The chain interaction failed before or while waiting for
    /// inclusion.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The contract rejected the call during execution.
    #[error("Transaction reverted{}", reason.as_deref().map(|r| format!(": {r}")).unwrap_or_default())]
    Reverted {
        /// Decoded revert reason, when the provider surfaced one.
        reason: Option<String>,
    },

    /// An expected event could not be correlated from a successful
    /// transaction.
    #[error("Event '{event}' not correlated: {reason}")]
    EventNotFound {
        /// Event name that was required.
        event: String,
        /// What exactly was missing.
        reason: String,
    },

    /// The caller is not the account that forged the organization.
    #[error("Account {actual} is not the forger of organization {avatar} (forged by {forger})")]
    Unauthorized {
        /// The organization's avatar address.
        avatar: Address,
        /// The account that forged the organization.
        forger: Address,
        /// The account attempting the operation.
        actual: Address,
    },

    /// The organization already has its initial schemes set; the
    /// operation is one-shot per organization.
    #[error("Organization {avatar} already has its schemes set")]
    AlreadyConfigured {
        /// The organization's avatar address.
        avatar: Address,
    },

    /// The organization was not forged through this creator instance.
    #[error("Organization {avatar} was not forged through this creator")]
    UnknownOrganization {
        /// The avatar address the caller supplied.
        avatar: Address,
    },

    /// Encoding failed below the facade layer. Indicates a facade/ABI
    /// mismatch rather than bad caller input.
    #[error(transparent)]
    Encoding(#[from] AbiError),
}

impl From<RpcError> for WrapperError {
    fn from(err: RpcError) -> Self {
        match err {
            RpcError::Reverted { reason } => WrapperError::Reverted { reason },
            RpcError::EventNotFound { event, reason } => {
                WrapperError::EventNotFound { event, reason }
            }
            RpcError::Abi(inner) => WrapperError::Encoding(inner),
            other => WrapperError::Transport(other.to_string()),
        }
    }
}
