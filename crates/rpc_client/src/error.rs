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

use dao_primitives::Bytes32;
use thiserror::Error;

/// Result type alias for chain-provider operations.
pub type RpcResult<T> = Result<T, RpcError>;

/// Errors raised at the chain-collaborator boundary.
///
/// This layer performs no retries; transport failures propagate to the
/// caller unmodified, and retry policy belongs to the caller or the
/// transport itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RpcError {
    /// Network or provider failure before a well-formed RPC response
    /// was obtained.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The RPC endpoint returned an error object.
    #[error("RPC error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code.
        code: i64,
        /// JSON-RPC error message.
        message: String,
    },

    /// The RPC endpoint returned a response this client cannot parse.
    #[error("Invalid RPC response: {0}")]
    InvalidResponse(String),

    /// The contract rejected the call during execution.
    #[error("Transaction reverted{}", reason.as_deref().map(|r| format!(": {r}")).unwrap_or_default())]
    Reverted {
        /// Decoded revert reason, when the provider surfaced one.
        reason: Option<String>,
    },

    /// The transaction was submitted but no receipt appeared within the
    /// configured confirmation window. The transaction itself cannot be
    /// retracted and may still execute.
    #[error("No receipt for transaction {hash} within the confirmation window")]
    ConfirmationTimeout {
        /// Hash of the submitted transaction.
        hash: Bytes32,
    },

    /// An expected event could not be correlated from a successful
    /// transaction. This indicates a facade/ABI mismatch and is a
    /// programming error, not a user error.
    #[error("Event '{event}' not correlated: {reason}")]
    EventNotFound {
        /// Event name that was required.
        event: String,
        /// What exactly was missing.
        reason: String,
    },

    /// Encoding or decoding failed below this layer.
    #[error(transparent)]
    Abi(#[from] dao_abi::AbiError),
}
