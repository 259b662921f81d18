// Copyright (C) 2024-2026 The dao-rs contributors.
//
// provider.rs file belongs to the dao-rs project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! The [`ChainProvider`] capability trait.
//!
//! This is the complete set of capabilities the SDK consumes from the
//! external chain-interaction collaborator: submit a transaction, read
//! a receipt, perform a read-only call, query logs, and ask for the
//! current account. Connection management, signing, and accounts stay
//! on the provider's side of the boundary.

use crate::error::RpcResult;
use async_trait::async_trait;
use dao_abi::RawLog;
use dao_primitives::{Address, Bytes32};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

/// Parameters of a transaction submission or read-only call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    /// Sender account; the provider's default account when absent.
    pub from: Option<Address>,
    /// Target contract; absent for contract deployment.
    pub to: Option<Address>,
    /// Calldata (or deployment bytecode).
    pub data: Vec<u8>,
    /// Native value transferred, in the smallest unit.
    pub value: Option<BigUint>,
    /// Gas limit override.
    pub gas: Option<u64>,
}

/// A provider-shaped transaction receipt, before normalization into
/// [`crate::TransactionResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    /// Hash of the included transaction.
    pub transaction_hash: Bytes32,
    /// Block in which the transaction was included.
    pub block_number: u64,
    /// Whether execution succeeded.
    pub succeeded: bool,
    /// Address of the created contract, for deployments.
    pub contract_address: Option<Address>,
    /// Raw logs emitted during execution, in emission order.
    pub logs: Vec<RawLog>,
    /// Decoded revert reason, when the provider surfaced one.
    pub revert_reason: Option<String>,
    /// The receipt as the provider delivered it.
    pub raw: serde_json::Value,
}

/// A structured historical log query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogQuery {
    /// Restrict to logs emitted by this contract.
    pub address: Option<Address>,
    /// Positional topic constraints; `None` entries match anything.
    pub topics: Vec<Option<Bytes32>>,
    /// Inclusive lower block bound.
    pub from_block: Option<u64>,
    /// Inclusive upper block bound; latest when absent.
    pub to_block: Option<u64>,
}

/// The capability set consumed from the external chain collaborator.
///
/// All operations are single-flight requests; the provider does not
/// retry on behalf of this SDK, and no ordering is imposed between
/// unrelated calls.
#[async_trait]
pub trait ChainProvider: Send + Sync {
    /// Submits a transaction and returns its hash without waiting for
    /// inclusion.
    async fn send_transaction(&self, request: TransactionRequest) -> RpcResult<Bytes32>;

    /// Reads the receipt of a transaction, or `None` while it is still
    /// pending.
    async fn transaction_receipt(&self, hash: Bytes32) -> RpcResult<Option<TransactionReceipt>>;

    /// Executes a read-only call and returns the raw return data.
    async fn call(&self, request: TransactionRequest) -> RpcResult<Vec<u8>>;

    /// Queries historical logs.
    async fn logs(&self, query: LogQuery) -> RpcResult<Vec<RawLog>>;

    /// The account transactions are sent from when
    /// [`TransactionRequest::from`] is absent.
    async fn default_account(&self) -> RpcResult<Address>;

    /// Current chain height.
    async fn block_number(&self) -> RpcResult<u64>;
}
