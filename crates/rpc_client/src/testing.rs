// Copyright (C) 2024-2026 The dao-rs contributors.
//
// testing.rs file belongs to the dao-rs project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! A deterministic in-memory [`ChainProvider`].
//!
//! Receipts are scripted ahead of each submission and become available
//! immediately, so invoker and orchestrator tests never sleep through
//! real confirmation windows. Every submission is recorded, which
//! makes "no transaction was submitted" assertions possible for the
//! fail-fast validation paths.

use crate::error::{RpcError, RpcResult};
use crate::provider::{ChainProvider, LogQuery, TransactionReceipt, TransactionRequest};
use async_trait::async_trait;
use dao_abi::{keccak256, RawLog};
use dao_primitives::{Address, Bytes32};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone)]
struct ScriptedOutcome {
    succeeded: bool,
    logs: Vec<RawLog>,
    revert_reason: Option<String>,
    contract_address: Option<Address>,
}

impl Default for ScriptedOutcome {
    fn default() -> Self {
        Self {
            succeeded: true,
            logs: Vec::new(),
            revert_reason: None,
            contract_address: None,
        }
    }
}

#[derive(Default)]
struct Inner {
    scripted: VecDeque<ScriptedOutcome>,
    receipts: HashMap<Bytes32, TransactionReceipt>,
    submissions: Vec<TransactionRequest>,
    call_results: VecDeque<Vec<u8>>,
    past_logs: Vec<(u64, RawLog)>,
    block: u64,
    nonce: u64,
    fail_next_send: Option<String>,
}

/// In-memory chain provider for tests.
pub struct MockProvider {
    account: Mutex<Address>,
    inner: Mutex<Inner>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    /// Creates a provider with a fixed default account.
    #[must_use]
    pub fn new() -> Self {
        Self {
            account: Mutex::new(Address::from([0x11u8; 20])),
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Replaces the default account, simulating a different caller
    /// identity.
    pub fn set_default_account(&self, account: Address) {
        *self.account.lock() = account;
    }

    /// Scripts the next submission to succeed with the given logs.
    pub fn enqueue_success(&self, logs: Vec<RawLog>) {
        self.inner.lock().scripted.push_back(ScriptedOutcome {
            logs,
            ..ScriptedOutcome::default()
        });
    }

    /// Scripts the next submission to revert.
    pub fn enqueue_revert(&self, reason: Option<&str>) {
        self.inner.lock().scripted.push_back(ScriptedOutcome {
            succeeded: false,
            revert_reason: reason.map(str::to_string),
            ..ScriptedOutcome::default()
        });
    }

    /// Scripts the next submission as a successful deployment creating
    /// `address`.
    pub fn enqueue_deployment(&self, address: Address) {
        self.inner.lock().scripted.push_back(ScriptedOutcome {
            contract_address: Some(address),
            ..ScriptedOutcome::default()
        });
    }

    /// Makes the next `send_transaction` fail at the transport layer.
    pub fn fail_next_send(&self, message: &str) {
        self.inner.lock().fail_next_send = Some(message.to_string());
    }

    /// Scripts the next read-only call result.
    pub fn push_call_result(&self, data: Vec<u8>) {
        self.inner.lock().call_results.push_back(data);
    }

    /// Records a historical log at the given block.
    pub fn push_log(&self, block: u64, log: RawLog) {
        let mut inner = self.inner.lock();
        inner.block = inner.block.max(block);
        inner.past_logs.push((block, log));
    }

    /// Advances the chain head by one block and returns the new height.
    pub fn advance_block(&self) -> u64 {
        let mut inner = self.inner.lock();
        inner.block += 1;
        inner.block
    }

    /// Every transaction submitted so far, in order.
    #[must_use]
    pub fn submissions(&self) -> Vec<TransactionRequest> {
        self.inner.lock().submissions.clone()
    }
}

#[async_trait]
impl ChainProvider for MockProvider {
    async fn send_transaction(&self, mut request: TransactionRequest) -> RpcResult<Bytes32> {
        let mut inner = self.inner.lock();
        if let Some(message) = inner.fail_next_send.take() {
            return Err(RpcError::Transport(message));
        }
        if request.from.is_none() {
            request.from = Some(*self.account.lock());
        }
        inner.submissions.push(request);

        let outcome = inner.scripted.pop_front().unwrap_or_default();
        inner.nonce += 1;
        inner.block += 1;
        let hash = keccak256(&inner.nonce.to_be_bytes());
        let receipt = TransactionReceipt {
            transaction_hash: hash,
            block_number: inner.block,
            succeeded: outcome.succeeded,
            contract_address: outcome.contract_address,
            logs: outcome.logs,
            revert_reason: outcome.revert_reason,
            raw: serde_json::Value::Null,
        };
        inner.receipts.insert(hash, receipt);
        Ok(hash)
    }

    async fn transaction_receipt(&self, hash: Bytes32) -> RpcResult<Option<TransactionReceipt>> {
        Ok(self.inner.lock().receipts.get(&hash).cloned())
    }

    async fn call(&self, _request: TransactionRequest) -> RpcResult<Vec<u8>> {
        Ok(self.inner.lock().call_results.pop_front().unwrap_or_default())
    }

    async fn logs(&self, query: LogQuery) -> RpcResult<Vec<RawLog>> {
        let inner = self.inner.lock();
        let from = query.from_block.unwrap_or(0);
        let to = query.to_block.unwrap_or(u64::MAX);
        let logs = inner
            .past_logs
            .iter()
            .filter(|(block, _)| *block >= from && *block <= to)
            .filter(|(_, log)| query.address.map_or(true, |a| a == log.address))
            .filter(|(_, log)| {
                query
                    .topics
                    .iter()
                    .zip(&log.topics)
                    .all(|(wanted, actual)| wanted.map_or(true, |t| t == *actual))
            })
            .map(|(_, log)| log.clone())
            .collect();
        Ok(logs)
    }

    async fn default_account(&self) -> RpcResult<Address> {
        Ok(*self.account.lock())
    }

    async fn block_number(&self) -> RpcResult<u64> {
        Ok(self.inner.lock().block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_receipt_is_immediately_available() {
        let provider = MockProvider::new();
        provider.enqueue_revert(Some("nope"));
        let hash = provider
            .send_transaction(TransactionRequest::default())
            .await
            .unwrap();
        let receipt = provider.transaction_receipt(hash).await.unwrap().unwrap();
        assert!(!receipt.succeeded);
        assert_eq!(receipt.revert_reason.as_deref(), Some("nope"));
        assert_eq!(provider.submissions().len(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_is_not_recorded_as_submission() {
        let provider = MockProvider::new();
        provider.fail_next_send("connection refused");
        let err = provider
            .send_transaction(TransactionRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RpcError::Transport(_)));
        assert!(provider.submissions().is_empty());
    }
}
