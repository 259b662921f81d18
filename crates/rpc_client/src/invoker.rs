// Copyright (C) 2024-2026 The dao-rs contributors.
//
// invoker.rs file belongs to the dao-rs project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! The transaction invoker.
//!
//! Submits a contract call through the [`ChainProvider`], waits for one
//! block of inclusion, and normalizes the receipt into a
//! [`TransactionResult`]. Waiting is the sole suspension point of the
//! SDK; once a transaction is submitted it cannot be retracted, and a
//! timeout only abandons the wait.

use crate::error::{RpcError, RpcResult};
use crate::provider::{ChainProvider, TransactionRequest};
use crate::result::TransactionResult;
use crate::settings::ClientSettings;
use dao_abi::{AbiDescriptor, AbiValue};
use dao_primitives::{Address, Bytes32};
use std::sync::Arc;
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

/// Submits contract calls and normalizes their receipts.
#[derive(Clone)]
pub struct TransactionInvoker {
    provider: Arc<dyn ChainProvider>,
    settings: ClientSettings,
}

impl TransactionInvoker {
    /// Creates an invoker over a shared provider.
    #[must_use]
    pub fn new(provider: Arc<dyn ChainProvider>, settings: ClientSettings) -> Self {
        Self { provider, settings }
    }

    /// The provider this invoker submits through.
    #[must_use]
    pub fn provider(&self) -> &Arc<dyn ChainProvider> {
        &self.provider
    }

    /// Invokes `method` on the contract at `to` and waits for inclusion.
    ///
    /// # Errors
    ///
    /// - [`RpcError::Abi`] if the arguments do not fit the ABI.
    /// - [`RpcError::Reverted`] if execution failed on-chain.
    /// - [`RpcError::ConfirmationTimeout`] if no receipt appeared in
    ///   the configured window.
    /// - [`RpcError::Transport`] / [`RpcError::Rpc`] from the provider.
    pub async fn invoke(
        &self,
        abi: &AbiDescriptor,
        to: Address,
        method: &str,
        args: &[AbiValue],
    ) -> RpcResult<TransactionResult> {
        let data = abi.function(method)?.encode_call(args)?;
        let request = TransactionRequest {
            from: None,
            to: Some(to),
            data,
            value: None,
            gas: None,
        };
        self.submit_and_confirm(abi, request, method).await
    }

    /// Submits a contract deployment and returns the created address
    /// together with the normalized result.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`TransactionInvoker::invoke`]; a receipt
    /// without a contract address is surfaced as an invalid response.
    pub async fn deploy(
        &self,
        abi: &AbiDescriptor,
        bytecode: Vec<u8>,
    ) -> RpcResult<(Address, TransactionResult)> {
        let request = TransactionRequest {
            from: None,
            to: None,
            data: bytecode,
            value: None,
            gas: None,
        };
        let hash = self.provider.send_transaction(request).await?;
        let receipt = self.await_receipt(hash).await?;
        if !receipt.succeeded {
            return Err(RpcError::Reverted {
                reason: receipt.revert_reason,
            });
        }
        let address = receipt.contract_address.ok_or_else(|| {
            RpcError::InvalidResponse("deployment receipt without contract address".to_string())
        })?;
        info!(%address, hash = %receipt.transaction_hash, "contract deployed");
        Ok((address, TransactionResult::from_receipt(&receipt, abi)))
    }

    /// Executes a read-only call and returns the raw return data.
    ///
    /// # Errors
    ///
    /// - [`RpcError::Abi`] if the arguments do not fit the ABI.
    /// - [`RpcError::Reverted`] / provider errors as for `invoke`.
    pub async fn call(
        &self,
        abi: &AbiDescriptor,
        to: Address,
        method: &str,
        args: &[AbiValue],
    ) -> RpcResult<Vec<u8>> {
        let data = abi.function(method)?.encode_call(args)?;
        let request = TransactionRequest {
            from: None,
            to: Some(to),
            data,
            value: None,
            gas: None,
        };
        self.provider.call(request).await
    }

    async fn submit_and_confirm(
        &self,
        abi: &AbiDescriptor,
        request: TransactionRequest,
        method: &str,
    ) -> RpcResult<TransactionResult> {
        let hash = self.provider.send_transaction(request).await?;
        debug!(method, %hash, "transaction submitted");

        let receipt = self.await_receipt(hash).await?;
        if !receipt.succeeded {
            return Err(RpcError::Reverted {
                reason: receipt.revert_reason,
            });
        }
        info!(method, %hash, block = receipt.block_number, "transaction confirmed");
        Ok(TransactionResult::from_receipt(&receipt, abi))
    }

    async fn await_receipt(
        &self,
        hash: Bytes32,
    ) -> RpcResult<crate::provider::TransactionReceipt> {
        let deadline = Instant::now() + self.settings.confirmation_timeout();
        loop {
            if let Some(receipt) = self.provider.transaction_receipt(hash).await? {
                return Ok(receipt);
            }
            if Instant::now() >= deadline {
                return Err(RpcError::ConfirmationTimeout { hash });
            }
            debug!(%hash, "receipt pending");
            sleep(self.settings.poll_interval()).await;
        }
    }
}
