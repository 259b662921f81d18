// Copyright (C) 2024-2026 The dao-rs contributors.
//
// binding.rs file belongs to the dao-rs project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! The binding shared by every typed facade.
//!
//! A [`ContractBinding`] ties one deployed contract instance to a
//! provider: it knows the contract's kind, address, and ABI, and routes
//! invocations through a [`TransactionInvoker`]. Facades hold a binding
//! by composition and add their typed surface on top.

use crate::error::WrapperResult;
use crate::registry::{ContractKind, ContractRegistry};
use dao_abi::{AbiDescriptor, AbiValue};
use dao_primitives::{Address, Bytes32};
use dao_rpc_client::{
    extract, ChainProvider, ClientSettings, EventFilter, EventLogEntry, EventReader,
    Subscription, TransactionInvoker, TransactionResult,
};
use std::sync::Arc;
use tracing::info;

/// Outcome of registering a configuration with a configurable
/// contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetParametersResult {
    /// Hash under which the configuration is addressable.
    pub params_hash: Bytes32,
    /// The underlying transaction result.
    pub tx: TransactionResult,
}

/// One deployed contract instance, bound to a provider.
#[derive(Clone)]
pub struct ContractBinding {
    kind: ContractKind,
    address: Address,
    provider: Arc<dyn ChainProvider>,
    invoker: TransactionInvoker,
    settings: ClientSettings,
}

impl ContractBinding {
    /// Binds to the contract at a known address.
    #[must_use]
    pub fn at(
        kind: ContractKind,
        address: Address,
        provider: Arc<dyn ChainProvider>,
        settings: ClientSettings,
    ) -> Self {
        let invoker = TransactionInvoker::new(provider.clone(), settings.clone());
        Self {
            kind,
            address,
            provider,
            invoker,
            settings,
        }
    }

    /// Binds to the address registered for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::WrapperError::NotDeployed`] when the registry
    /// has no address for the contract.
    pub fn deployed(
        kind: ContractKind,
        registry: &ContractRegistry,
        provider: Arc<dyn ChainProvider>,
        settings: ClientSettings,
    ) -> WrapperResult<Self> {
        let address = registry.address_of(kind)?;
        Ok(Self::at(kind, address, provider, settings))
    }

    /// Deploys a fresh instance from the registry's bytecode and binds
    /// to it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::WrapperError::MissingBytecode`] when the
    /// registry has no bytecode, and chain-interaction failures
    /// unmodified.
    pub async fn deploy(
        kind: ContractKind,
        registry: &ContractRegistry,
        provider: Arc<dyn ChainProvider>,
        settings: ClientSettings,
    ) -> WrapperResult<Self> {
        let bytecode = registry.bytecode_of(kind)?;
        let invoker = TransactionInvoker::new(provider.clone(), settings.clone());
        let (address, _result) = invoker.deploy(kind.abi(), bytecode).await?;
        info!(contract = kind.name(), %address, "deployed fresh instance");
        Ok(Self {
            kind,
            address,
            provider,
            invoker,
            settings,
        })
    }

    /// The contract kind of this binding.
    #[must_use]
    pub fn kind(&self) -> ContractKind {
        self.kind
    }

    /// The bound contract address.
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// The account invocations are sent from.
    ///
    /// # Errors
    ///
    /// Propagates provider failures as
    /// [`crate::WrapperError::Transport`].
    pub async fn caller(&self) -> WrapperResult<Address> {
        Ok(self.provider.default_account().await?)
    }

    /// Invokes `method` on the bound contract and waits for inclusion.
    ///
    /// # Errors
    ///
    /// Chain-interaction failures, classified per
    /// [`crate::WrapperError`].
    pub async fn invoke(
        &self,
        method: &str,
        args: &[AbiValue],
    ) -> WrapperResult<TransactionResult> {
        Ok(self
            .invoker
            .invoke(self.kind.abi(), self.address, method, args)
            .await?)
    }

    /// Executes a read-only call against the bound contract.
    ///
    /// # Errors
    ///
    /// Chain-interaction failures, classified per
    /// [`crate::WrapperError`].
    pub async fn call(&self, method: &str, args: &[AbiValue]) -> WrapperResult<Vec<u8>> {
        Ok(self
            .invoker
            .call(self.kind.abi(), self.address, method, args)
            .await?)
    }

    /// Correlates one typed value out of an invocation's logs.
    ///
    /// # Errors
    ///
    /// Returns [`crate::WrapperError::EventNotFound`] when the event or
    /// argument cannot be correlated.
    pub fn extract(
        &self,
        result: &TransactionResult,
        event: &str,
        arg: &str,
    ) -> WrapperResult<AbiValue> {
        Ok(extract(result, event, arg, None)?)
    }

    /// An event reader over the bound contract.
    #[must_use]
    pub fn events(&self) -> EventReader {
        EventReader::new(
            self.provider.clone(),
            self.address,
            self.kind.abi().clone(),
            self.settings.clone(),
        )
    }

    /// One-shot historical event query.
    ///
    /// # Errors
    ///
    /// Chain-interaction failures, classified per
    /// [`crate::WrapperError`].
    pub async fn query_past(&self, filter: &EventFilter) -> WrapperResult<Vec<EventLogEntry>> {
        Ok(self.events().query_past(filter).await?)
    }

    /// Streams future emissions until the subscription is closed.
    ///
    /// # Errors
    ///
    /// Chain-interaction failures, classified per
    /// [`crate::WrapperError`].
    pub async fn watch(&self, filter: EventFilter) -> WrapperResult<Subscription> {
        Ok(self.events().watch(filter).await?)
    }
}

/// Correlates a 32-byte identifier (proposal or parameter hash) out of
/// an invocation's logs.
pub(crate) fn extract_bytes32(
    result: &TransactionResult,
    event: &str,
    arg: &str,
) -> WrapperResult<Bytes32> {
    let value = extract(result, event, arg, None)?;
    value
        .as_bytes32()
        .ok_or_else(|| crate::WrapperError::EventNotFound {
            event: event.to_string(),
            reason: format!("argument '{arg}' is not a 32-byte value"),
        })
}

/// Correlates an address out of an invocation's logs.
pub(crate) fn extract_address(
    result: &TransactionResult,
    event: &str,
    arg: &str,
) -> WrapperResult<Address> {
    let value = extract(result, event, arg, None)?;
    value
        .as_address()
        .ok_or_else(|| crate::WrapperError::EventNotFound {
            event: event.to_string(),
            reason: format!("argument '{arg}' is not an address"),
        })
}
