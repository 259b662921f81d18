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

//! # DAO RPC Client
//!
//! The chain-collaborator boundary of the SDK.
//!
//! Everything above this crate works against the [`ChainProvider`]
//! capability trait: submit a transaction, read a receipt, perform a
//! read-only call, query logs, and ask for the current account.
//! [`JsonRpcProvider`] implements it over HTTP JSON-RPC;
//! [`testing::MockProvider`] implements it in memory for deterministic
//! tests.
//!
//! On top of the provider sit the three protocol primitives:
//!
//! - [`TransactionInvoker`]: submit, await one block of inclusion, and
//!   normalize the provider receipt into a stable [`TransactionResult`].
//! - [`extract`]: the event correlator, turning a transaction's log
//!   list into a single typed value by event/argument name.
//! - [`EventReader`]: one-shot historical queries and poll-based watch
//!   subscriptions with an explicit close.

#![warn(missing_docs)]

mod correlate;
mod error;
mod invoker;
mod json_rpc;
mod provider;
mod result;
mod settings;
mod subscribe;
/// Deterministic in-memory provider for tests.
pub mod testing;

pub use correlate::extract;
pub use error::{RpcError, RpcResult};
pub use invoker::TransactionInvoker;
pub use json_rpc::JsonRpcProvider;
pub use provider::{ChainProvider, LogQuery, TransactionReceipt, TransactionRequest};
pub use result::{EventLogEntry, ProposalResult, TransactionResult};
pub use settings::ClientSettings;
pub use subscribe::{EventFilter, EventReader, Subscription};
