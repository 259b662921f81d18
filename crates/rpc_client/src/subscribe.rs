// Copyright (C) 2024-2026 The dao-rs contributors.
//
// subscribe.rs file belongs to the dao-rs project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Event queries and subscriptions.
//!
//! Two cleanly separated capabilities: [`EventReader::query_past`]
//! reads historical emissions once, and [`EventReader::watch`] streams
//! future emissions through a polling task until the returned
//! [`Subscription`] is closed.

use crate::error::{RpcError, RpcResult};
use crate::provider::{ChainProvider, LogQuery};
use crate::result::EventLogEntry;
use crate::settings::ClientSettings;
use dao_abi::{AbiDescriptor, AbiValue};
use dao_primitives::Address;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, warn};

/// A structured event query: event name, block range, and optional
/// per-argument equality matchers.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Event name to match.
    pub event: String,
    /// Inclusive lower block bound; `query_past` reads from genesis
    /// and `watch` starts at the current head when absent.
    pub from_block: Option<u64>,
    /// Inclusive upper block bound (ignored by `watch`).
    pub to_block: Option<u64>,
    /// Argument name → required value.
    pub matchers: Vec<(String, AbiValue)>,
}

impl EventFilter {
    /// A filter matching every emission of `event`.
    #[must_use]
    pub fn new(event: &str) -> Self {
        Self {
            event: event.to_string(),
            ..Self::default()
        }
    }

    /// Restricts to entries whose argument `name` equals `value`.
    #[must_use]
    pub fn with_arg(mut self, name: &str, value: AbiValue) -> Self {
        self.matchers.push((name.to_string(), value));
        self
    }

    /// Sets the inclusive lower block bound.
    #[must_use]
    pub fn from_block(mut self, block: u64) -> Self {
        self.from_block = Some(block);
        self
    }

    /// Sets the inclusive upper block bound.
    #[must_use]
    pub fn to_block(mut self, block: u64) -> Self {
        self.to_block = Some(block);
        self
    }

    fn matches(&self, entry: &EventLogEntry) -> bool {
        self.matchers
            .iter()
            .all(|(name, value)| entry.arg(name) == Some(value))
    }
}

/// Reads and watches one contract's events.
#[derive(Clone)]
pub struct EventReader {
    provider: Arc<dyn ChainProvider>,
    address: Address,
    abi: AbiDescriptor,
    settings: ClientSettings,
}

impl EventReader {
    /// Creates a reader for the contract at `address`.
    #[must_use]
    pub fn new(
        provider: Arc<dyn ChainProvider>,
        address: Address,
        abi: AbiDescriptor,
        settings: ClientSettings,
    ) -> Self {
        Self {
            provider,
            address,
            abi,
            settings,
        }
    }

    /// One-shot historical query: every past emission matching the
    /// filter, in chain order.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::Abi`] for an unknown event name and
    /// provider errors unmodified.
    pub async fn query_past(&self, filter: &EventFilter) -> RpcResult<Vec<EventLogEntry>> {
        let schema = self.abi.event(&filter.event)?;
        let query = LogQuery {
            address: Some(self.address),
            topics: vec![Some(schema.topic())],
            from_block: filter.from_block,
            to_block: filter.to_block,
        };
        let raw_logs = self.provider.logs(query).await?;

        let mut entries = Vec::with_capacity(raw_logs.len());
        for raw in raw_logs {
            match schema.decode(&raw) {
                Ok(args) => {
                    let entry = EventLogEntry {
                        name: Some(schema.name.clone()),
                        args,
                        log_index: raw.log_index,
                        raw,
                    };
                    if filter.matches(&entry) {
                        entries.push(entry);
                    }
                }
                Err(err) => {
                    warn!(event = %schema.name, %err, "skipping undecodable historical log");
                }
            }
        }
        Ok(entries)
    }

    /// Streams future emissions matching the filter until the returned
    /// subscription is closed.
    ///
    /// The stream is fed by a polling task; a poll failure is logged
    /// and the next interval retried by virtue of the loop continuing,
    /// not by re-submitting anything.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::Abi`] for an unknown event name, or a
    /// provider error while reading the starting block height.
    pub async fn watch(&self, filter: EventFilter) -> RpcResult<Subscription> {
        // Resolve the schema eagerly so a bad event name fails here,
        // not inside the task.
        self.abi.event(&filter.event)?;

        let start = match filter.from_block {
            Some(block) => block,
            None => self.provider.block_number().await? + 1,
        };

        let (sender, receiver) = mpsc::unbounded_channel();
        let stopped = Arc::new(AtomicBool::new(false));
        let reader = self.clone();
        let stop_flag = stopped.clone();

        let handle = tokio::spawn(async move {
            let mut next_block = start;
            while !stop_flag.load(Ordering::Relaxed) {
                match reader.poll_once(&filter, next_block).await {
                    Ok((entries, polled_to)) => {
                        next_block = polled_to;
                        for entry in entries {
                            if sender.send(entry).is_err() {
                                return;
                            }
                        }
                    }
                    Err(err) => {
                        warn!(%err, "event poll failed");
                    }
                }
                sleep(reader.settings.poll_interval()).await;
            }
            debug!("event watch stopped");
        });

        Ok(Subscription {
            receiver,
            stopped,
            handle,
        })
    }

    async fn poll_once(
        &self,
        filter: &EventFilter,
        from_block: u64,
    ) -> RpcResult<(Vec<EventLogEntry>, u64)> {
        let head = self.provider.block_number().await?;
        if head < from_block {
            return Ok((Vec::new(), from_block));
        }
        let window = EventFilter {
            event: filter.event.clone(),
            from_block: Some(from_block),
            to_block: Some(head),
            matchers: filter.matchers.clone(),
        };
        let entries = self.query_past(&window).await?;
        Ok((entries, head + 1))
    }
}

/// A live event stream with an explicit close.
///
/// Closing stops the polling task; it does not affect anything
/// on-chain.
pub struct Subscription {
    receiver: mpsc::UnboundedReceiver<EventLogEntry>,
    stopped: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl Subscription {
    /// Receives the next matching event, or `None` once closed and
    /// drained.
    pub async fn recv(&mut self) -> Option<EventLogEntry> {
        self.receiver.recv().await
    }

    /// Attempts to receive without waiting.
    pub fn try_recv(&mut self) -> Option<EventLogEntry> {
        self.receiver.try_recv().ok()
    }

    /// Stops the polling task and closes the stream.
    pub fn close(self) {
        self.stopped.store(true, Ordering::Relaxed);
        self.handle.abort();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.stopped.store(true, Ordering::Relaxed);
        self.handle.abort();
    }
}
