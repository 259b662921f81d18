// Copyright (C) 2024-2026 The dao-rs contributors.
//
// settings.rs file belongs to the dao-rs project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Client configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the chain-provider boundary.
///
/// One block of inclusion is sufficient confirmation for this SDK; the
/// settings only bound how long the invoker polls for that first
/// receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Milliseconds between receipt polls.
    pub poll_interval_ms: u64,
    /// Milliseconds to wait for a receipt before giving up. Giving up
    /// abandons the wait only; the submitted transaction is not
    /// retracted.
    pub confirmation_timeout_ms: u64,
    /// Expected chain id, when the caller wants submissions pinned to
    /// one network.
    pub chain_id: Option<u64>,
}

impl ClientSettings {
    /// Receipt poll interval.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Receipt confirmation window.
    #[must_use]
    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_millis(self.confirmation_timeout_ms)
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1_000,
            confirmation_timeout_ms: 120_000,
            chain_id: None,
        }
    }
}
