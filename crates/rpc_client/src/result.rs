// Copyright (C) 2024-2026 The dao-rs contributors.
//
// result.rs file belongs to the dao-rs project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! The normalized transaction result envelope.
//!
//! Whatever shape the provider's receipt takes, the SDK hands callers a
//! [`TransactionResult`]: the transaction hash, the ordered list of
//! decoded log entries, and the raw receipt for anything the typed
//! surface does not cover. Produced once per submitted transaction and
//! read-only afterward.

use dao_abi::{AbiDescriptor, AbiValue, EventArg, RawLog};
use dao_primitives::Bytes32;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::provider::TransactionReceipt;

/// One decoded log entry.
///
/// Logs whose signature topic matches no event in the decoding ABI keep
/// `name = None` but stay in the list, so positional selection remains
/// consistent with the chain's log ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLogEntry {
    /// Decoded event name, when the log matched the ABI.
    pub name: Option<String>,
    /// Decoded named arguments, empty for unmatched logs.
    pub args: Vec<EventArg>,
    /// Position of this log within the transaction's log list.
    pub log_index: u64,
    /// The log as the provider delivered it.
    pub raw: RawLog,
}

impl EventLogEntry {
    /// Looks up a decoded argument by name.
    #[must_use]
    pub fn arg(&self, name: &str) -> Option<&AbiValue> {
        self.args.iter().find(|a| a.name == name).map(|a| &a.value)
    }
}

/// A completed transaction, normalized from the provider receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResult {
    /// Transaction hash.
    pub hash: Bytes32,
    /// Ordered decoded log entries.
    pub logs: Vec<EventLogEntry>,
    /// The receipt as the provider delivered it.
    pub raw_receipt: serde_json::Value,
}

impl TransactionResult {
    /// Normalizes a successful receipt, decoding each log against the
    /// given ABI. Logs from foreign contracts (or unknown events) are
    /// kept undecoded.
    #[must_use]
    pub fn from_receipt(receipt: &TransactionReceipt, abi: &AbiDescriptor) -> Self {
        let logs = receipt
            .logs
            .iter()
            .map(|raw| decode_entry(raw, abi))
            .collect();
        Self {
            hash: receipt.transaction_hash,
            logs,
            raw_receipt: receipt.raw.clone(),
        }
    }
}

fn decode_entry(raw: &RawLog, abi: &AbiDescriptor) -> EventLogEntry {
    let schema = raw.topics.first().and_then(|t| abi.event_by_topic(t));
    match schema {
        Some(schema) => match schema.decode(raw) {
            Ok(args) => EventLogEntry {
                name: Some(schema.name.clone()),
                args,
                log_index: raw.log_index,
                raw: raw.clone(),
            },
            Err(err) => {
                warn!(event = %schema.name, %err, "log matched event topic but failed to decode");
                EventLogEntry {
                    name: None,
                    args: Vec::new(),
                    log_index: raw.log_index,
                    raw: raw.clone(),
                }
            }
        },
        None => EventLogEntry {
            name: None,
            args: Vec::new(),
            log_index: raw.log_index,
            raw: raw.clone(),
        },
    }
}

/// A transaction documented to create a proposal, with the proposal id
/// correlated from its logs. The id is always present; a missing event
/// fails the call instead of producing an empty id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalResult {
    /// The 32-byte proposal (or agreement) identifier.
    pub proposal_id: Bytes32,
    /// The underlying transaction result.
    pub tx: TransactionResult,
}

#[cfg(test)]
mod tests {
    use super::*;
    use dao_abi::{AbiKind, EventParam, EventSchema};
    use dao_primitives::Address;

    fn stake_abi() -> AbiDescriptor {
        AbiDescriptor::new(
            vec![EventSchema::new(
                "Stake",
                vec![
                    EventParam::new("_voter", AbiKind::Address, true),
                    EventParam::new("_amount", AbiKind::Uint, false),
                ],
            )],
            vec![],
        )
    }

    #[test]
    fn test_from_receipt_decodes_known_and_keeps_unknown() {
        let abi = stake_abi();
        let schema = abi.event("Stake").unwrap();
        let voter = Address::parse("0x46cf7fa63cf4737cdf5fcb1f4a4fdbbeca5e93a7").unwrap();
        let known = schema
            .encode(
                Address::zero(),
                0,
                &[AbiValue::Address(voter), AbiValue::from(10u64)],
            )
            .unwrap();
        let foreign = RawLog {
            address: Address::zero(),
            topics: vec![dao_abi::keccak256(b"Foreign()")],
            data: vec![],
            log_index: 1,
        };

        let receipt = TransactionReceipt {
            transaction_hash: Bytes32::zero(),
            block_number: 1,
            succeeded: true,
            contract_address: None,
            logs: vec![known, foreign],
            revert_reason: None,
            raw: serde_json::Value::Null,
        };

        let result = TransactionResult::from_receipt(&receipt, &abi);
        assert_eq!(result.logs.len(), 2);
        assert_eq!(result.logs[0].name.as_deref(), Some("Stake"));
        assert_eq!(
            result.logs[0].arg("_amount"),
            Some(&AbiValue::from(10u64))
        );
        assert_eq!(result.logs[1].name, None);
        assert_eq!(result.logs[1].log_index, 1);
    }
}
