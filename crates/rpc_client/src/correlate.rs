// Copyright (C) 2024-2026 The dao-rs contributors.
//
// correlate.rs file belongs to the dao-rs project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! The event correlator.
//!
//! Turns a transaction's emitted logs into one typed value, selected by
//! event name and argument name. When a transaction emits the same
//! event more than once and no index is given, the **last** matching
//! log wins — changing this tie-break silently changes which proposal
//! or agreement id a caller observes, so it is fixed behavior.

use crate::error::{RpcError, RpcResult};
use crate::result::TransactionResult;
use dao_abi::AbiValue;

/// Extracts a named argument of a named event from a transaction's
/// logs.
///
/// With `index = None`, the last log decoding to `event_name` is
/// selected. With `index = Some(i)`, the entry at position `i` among
/// **all** logs (matching or not) is selected, consistent with the
/// chain's log ordering, and must decode to `event_name`.
///
/// # Errors
///
/// Returns [`RpcError::EventNotFound`] when no log matches, the index
/// is out of range or names a different event, or the matched log has
/// no argument of the given name.
pub fn extract(
    result: &TransactionResult,
    event_name: &str,
    arg_name: &str,
    index: Option<usize>,
) -> RpcResult<AbiValue> {
    let entry = match index {
        Some(i) => {
            let entry = result.logs.get(i).ok_or_else(|| RpcError::EventNotFound {
                event: event_name.to_string(),
                reason: format!("log index {i} out of range ({} logs)", result.logs.len()),
            })?;
            if entry.name.as_deref() != Some(event_name) {
                return Err(RpcError::EventNotFound {
                    event: event_name.to_string(),
                    reason: format!(
                        "log at index {i} is '{}'",
                        entry.name.as_deref().unwrap_or("<undecoded>")
                    ),
                });
            }
            entry
        }
        None => result
            .logs
            .iter()
            .rev()
            .find(|entry| entry.name.as_deref() == Some(event_name))
            .ok_or_else(|| RpcError::EventNotFound {
                event: event_name.to_string(),
                reason: "no matching log in transaction".to_string(),
            })?,
    };

    entry
        .arg(arg_name)
        .cloned()
        .ok_or_else(|| RpcError::EventNotFound {
            event: event_name.to_string(),
            reason: format!("matched log has no argument '{arg_name}'"),
        })
}
