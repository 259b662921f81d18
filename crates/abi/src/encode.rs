// Copyright (C) 2024-2026 The dao-rs contributors.
//
// encode.rs file belongs to the dao-rs project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Canonical encoding and hashing.
//!
//! Two encodings live here:
//!
//! - [`encode_packed`]: the canonical word-concatenation used for
//!   parameter hashes. Scalars contribute one 32-byte word; arrays
//!   contribute a length word followed by one word per element, which
//!   keeps the encoding injective. Client and contract must derive the
//!   identical hash from identical logical parameters, so the word
//!   layout here must never change without a matching contract change.
//! - [`encode_call`]: standard calldata encoding — a 4-byte function
//!   selector, a head of one word per parameter (dynamic parameters
//!   hold a byte offset into the tail), and a tail of length-prefixed
//!   array bodies.

use crate::error::{AbiError, AbiResult};
use crate::value::{AbiKind, AbiValue};
use dao_primitives::{Address, Bytes32};
use num_bigint::BigUint;
use sha3::{Digest, Keccak256};

/// Size of one ABI word in bytes.
pub const WORD_SIZE: usize = 32;

/// Keccak-256 digest of arbitrary bytes.
#[must_use]
pub fn keccak256(data: &[u8]) -> Bytes32 {
    let digest = Keccak256::digest(data);
    let mut out = [0u8; WORD_SIZE];
    out.copy_from_slice(&digest);
    Bytes32::from(out)
}

/// Encodes a single-word value into its 32-byte big-endian word.
///
/// # Errors
///
/// Returns [`AbiError::TypeMismatch`] for array values, which have no
/// single-word form.
pub fn encode_word(value: &AbiValue) -> AbiResult<[u8; WORD_SIZE]> {
    let mut word = [0u8; WORD_SIZE];
    match value {
        AbiValue::Address(addr) => {
            word[12..].copy_from_slice(addr.as_bytes());
        }
        AbiValue::Uint(v) => {
            let bytes = v.to_bytes_be();
            word[WORD_SIZE - bytes.len()..].copy_from_slice(&bytes);
        }
        AbiValue::Bytes32(h) => {
            word.copy_from_slice(h.as_bytes());
        }
        AbiValue::Bool(b) => {
            word[WORD_SIZE - 1] = u8::from(*b);
        }
        AbiValue::Str(_) | AbiValue::AddressArray(_) | AbiValue::UintArray(_) => {
            return Err(AbiError::TypeMismatch {
                expected: AbiKind::Uint,
                actual: value.kind(),
            });
        }
    }
    Ok(word)
}

/// Decodes one 32-byte word into a value of the requested kind.
///
/// # Errors
///
/// Returns [`AbiError::TypeMismatch`] for array kinds, which have no
/// single-word form.
pub fn decode_word(kind: AbiKind, word: &[u8; WORD_SIZE]) -> AbiResult<AbiValue> {
    match kind {
        AbiKind::Address => {
            let addr = Address::from_slice(&word[12..]).map_err(|_| AbiError::TypeMismatch {
                expected: AbiKind::Address,
                actual: AbiKind::Bytes32,
            })?;
            Ok(AbiValue::Address(addr))
        }
        AbiKind::Uint => Ok(AbiValue::Uint(BigUint::from_bytes_be(word))),
        AbiKind::Bytes32 => Ok(AbiValue::Bytes32(Bytes32::from(*word))),
        AbiKind::Bool => Ok(AbiValue::Bool(word[WORD_SIZE - 1] != 0)),
        AbiKind::Str | AbiKind::AddressArray | AbiKind::UintArray => Err(AbiError::TypeMismatch {
            expected: AbiKind::Uint,
            actual: kind,
        }),
    }
}

/// Canonical word-concatenation of an ordered value tuple.
///
/// # Errors
///
/// Propagates word-encoding failures.
pub fn encode_packed(values: &[AbiValue]) -> AbiResult<Vec<u8>> {
    let mut out = Vec::with_capacity(values.len() * WORD_SIZE);
    for value in values {
        match value {
            AbiValue::AddressArray(items) => {
                out.extend_from_slice(&encode_word(&AbiValue::from(items.len() as u64))?);
                for item in items {
                    out.extend_from_slice(&encode_word(&AbiValue::Address(*item))?);
                }
            }
            AbiValue::UintArray(items) => {
                out.extend_from_slice(&encode_word(&AbiValue::from(items.len() as u64))?);
                for item in items {
                    out.extend_from_slice(&encode_word(&AbiValue::Uint(item.clone()))?);
                }
            }
            AbiValue::Str(text) => {
                out.extend_from_slice(&encode_word(&AbiValue::from(text.len() as u64))?);
                out.extend_from_slice(&padded_bytes(text.as_bytes()));
            }
            scalar => out.extend_from_slice(&encode_word(scalar)?),
        }
    }
    Ok(out)
}

/// Keccak-256 hash of the canonical encoding of an ordered tuple: the
/// parameter hash both sides use to reference a configuration without
/// re-submitting it.
///
/// # Errors
///
/// Propagates word-encoding failures.
pub fn parameter_hash(values: &[AbiValue]) -> AbiResult<Bytes32> {
    Ok(keccak256(&encode_packed(values)?))
}

/// First four bytes of the Keccak-256 hash of a function signature.
#[must_use]
pub fn selector(signature: &str) -> [u8; 4] {
    let digest = keccak256(signature.as_bytes());
    let mut out = [0u8; 4];
    out.copy_from_slice(&digest.as_bytes()[..4]);
    out
}

/// Standard calldata encoding: selector followed by head/tail encoded
/// arguments.
///
/// # Errors
///
/// Propagates word-encoding failures.
pub fn encode_call(signature: &str, args: &[AbiValue]) -> AbiResult<Vec<u8>> {
    let mut head: Vec<[u8; WORD_SIZE]> = Vec::with_capacity(args.len());
    let mut tail: Vec<u8> = Vec::new();
    let head_len = args.len() * WORD_SIZE;

    for arg in args {
        if arg.kind().is_dynamic() {
            let offset = head_len + tail.len();
            head.push(encode_word(&AbiValue::from(offset as u64))?);
            let body = match arg {
                AbiValue::AddressArray(items) => {
                    let values: Vec<AbiValue> =
                        items.iter().map(|a| AbiValue::Address(*a)).collect();
                    encode_array_body(&values)?
                }
                AbiValue::UintArray(items) => {
                    let values: Vec<AbiValue> =
                        items.iter().map(|v| AbiValue::Uint(v.clone())).collect();
                    encode_array_body(&values)?
                }
                AbiValue::Str(text) => {
                    let mut body = Vec::with_capacity(WORD_SIZE + text.len());
                    body.extend_from_slice(&encode_word(&AbiValue::from(text.len() as u64))?);
                    body.extend_from_slice(&padded_bytes(text.as_bytes()));
                    body
                }
                _ => unreachable!("only string and array kinds are dynamic"),
            };
            tail.extend_from_slice(&body);
        } else {
            head.push(encode_word(arg)?);
        }
    }

    let mut out = Vec::with_capacity(4 + head_len + tail.len());
    out.extend_from_slice(&selector(signature));
    for word in head {
        out.extend_from_slice(&word);
    }
    out.extend_from_slice(&tail);
    Ok(out)
}

fn padded_bytes(data: &[u8]) -> Vec<u8> {
    let padded_len = data.len().div_ceil(WORD_SIZE) * WORD_SIZE;
    let mut out = vec![0u8; padded_len];
    out[..data.len()].copy_from_slice(data);
    out
}

fn encode_array_body(items: &[AbiValue]) -> AbiResult<Vec<u8>> {
    let mut out = Vec::with_capacity((items.len() + 1) * WORD_SIZE);
    out.extend_from_slice(&encode_word(&AbiValue::from(items.len() as u64))?);
    for item in items {
        out.extend_from_slice(&encode_word(item)?);
    }
    Ok(out)
}
