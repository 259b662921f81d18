// Copyright (C) 2024-2026 The dao-rs contributors.
//
// value.rs file belongs to the dao-rs project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! The semantic value model for contract parameters and event arguments.

use dao_primitives::{Address, Bytes32};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of an ABI value, as it appears in a contract signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbiKind {
    /// 20-byte address.
    Address,
    /// Unsigned 256-bit integer.
    Uint,
    /// 32-byte value.
    Bytes32,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    Str,
    /// Dynamic array of addresses.
    AddressArray,
    /// Dynamic array of unsigned 256-bit integers.
    UintArray,
}

impl AbiKind {
    /// Canonical type name used in function and event signatures.
    #[must_use]
    pub const fn signature_name(self) -> &'static str {
        match self {
            AbiKind::Address => "address",
            AbiKind::Uint => "uint256",
            AbiKind::Bytes32 => "bytes32",
            AbiKind::Bool => "bool",
            AbiKind::Str => "string",
            AbiKind::AddressArray => "address[]",
            AbiKind::UintArray => "uint256[]",
        }
    }

    /// Whether the kind has a dynamic (length-prefixed) calldata encoding.
    #[must_use]
    pub const fn is_dynamic(self) -> bool {
        matches!(self, AbiKind::Str | AbiKind::AddressArray | AbiKind::UintArray)
    }
}

impl fmt::Display for AbiKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.signature_name())
    }
}

/// A decoded semantic value: the common currency between the parameter
/// codec, calldata encoding, and event decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbiValue {
    /// 20-byte address.
    Address(Address),
    /// Unsigned 256-bit integer.
    Uint(BigUint),
    /// 32-byte value.
    Bytes32(Bytes32),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Str(String),
    /// Dynamic array of addresses.
    AddressArray(Vec<Address>),
    /// Dynamic array of unsigned 256-bit integers.
    UintArray(Vec<BigUint>),
}

impl AbiValue {
    /// The kind of this value.
    #[must_use]
    pub const fn kind(&self) -> AbiKind {
        match self {
            AbiValue::Address(_) => AbiKind::Address,
            AbiValue::Uint(_) => AbiKind::Uint,
            AbiValue::Bytes32(_) => AbiKind::Bytes32,
            AbiValue::Bool(_) => AbiKind::Bool,
            AbiValue::Str(_) => AbiKind::Str,
            AbiValue::AddressArray(_) => AbiKind::AddressArray,
            AbiValue::UintArray(_) => AbiKind::UintArray,
        }
    }

    /// Borrows the address if this is an `Address` value.
    #[must_use]
    pub fn as_address(&self) -> Option<Address> {
        match self {
            AbiValue::Address(a) => Some(*a),
            _ => None,
        }
    }

    /// Borrows the integer if this is a `Uint` value.
    #[must_use]
    pub fn as_uint(&self) -> Option<&BigUint> {
        match self {
            AbiValue::Uint(v) => Some(v),
            _ => None,
        }
    }

    /// Borrows the hash if this is a `Bytes32` value.
    #[must_use]
    pub fn as_bytes32(&self) -> Option<Bytes32> {
        match self {
            AbiValue::Bytes32(h) => Some(*h),
            _ => None,
        }
    }

    /// Borrows the flag if this is a `Bool` value.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AbiValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Borrows the text if this is a `Str` value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AbiValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Address> for AbiValue {
    fn from(value: Address) -> Self {
        AbiValue::Address(value)
    }
}

impl From<Bytes32> for AbiValue {
    fn from(value: Bytes32) -> Self {
        AbiValue::Bytes32(value)
    }
}

impl From<BigUint> for AbiValue {
    fn from(value: BigUint) -> Self {
        AbiValue::Uint(value)
    }
}

impl From<bool> for AbiValue {
    fn from(value: bool) -> Self {
        AbiValue::Bool(value)
    }
}

impl From<u64> for AbiValue {
    fn from(value: u64) -> Self {
        AbiValue::Uint(BigUint::from(value))
    }
}

impl From<&str> for AbiValue {
    fn from(value: &str) -> Self {
        AbiValue::Str(value.to_string())
    }
}
