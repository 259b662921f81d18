// Copyright (C) 2024-2026 The dao-rs contributors.
//
// bytes32.rs file belongs to the dao-rs project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Implementation of [`Bytes32`], a 32-byte hash value.
//!
//! Transaction hashes, proposal identifiers, agreement identifiers, and
//! parameter hashes are all `Bytes32` values.

use crate::error::{PrimitiveError, PrimitiveResult};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The length of [`Bytes32`] values in bytes.
pub const BYTES32_SIZE: usize = 32;

/// A 32-byte hash value, stored big-endian.
#[derive(Clone, Copy, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Bytes32([u8; BYTES32_SIZE]);

impl Bytes32 {
    /// Byte length of the value.
    pub const LENGTH: usize = BYTES32_SIZE;

    /// Returns the all-zero value.
    #[inline]
    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }

    /// Checks whether every byte is zero.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    /// Returns the underlying bytes.
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; BYTES32_SIZE] {
        &self.0
    }

    /// Returns the bytes as a `Vec<u8>`.
    #[inline]
    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    /// Creates a `Bytes32` from a byte slice.
    ///
    /// # Errors
    ///
    /// Returns [`PrimitiveError::InvalidLength`] if the slice is not
    /// exactly 32 bytes.
    pub fn from_slice(value: &[u8]) -> PrimitiveResult<Self> {
        if value.len() != BYTES32_SIZE {
            return Err(PrimitiveError::InvalidLength {
                kind: "Bytes32",
                expected: BYTES32_SIZE,
                actual: value.len(),
            });
        }
        let mut bytes = [0u8; BYTES32_SIZE];
        bytes.copy_from_slice(value);
        Ok(Self(bytes))
    }

    /// Parses a `Bytes32` from a hexadecimal string with an optional
    /// `0x`/`0X` prefix.
    ///
    /// # Errors
    ///
    /// Returns [`PrimitiveError::InvalidHex`] for malformed input and
    /// [`PrimitiveError::InvalidLength`] for wrong-length input.
    pub fn parse(s: &str) -> PrimitiveResult<Self> {
        let stripped = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);

        if stripped.len() != BYTES32_SIZE * 2 {
            return Err(PrimitiveError::InvalidLength {
                kind: "Bytes32",
                expected: BYTES32_SIZE,
                actual: stripped.len() / 2,
            });
        }

        let bytes =
            hex::decode(stripped).map_err(|_| PrimitiveError::InvalidHex(s.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Lowercase `0x`-prefixed hex form.
    #[must_use]
    pub fn to_hex_string(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl FromStr for Bytes32 {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Bytes32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex_string())
    }
}

impl fmt::Debug for Bytes32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bytes32({})", self.to_hex_string())
    }
}

impl From<[u8; BYTES32_SIZE]> for Bytes32 {
    fn from(data: [u8; BYTES32_SIZE]) -> Self {
        Self(data)
    }
}

impl TryFrom<&[u8]> for Bytes32 {
    type Error = PrimitiveError;

    fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
        Self::from_slice(data)
    }
}

impl AsRef<[u8]> for Bytes32 {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Bytes32 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex_string())
    }
}

impl<'de> Deserialize<'de> for Bytes32 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_bytes32_zero() {
        assert!(Bytes32::zero().is_zero());
    }

    #[test]
    fn test_bytes32_parse_round_trip() {
        let hex = "0xab00000000000000000000000000000000000000000000000000000000000012";
        let value = Bytes32::parse(hex).unwrap();
        assert_eq!(value.to_hex_string(), hex);
        assert_eq!(value.as_bytes()[0], 0xab);
        assert_eq!(value.as_bytes()[31], 0x12);
    }

    #[test]
    fn test_bytes32_parse_rejects_bad_length() {
        let err = Bytes32::parse("0xabcd").unwrap_err();
        assert!(matches!(err, PrimitiveError::InvalidLength { .. }));
    }

    proptest! {
        #[test]
        fn test_roundtrip_from_slice(bytes in any::<[u8; BYTES32_SIZE]>()) {
            let value = Bytes32::from_slice(&bytes).unwrap();
            prop_assert_eq!(value.as_bytes(), &bytes);
        }

        #[test]
        fn test_hex_string_round_trip(bytes in any::<[u8; BYTES32_SIZE]>()) {
            let value = Bytes32::from(bytes);
            let parsed = Bytes32::parse(&value.to_hex_string()).unwrap();
            prop_assert_eq!(value, parsed);
        }

        #[test]
        fn test_ordering_matches_bytes(
            a in any::<[u8; BYTES32_SIZE]>(),
            b in any::<[u8; BYTES32_SIZE]>()
        ) {
            let va = Bytes32::from(a);
            let vb = Bytes32::from(b);
            prop_assert_eq!(va.cmp(&vb), a.cmp(&b));
        }
    }
}
