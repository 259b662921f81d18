// Copyright (C) 2024-2026 The dao-rs contributors.
//
// address.rs file belongs to the dao-rs project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Implementation of [`Address`], a 20-byte account or contract identifier.

use crate::error::{PrimitiveError, PrimitiveResult};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};
use std::fmt;
use std::str::FromStr;

/// The length of [`Address`] values in bytes.
pub const ADDRESS_SIZE: usize = 20;

/// A 20-byte network address identifying an account or a deployed contract.
///
/// Stored big-endian, parsed from `0x`-prefixed hex and displayed in the
/// mixed-case checksum form so a transposed digit is caught by readers
/// that verify checksums.
#[derive(Clone, Copy, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_SIZE]);

impl Address {
    /// Byte length of an address.
    pub const LENGTH: usize = ADDRESS_SIZE;

    /// Returns the all-zero address.
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
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_SIZE] {
        &self.0
    }

    /// Returns the bytes as a `Vec<u8>`.
    #[inline]
    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    /// Creates an `Address` from a byte slice.
    ///
    /// # Errors
    ///
    /// Returns [`PrimitiveError::InvalidLength`] if the slice is not
    /// exactly 20 bytes.
    pub fn from_slice(value: &[u8]) -> PrimitiveResult<Self> {
        if value.len() != ADDRESS_SIZE {
            return Err(PrimitiveError::InvalidLength {
                kind: "Address",
                expected: ADDRESS_SIZE,
                actual: value.len(),
            });
        }
        let mut bytes = [0u8; ADDRESS_SIZE];
        bytes.copy_from_slice(value);
        Ok(Self(bytes))
    }

    /// Parses an `Address` from a hexadecimal string.
    ///
    /// Accepts an optional `0x`/`0X` prefix and any letter case; the
    /// checksum casing is not enforced on input.
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

        if stripped.len() != ADDRESS_SIZE * 2 {
            return Err(PrimitiveError::InvalidLength {
                kind: "Address",
                expected: ADDRESS_SIZE,
                actual: stripped.len() / 2,
            });
        }

        let bytes =
            hex::decode(stripped).map_err(|_| PrimitiveError::InvalidHex(s.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Lowercase `0x`-prefixed hex form, as sent over JSON-RPC.
    #[must_use]
    pub fn to_hex_string(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Mixed-case checksummed form (EIP-55 style): a hex digit is
    /// uppercased when the corresponding nibble of the Keccak-256 hash
    /// of the lowercase address is >= 8.
    #[must_use]
    pub fn to_checksum_string(&self) -> String {
        let lower = hex::encode(self.0);
        let digest = Keccak256::digest(lower.as_bytes());

        let mut out = String::with_capacity(2 + ADDRESS_SIZE * 2);
        out.push_str("0x");
        for (i, ch) in lower.chars().enumerate() {
            let hash_byte = digest[i / 2];
            let nibble = if i % 2 == 0 {
                hash_byte >> 4
            } else {
                hash_byte & 0x0f
            };
            if ch.is_ascii_alphabetic() && nibble >= 8 {
                out.push(ch.to_ascii_uppercase());
            } else {
                out.push(ch);
            }
        }
        out
    }
}

impl FromStr for Address {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_checksum_string())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex_string())
    }
}

impl From<[u8; ADDRESS_SIZE]> for Address {
    fn from(data: [u8; ADDRESS_SIZE]) -> Self {
        Self(data)
    }
}

impl TryFrom<&[u8]> for Address {
    type Error = PrimitiveError;

    fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
        Self::from_slice(data)
    }
}

impl AsRef<[u8]> for Address {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex_string())
    }
}

impl<'de> Deserialize<'de> for Address {
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
    fn test_address_zero() {
        let addr = Address::zero();
        assert!(addr.is_zero());
        assert_eq!(
            addr.to_hex_string(),
            "0x0000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn test_address_parse() {
        let addr = Address::parse("0x46cf7fa63cf4737cdf5fcb1f4a4fdbbeca5e93a7").unwrap();
        assert_eq!(addr.as_bytes()[0], 0x46);
        assert_eq!(addr.as_bytes()[19], 0xa7);
    }

    #[test]
    fn test_address_parse_rejects_bad_length() {
        let err = Address::parse("0x1234").unwrap_err();
        assert!(matches!(err, PrimitiveError::InvalidLength { .. }));
    }

    #[test]
    fn test_address_parse_rejects_non_hex() {
        let err = Address::parse("0xzzcf7fa63cf4737cdf5fcb1f4a4fdbbeca5e93a7").unwrap_err();
        assert!(matches!(err, PrimitiveError::InvalidHex(_)));
    }

    #[test]
    fn test_checksum_known_vector() {
        // EIP-55 reference vector.
        let addr = Address::parse("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        assert_eq!(
            addr.to_checksum_string(),
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
        );
    }

    #[test]
    fn test_serde_round_trip() {
        let addr = Address::parse("0x46cf7fa63cf4737cdf5fcb1f4a4fdbbeca5e93a7").unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"0x46cf7fa63cf4737cdf5fcb1f4a4fdbbeca5e93a7\"");
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(addr, back);
    }

    proptest! {
        #[test]
        fn test_roundtrip_from_slice(bytes in any::<[u8; ADDRESS_SIZE]>()) {
            let addr = Address::from_slice(&bytes).unwrap();
            prop_assert_eq!(addr.as_bytes(), &bytes);
        }

        #[test]
        fn test_hex_string_round_trip(bytes in any::<[u8; ADDRESS_SIZE]>()) {
            let addr = Address::from(bytes);
            let parsed = Address::parse(&addr.to_hex_string()).unwrap();
            prop_assert_eq!(addr, parsed);
        }

        #[test]
        fn test_checksum_parses_back(bytes in any::<[u8; ADDRESS_SIZE]>()) {
            let addr = Address::from(bytes);
            let parsed = Address::parse(&addr.to_checksum_string()).unwrap();
            prop_assert_eq!(addr, parsed);
        }

        #[test]
        fn test_is_zero_correct(bytes in any::<[u8; ADDRESS_SIZE]>()) {
            let addr = Address::from(bytes);
            prop_assert_eq!(addr.is_zero(), bytes.iter().all(|&b| b == 0));
        }
    }
}
