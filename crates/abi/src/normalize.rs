// Copyright (C) 2024-2026 The dao-rs contributors.
//
// normalize.rs file belongs to the dao-rs project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Normalization of flexible numeric inputs.
//!
//! Token amounts and durations reach the SDK as plain integers, decimal
//! strings, or big integers. [`Amount::normalize`] folds all of them
//! into one canonical `BigUint` so that `"42"` and `42` encode to the
//! same bytes. Amounts are always denominated in the token's smallest
//! indivisible unit; no decimal scaling happens here.

use crate::error::{AbiError, AbiResult};
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::Zero;
use serde::{Deserialize, Serialize};

/// Number of bits a value may occupy after normalization.
const WORD_BITS: u64 = 256;

/// A numeric input in any of the accepted arrival shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    /// Signed machine integer (negative values are rejected on
    /// normalization, not at construction).
    Int(i64),
    /// Decimal string, optionally signed.
    Text(String),
    /// Arbitrary-precision signed integer.
    Big(BigInt),
}

impl Amount {
    /// Zero.
    #[must_use]
    pub fn zero() -> Self {
        Amount::Int(0)
    }

    /// Folds the input into the canonical non-negative representation.
    ///
    /// # Errors
    ///
    /// - [`AbiError::NegativeAmount`] for values below zero.
    /// - [`AbiError::InvalidDecimal`] for unparseable strings.
    /// - [`AbiError::Overflow`] for values of 2^256 or more.
    pub fn normalize(&self) -> AbiResult<BigUint> {
        let signed = match self {
            Amount::Int(v) => BigInt::from(*v),
            Amount::Big(v) => v.clone(),
            Amount::Text(s) => {
                let trimmed = s.trim();
                trimmed
                    .parse::<BigInt>()
                    .map_err(|_| AbiError::InvalidDecimal {
                        value: s.clone(),
                    })?
            }
        };

        if signed.sign() == Sign::Minus {
            return Err(AbiError::NegativeAmount {
                value: signed.to_string(),
            });
        }

        let unsigned = signed.to_biguint().unwrap_or_else(BigUint::zero);
        if unsigned.bits() > WORD_BITS {
            return Err(AbiError::Overflow {
                value: unsigned.to_string(),
            });
        }
        Ok(unsigned)
    }

    /// Whether normalization would produce exactly zero.
    ///
    /// # Errors
    ///
    /// Propagates the same errors as [`Amount::normalize`].
    pub fn is_zero(&self) -> AbiResult<bool> {
        Ok(self.normalize()?.is_zero())
    }
}

impl Default for Amount {
    fn default() -> Self {
        Amount::zero()
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Amount::Int(value)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Amount::Big(BigInt::from(value))
    }
}

impl From<u32> for Amount {
    fn from(value: u32) -> Self {
        Amount::Int(i64::from(value))
    }
}

impl From<&str> for Amount {
    fn from(value: &str) -> Self {
        Amount::Text(value.to_string())
    }
}

impl From<String> for Amount {
    fn from(value: String) -> Self {
        Amount::Text(value)
    }
}

impl From<BigInt> for Amount {
    fn from(value: BigInt) -> Self {
        Amount::Big(value)
    }
}

impl From<BigUint> for Amount {
    fn from(value: BigUint) -> Self {
        Amount::Big(BigInt::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_equal_values_normalize_identically() {
        let a = Amount::from(1_000_000u64).normalize().unwrap();
        let b = Amount::from("1000000").normalize().unwrap();
        let c = Amount::from(BigInt::from(1_000_000)).normalize().unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_whitespace_tolerated() {
        let v = Amount::from(" 42 ").normalize().unwrap();
        assert_eq!(v, BigUint::from(42u64));
    }

    #[test]
    fn test_negative_rejected() {
        assert!(matches!(
            Amount::from(-5i64).normalize(),
            Err(AbiError::NegativeAmount { .. })
        ));
        assert!(matches!(
            Amount::from("-5").normalize(),
            Err(AbiError::NegativeAmount { .. })
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            Amount::from("12abc").normalize(),
            Err(AbiError::InvalidDecimal { .. })
        ));
        assert!(matches!(
            Amount::from("").normalize(),
            Err(AbiError::InvalidDecimal { .. })
        ));
    }

    #[test]
    fn test_overflow_rejected() {
        let too_big = BigInt::from(1u8) << 256;
        assert!(matches!(
            Amount::from(too_big).normalize(),
            Err(AbiError::Overflow { .. })
        ));
        let max = (BigInt::from(1u8) << 256) - 1;
        assert!(Amount::from(max).normalize().is_ok());
    }

    proptest! {
        #[test]
        fn test_string_and_int_agree(v in 0i64..i64::MAX) {
            let from_int = Amount::from(v).normalize().unwrap();
            let from_str = Amount::from(v.to_string()).normalize().unwrap();
            prop_assert_eq!(from_int, from_str);
        }

        #[test]
        fn test_negative_always_fails(v in i64::MIN..0i64) {
            prop_assert!(Amount::from(v).normalize().is_err());
        }
    }
}
