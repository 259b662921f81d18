// Copyright (C) 2024-2026 The dao-rs contributors.
//
// codec.rs file belongs to the dao-rs project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! The parameter codec.
//!
//! Each configurable contract declares a static [`ParamTable`]: its
//! parameter names, kinds, and constraints, in the exact order the
//! contract hashes them. [`ParamTable::encode`] validates a caller's
//! named inputs against the table and produces a [`ParameterSet`]
//! whose hash is the Keccak-256 digest of the canonical word encoding
//! of the ordered values — the same digest the contract derives, so
//! both sides can reference a configuration without re-submitting it.
//!
//! Field order is part of the contract; reordering a table silently
//! changes every hash it produces.

use crate::error::{WrapperError, WrapperResult};
use dao_abi::{parameter_hash, AbiKind, AbiValue, Amount};
use dao_primitives::{Address, Bytes32};
use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

/// A validation constraint on one numeric parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Any non-negative value.
    Free,
    /// Strictly greater than zero.
    Positive,
    /// Between 0 and 100 inclusive.
    Percentage,
    /// Between `min` and `max` inclusive.
    Range {
        /// Inclusive lower bound.
        min: u64,
        /// Inclusive upper bound.
        max: u64,
    },
}

impl Constraint {
    fn check(self, value: &BigUint) -> Result<(), String> {
        match self {
            Constraint::Free => Ok(()),
            Constraint::Positive => {
                if value.is_zero() {
                    Err("must be greater than zero".to_string())
                } else {
                    Ok(())
                }
            }
            Constraint::Percentage => {
                if *value > BigUint::from(100u64) {
                    Err("must be between 0 and 100".to_string())
                } else {
                    Ok(())
                }
            }
            Constraint::Range { min, max } => {
                if *value < BigUint::from(min) || *value > BigUint::from(max) {
                    Err(format!("must be between {min} and {max}"))
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// One declared parameter of a contract's configuration.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    /// Parameter name as the contract documents it.
    pub name: &'static str,
    /// Parameter kind.
    pub kind: AbiKind,
    /// Constraint applied after normalization (numeric kinds only).
    pub constraint: Constraint,
}

impl ParamSpec {
    /// An unsigned integer parameter.
    #[must_use]
    pub const fn uint(name: &'static str, constraint: Constraint) -> Self {
        Self {
            name,
            kind: AbiKind::Uint,
            constraint,
        }
    }

    /// An address parameter.
    #[must_use]
    pub const fn address(name: &'static str) -> Self {
        Self {
            name,
            kind: AbiKind::Address,
            constraint: Constraint::Free,
        }
    }

    /// A 32-byte parameter.
    #[must_use]
    pub const fn bytes32(name: &'static str) -> Self {
        Self {
            name,
            kind: AbiKind::Bytes32,
            constraint: Constraint::Free,
        }
    }
}

/// The ordered parameter declaration of one configurable contract.
#[derive(Debug, Clone, Copy)]
pub struct ParamTable {
    /// Contract name, for error reporting.
    pub contract: &'static str,
    /// Declared parameters, in hashing order.
    pub specs: &'static [ParamSpec],
}

/// One caller-supplied parameter value, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// A flexible numeric input.
    Amount(Amount),
    /// An address.
    Address(Address),
    /// A 32-byte value.
    Bytes32(Bytes32),
    /// A boolean flag.
    Bool(bool),
}

/// Named parameter inputs, in any order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamInput {
    entries: Vec<(String, ParamValue)>,
}

impl ParamInput {
    /// An empty input set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a numeric parameter, replacing any previous value.
    #[must_use]
    pub fn amount(mut self, name: &str, value: impl Into<Amount>) -> Self {
        self.put(name, ParamValue::Amount(value.into()));
        self
    }

    /// Sets an address parameter, replacing any previous value.
    #[must_use]
    pub fn address(mut self, name: &str, value: Address) -> Self {
        self.put(name, ParamValue::Address(value));
        self
    }

    /// Sets a 32-byte parameter, replacing any previous value.
    #[must_use]
    pub fn bytes32(mut self, name: &str, value: Bytes32) -> Self {
        self.put(name, ParamValue::Bytes32(value));
        self
    }

    /// Sets a boolean parameter, replacing any previous value.
    #[must_use]
    pub fn flag(mut self, name: &str, value: bool) -> Self {
        self.put(name, ParamValue::Bool(value));
        self
    }

    /// Looks up a value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    fn put(&mut self, name: &str, value: ParamValue) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }
}

/// A validated, ordered, hashable parameter set.
///
/// Read-only once produced; the hash is computed at construction and
/// never recomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSet {
    contract: &'static str,
    fields: Vec<(&'static str, AbiValue)>,
    hash: Bytes32,
}

impl ParameterSet {
    /// The contract this set configures.
    #[must_use]
    pub fn contract(&self) -> &'static str {
        self.contract
    }

    /// The ordered encoded values.
    #[must_use]
    pub fn values(&self) -> Vec<AbiValue> {
        self.fields.iter().map(|(_, v)| v.clone()).collect()
    }

    /// Looks up an encoded field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&AbiValue> {
        self.fields
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    /// The parameter hash: Keccak-256 of the canonical word encoding of
    /// the ordered values.
    #[must_use]
    pub fn hash(&self) -> Bytes32 {
        self.hash
    }
}

impl ParamTable {
    /// Validates named inputs against this table and produces the
    /// ordered, hashed parameter set.
    ///
    /// Validation is fail-fast in declaration order: the first missing
    /// or invalid field aborts the whole encoding and nothing is
    /// partially produced.
    ///
    /// # Errors
    ///
    /// - [`WrapperError::MissingParameter`] when a declared field is
    ///   absent from the input.
    /// - [`WrapperError::InvalidParameter`] when a field has the wrong
    ///   kind, fails numeric normalization, or violates its constraint,
    ///   and for input fields the table does not declare.
    pub fn encode(&self, input: &ParamInput) -> WrapperResult<ParameterSet> {
        for (name, _) in &input.entries {
            if !self.specs.iter().any(|spec| spec.name == name) {
                return Err(WrapperError::InvalidParameter {
                    field: name.clone(),
                    constraint: format!("not a parameter of {}", self.contract),
                });
            }
        }

        let mut fields = Vec::with_capacity(self.specs.len());
        for spec in self.specs {
            let value = input
                .get(spec.name)
                .ok_or_else(|| WrapperError::MissingParameter {
                    field: spec.name.to_string(),
                })?;
            fields.push((spec.name, convert(spec, value)?));
        }

        let values: Vec<AbiValue> = fields.iter().map(|(_, v)| v.clone()).collect();
        let hash = parameter_hash(&values)?;
        Ok(ParameterSet {
            contract: self.contract,
            fields,
            hash,
        })
    }

    /// Maps an ordered value tuple back to named fields: the inverse of
    /// the ordering [`ParamTable::encode`] applies.
    ///
    /// # Errors
    ///
    /// Returns [`WrapperError::InvalidParameter`] when the tuple's
    /// length or kinds do not match the declaration.
    pub fn decode(
        &self,
        values: &[AbiValue],
    ) -> WrapperResult<Vec<(&'static str, AbiValue)>> {
        if values.len() != self.specs.len() {
            return Err(WrapperError::InvalidParameter {
                field: self.contract.to_string(),
                constraint: format!(
                    "expected {} values, got {}",
                    self.specs.len(),
                    values.len()
                ),
            });
        }
        let mut fields = Vec::with_capacity(values.len());
        for (spec, value) in self.specs.iter().zip(values) {
            if value.kind() != spec.kind {
                return Err(WrapperError::InvalidParameter {
                    field: spec.name.to_string(),
                    constraint: format!("expected {}, got {}", spec.kind, value.kind()),
                });
            }
            fields.push((spec.name, value.clone()));
        }
        Ok(fields)
    }
}

fn convert(spec: &ParamSpec, value: &ParamValue) -> WrapperResult<AbiValue> {
    let mismatch = || WrapperError::InvalidParameter {
        field: spec.name.to_string(),
        constraint: format!("expected a {} value", spec.kind),
    };
    match (spec.kind, value) {
        (AbiKind::Uint, ParamValue::Amount(amount)) => {
            let normalized =
                amount
                    .normalize()
                    .map_err(|err| WrapperError::InvalidParameter {
                        field: spec.name.to_string(),
                        constraint: err.to_string(),
                    })?;
            spec.constraint
                .check(&normalized)
                .map_err(|constraint| WrapperError::InvalidParameter {
                    field: spec.name.to_string(),
                    constraint,
                })?;
            Ok(AbiValue::Uint(normalized))
        }
        (AbiKind::Address, ParamValue::Address(address)) => Ok(AbiValue::Address(*address)),
        (AbiKind::Bytes32, ParamValue::Bytes32(hash)) => Ok(AbiValue::Bytes32(*hash)),
        (AbiKind::Bool, ParamValue::Bool(flag)) => Ok(AbiValue::Bool(*flag)),
        _ => Err(mismatch()),
    }
}

/// Rejects the zero address for a required address field.
///
/// # Errors
///
/// Returns [`WrapperError::InvalidParameter`] for the zero address.
pub(crate) fn require_nonzero(field: &str, address: Address) -> WrapperResult<Address> {
    if address.is_zero() {
        return Err(WrapperError::InvalidParameter {
            field: field.to_string(),
            constraint: "must not be the zero address".to_string(),
        });
    }
    Ok(address)
}

/// Normalizes a numeric option, naming the field in any failure.
///
/// # Errors
///
/// Returns [`WrapperError::InvalidParameter`] for negative, malformed,
/// or overflowing inputs.
pub(crate) fn normalize_field(field: &str, amount: &Amount) -> WrapperResult<BigUint> {
    amount
        .normalize()
        .map_err(|err| WrapperError::InvalidParameter {
            field: field.to_string(),
            constraint: err.to_string(),
        })
}

/// Like [`normalize_field`], additionally rejecting zero.
///
/// # Errors
///
/// Returns [`WrapperError::InvalidParameter`] for zero and for
/// everything [`normalize_field`] rejects.
pub(crate) fn normalize_positive(field: &str, amount: &Amount) -> WrapperResult<BigUint> {
    let value = normalize_field(field, amount)?;
    if value.is_zero() {
        return Err(WrapperError::InvalidParameter {
            field: field.to_string(),
            constraint: "must be greater than zero".to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    static TEST_TABLE: ParamTable = ParamTable {
        contract: "TestScheme",
        specs: &[
            ParamSpec::uint("fee", Constraint::Free),
            ParamSpec::uint("quorumPercentage", Constraint::Percentage),
            ParamSpec::address("votingMachine"),
            ParamSpec::bytes32("voteParams"),
        ],
    };

    fn valid_input() -> ParamInput {
        ParamInput::new()
            .amount("fee", 10u64)
            .amount("quorumPercentage", 50u64)
            .address("votingMachine", Address::from([5u8; 20]))
            .bytes32("voteParams", Bytes32::from([9u8; 32]))
    }

    #[test]
    fn test_encode_orders_fields_by_table() {
        // Build the same logical input in reverse insertion order.
        let reversed = ParamInput::new()
            .bytes32("voteParams", Bytes32::from([9u8; 32]))
            .address("votingMachine", Address::from([5u8; 20]))
            .amount("quorumPercentage", 50u64)
            .amount("fee", 10u64);

        let a = TEST_TABLE.encode(&valid_input()).unwrap();
        let b = TEST_TABLE.encode(&reversed).unwrap();
        assert_eq!(a.hash(), b.hash());
        assert_eq!(a.values(), b.values());
        assert_eq!(a.values()[0], AbiValue::from(10u64));
    }

    #[test]
    fn test_equal_logical_values_hash_identically() {
        let text_form = ParamInput::new()
            .amount("fee", "10")
            .amount("quorumPercentage", "50")
            .address("votingMachine", Address::from([5u8; 20]))
            .bytes32("voteParams", Bytes32::from([9u8; 32]));
        assert_eq!(
            TEST_TABLE.encode(&valid_input()).unwrap().hash(),
            TEST_TABLE.encode(&text_form).unwrap().hash()
        );
    }

    #[test]
    fn test_missing_field_rejected() {
        let input = ParamInput::new().amount("fee", 10u64);
        let err = TEST_TABLE.encode(&input).unwrap_err();
        assert!(
            matches!(err, WrapperError::MissingParameter { field } if field == "quorumPercentage")
        );
    }

    #[test]
    fn test_constraint_violation_rejected() {
        let input = valid_input().amount("quorumPercentage", 101u64);
        let err = TEST_TABLE.encode(&input).unwrap_err();
        assert!(matches!(
            err,
            WrapperError::InvalidParameter { field, .. } if field == "quorumPercentage"
        ));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let input = valid_input().amount("fee", -1i64);
        let err = TEST_TABLE.encode(&input).unwrap_err();
        assert!(matches!(
            err,
            WrapperError::InvalidParameter { field, .. } if field == "fee"
        ));
    }

    #[test]
    fn test_undeclared_field_rejected() {
        let input = valid_input().amount("typoedField", 1u64);
        let err = TEST_TABLE.encode(&input).unwrap_err();
        assert!(matches!(
            err,
            WrapperError::InvalidParameter { field, .. } if field == "typoedField"
        ));
    }

    #[test]
    fn test_kind_mismatch_rejected() {
        let input = valid_input().flag("fee", true);
        let err = TEST_TABLE.encode(&input).unwrap_err();
        assert!(matches!(
            err,
            WrapperError::InvalidParameter { field, .. } if field == "fee"
        ));
    }

    #[test]
    fn test_decode_round_trip() {
        let set = TEST_TABLE.encode(&valid_input()).unwrap();
        let decoded = TEST_TABLE.decode(&set.values()).unwrap();
        assert_eq!(decoded.len(), 4);
        assert_eq!(decoded[0], ("fee", AbiValue::from(10u64)));
        assert_eq!(
            decoded[2],
            ("votingMachine", AbiValue::Address(Address::from([5u8; 20])))
        );
    }

    #[test]
    fn test_decode_rejects_wrong_shape() {
        let set = TEST_TABLE.encode(&valid_input()).unwrap();
        let mut values = set.values();
        values.pop();
        assert!(TEST_TABLE.decode(&values).is_err());
    }

    proptest! {
        #[test]
        fn test_encoding_deterministic(fee in 0u64..u64::MAX, quorum in 0u64..=100) {
            let input = ParamInput::new()
                .amount("fee", fee)
                .amount("quorumPercentage", quorum)
                .address("votingMachine", Address::from([5u8; 20]))
                .bytes32("voteParams", Bytes32::from([9u8; 32]));
            let a = TEST_TABLE.encode(&input).unwrap();
            let b = TEST_TABLE.encode(&input).unwrap();
            prop_assert_eq!(a.hash(), b.hash());
        }
    }
}
