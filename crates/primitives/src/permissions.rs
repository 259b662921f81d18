// Copyright (C) 2024-2026 The dao-rs contributors.
//
// permissions.rs file belongs to the dao-rs project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Implementation of [`Permissions`], the controller permissions bitmask
//! granted to a scheme when it is registered against an organization.
//!
//! The mask crosses the contract boundary as a 4-byte value, rendered in
//! hex as `0x0000001f` style literals. All operations are pure; a
//! combinator returns a new mask and never mutates in place.

use crate::error::{PrimitiveError, PrimitiveResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Controller permissions bitmask for a registered scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permissions(u32);

impl Permissions {
    /// Scheme is registered with the controller. Always set for a
    /// registered scheme; the controller ignores a mask without it.
    pub const REGISTERED: Permissions = Permissions(0x01);

    /// Scheme may register and unregister other schemes.
    pub const MANAGE_SCHEMES: Permissions = Permissions(0x02);

    /// Scheme may add and remove global constraints.
    pub const MANAGE_GLOBAL_CONSTRAINTS: Permissions = Permissions(0x04);

    /// Scheme may upgrade the organization's controller.
    pub const UPGRADE_CONTROLLER: Permissions = Permissions(0x08);

    /// Scheme may issue generic calls through the controller.
    pub const GENERIC_CALL: Permissions = Permissions(0x10);

    /// Every permission bit set.
    pub const ALL: Permissions = Permissions(0x1f);

    /// No permission bits set.
    pub const NONE: Permissions = Permissions(0x00);

    /// Checks whether every bit of `flag` is set in this mask.
    #[must_use]
    pub const fn contains(self, flag: Permissions) -> bool {
        self.0 & flag.0 == flag.0
    }

    /// Returns this mask with the bits of `flag` added.
    #[must_use]
    pub const fn with(self, flag: Permissions) -> Self {
        Permissions(self.0 | flag.0)
    }

    /// Returns this mask with the bits of `flag` removed.
    #[must_use]
    pub const fn without(self, flag: Permissions) -> Self {
        Permissions(self.0 & !flag.0)
    }

    /// Raw bitmask value.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Creates a mask from a raw value, rejecting unknown bits.
    ///
    /// # Errors
    ///
    /// Returns [`PrimitiveError::InvalidPermissions`] when bits outside
    /// the defined range are set.
    pub fn from_bits(bits: u32) -> PrimitiveResult<Self> {
        if bits & !Self::ALL.0 != 0 {
            return Err(PrimitiveError::InvalidPermissions(format!(
                "unknown permission bits in {bits:#010x}"
            )));
        }
        Ok(Permissions(bits))
    }

    /// Parses the contract-facing `0x00000000` hex literal form.
    ///
    /// # Errors
    ///
    /// Returns [`PrimitiveError::InvalidPermissions`] for malformed
    /// literals or unknown bits.
    pub fn parse(s: &str) -> PrimitiveResult<Self> {
        let stripped = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| PrimitiveError::InvalidPermissions(s.to_string()))?;
        let bits = u32::from_str_radix(stripped, 16)
            .map_err(|_| PrimitiveError::InvalidPermissions(s.to_string()))?;
        Self::from_bits(bits)
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Self::REGISTERED
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combinators_are_pure() {
        let base = Permissions::REGISTERED;
        let extended = base.with(Permissions::MANAGE_SCHEMES);
        assert_eq!(base, Permissions::REGISTERED);
        assert!(extended.contains(Permissions::REGISTERED));
        assert!(extended.contains(Permissions::MANAGE_SCHEMES));
        assert!(!extended.contains(Permissions::UPGRADE_CONTROLLER));
    }

    #[test]
    fn test_without_removes_only_named_bits() {
        let mask = Permissions::ALL.without(Permissions::GENERIC_CALL);
        assert!(!mask.contains(Permissions::GENERIC_CALL));
        assert!(mask.contains(Permissions::UPGRADE_CONTROLLER));
    }

    #[test]
    fn test_display_matches_contract_literal() {
        assert_eq!(Permissions::ALL.to_string(), "0x0000001f");
        assert_eq!(Permissions::REGISTERED.to_string(), "0x00000001");
    }

    #[test]
    fn test_parse_round_trip() {
        let mask = Permissions::parse("0x00000003").unwrap();
        assert_eq!(
            mask,
            Permissions::REGISTERED.with(Permissions::MANAGE_SCHEMES)
        );
        assert_eq!(Permissions::parse(&mask.to_string()).unwrap(), mask);
    }

    #[test]
    fn test_unknown_bits_rejected() {
        assert!(Permissions::from_bits(0x20).is_err());
        assert!(Permissions::parse("0x00000120").is_err());
    }
}
