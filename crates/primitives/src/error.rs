// Copyright (C) 2024-2026 The dao-rs contributors.
//
// error.rs file belongs to the dao-rs project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use thiserror::Error;

/// Result type alias for primitive operations.
pub type PrimitiveResult<T> = Result<T, PrimitiveError>;

/// Errors raised while parsing or constructing primitive values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrimitiveError {
    /// Input byte slice had the wrong length for the target type.
    #[error("Invalid length for {kind}: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Name of the type being constructed.
        kind: &'static str,
        /// Expected byte length.
        expected: usize,
        /// Actual byte length.
        actual: usize,
    },

    /// Input string was not valid hexadecimal.
    #[error("Invalid hex string: {0}")]
    InvalidHex(String),

    /// Input string was not a valid bitmask literal.
    #[error("Invalid permissions literal: {0}")]
    InvalidPermissions(String),
}
