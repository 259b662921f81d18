// Copyright (C) 2024-2026 The dao-rs contributors.
//
// lib.rs file belongs to the dao-rs project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! # DAO ABI
//!
//! The encoding substrate shared by the parameter codec and the event
//! correlator:
//!
//! - [`AbiValue`] / [`AbiKind`]: the semantic value model (addresses,
//!   unsigned 256-bit integers, 32-byte hashes, booleans, and
//!   homogeneous arrays of these).
//! - [`Amount`]: flexible numeric input — plain integers, decimal
//!   strings, or big integers — normalized to one canonical
//!   representation so equal logical values encode byte-identically.
//! - [`encode`]: canonical 32-byte-word encoding, standard calldata
//!   encoding, and Keccak-256 hashing (function selectors, event
//!   signature topics, parameter hashes).
//! - [`events`] / [`descriptor`]: event and function schemas, and
//!   decoding of raw emitted logs into named typed arguments.

#![warn(missing_docs)]

/// Contract ABI descriptors (event and function schemas).
pub mod descriptor;
/// Canonical word encoding, calldata encoding, and Keccak hashing.
pub mod encode;
/// Error types.
pub mod error;
/// Event schemas and raw-log decoding.
pub mod events;
/// Numeric input normalization.
pub mod normalize;
/// The semantic value model.
pub mod value;

pub use descriptor::{AbiDescriptor, FunctionSchema};
pub use encode::{encode_call, encode_packed, encode_word, keccak256, parameter_hash, selector};
pub use error::{AbiError, AbiResult};
pub use events::{EventArg, EventParam, EventSchema, RawLog};
pub use normalize::Amount;
pub use value::{AbiKind, AbiValue};
