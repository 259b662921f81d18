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

//! # DAO Primitives
//!
//! Fixed-size chain types shared by every crate in the workspace.
//!
//! - [`Address`]: 20-byte account/contract identifier, hex-encoded with
//!   a checksummed display form.
//! - [`Bytes32`]: 32-byte hash value (transaction hashes, proposal ids,
//!   parameter hashes).
//! - [`Permissions`]: the controller permissions bitmask granted to a
//!   registered scheme, with pure set-style combinators.

#![warn(missing_docs)]

/// 20-byte account and contract identifiers.
pub mod address;
/// 32-byte hash values.
pub mod bytes32;
/// Core error types.
pub mod error;
/// Scheme permissions bitmask.
pub mod permissions;

pub use address::{Address, ADDRESS_SIZE};
pub use bytes32::{Bytes32, BYTES32_SIZE};
pub use error::{PrimitiveError, PrimitiveResult};
pub use permissions::Permissions;
