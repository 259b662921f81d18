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

use crate::value::AbiKind;
use thiserror::Error;

/// Result type alias for ABI operations.
pub type AbiResult<T> = Result<T, AbiError>;

/// Errors raised while normalizing, encoding, or decoding ABI values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AbiError {
    /// A numeric input was negative where only unsigned values are valid.
    #[error("Negative amount: {value}")]
    NegativeAmount {
        /// Textual form of the offending input.
        value: String,
    },

    /// A textual numeric input could not be parsed as a decimal integer.
    #[error("Invalid decimal string: {value:?}")]
    InvalidDecimal {
        /// The offending input.
        value: String,
    },

    /// A numeric value does not fit in 256 bits.
    #[error("Value does not fit in a 256-bit word: {value}")]
    Overflow {
        /// Textual form of the offending input.
        value: String,
    },

    /// A value's kind did not match the kind required by the schema.
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Kind required by the schema.
        expected: AbiKind,
        /// Kind of the supplied value.
        actual: AbiKind,
    },

    /// Array kinds cannot appear as event arguments.
    #[error("Unsupported event argument kind: {kind}")]
    UnsupportedEventKind {
        /// The offending kind.
        kind: AbiKind,
    },

    /// A log's first topic did not match the event signature topic.
    #[error("Log signature does not match event '{event}'")]
    SignatureMismatch {
        /// Event name whose signature was expected.
        event: String,
    },

    /// Log data ended before all non-indexed arguments were decoded.
    #[error("Truncated log data: needed {needed} bytes, got {available}")]
    TruncatedData {
        /// Bytes required to decode the next word.
        needed: usize,
        /// Bytes actually available.
        available: usize,
    },

    /// An indexed argument's topic was absent from the log.
    #[error("Missing topic {index} for indexed event argument")]
    MissingTopic {
        /// Topic position that was absent.
        index: usize,
    },

    /// The descriptor does not define the named event.
    #[error("Unknown event: {name}")]
    UnknownEvent {
        /// Requested event name.
        name: String,
    },

    /// The descriptor does not define the named function.
    #[error("Unknown function: {name}")]
    UnknownFunction {
        /// Requested function name.
        name: String,
    },

    /// Wrong number of arguments for a function call.
    #[error("Function '{function}' takes {expected} arguments, got {actual}")]
    ArityMismatch {
        /// Function name.
        function: String,
        /// Declared parameter count.
        expected: usize,
        /// Supplied argument count.
        actual: usize,
    },
}
