// Copyright (C) 2024-2026 The dao-rs contributors.
//
// descriptor.rs file belongs to the dao-rs project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Contract ABI descriptors.
//!
//! A descriptor carries the subset of a deployed contract's ABI that
//! this SDK touches: the functions it invokes and the events it
//! correlates. Method signatures and event argument names are an
//! external, versioned contract and must match the deployment exactly.

use crate::encode::encode_call;
use crate::error::{AbiError, AbiResult};
use crate::events::EventSchema;
use crate::value::{AbiKind, AbiValue};
use dao_primitives::Bytes32;
use serde::{Deserialize, Serialize};

/// The declared shape of one contract function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSchema {
    /// Function name as declared by the contract.
    pub name: String,
    /// Parameter kinds, in declaration order.
    pub inputs: Vec<AbiKind>,
}

impl FunctionSchema {
    /// Convenience constructor.
    #[must_use]
    pub fn new(name: &str, inputs: Vec<AbiKind>) -> Self {
        Self {
            name: name.to_string(),
            inputs,
        }
    }

    /// Canonical signature string, `name(type1,type2,...)`.
    #[must_use]
    pub fn signature(&self) -> String {
        let types: Vec<&str> = self.inputs.iter().map(|k| k.signature_name()).collect();
        format!("{}({})", self.name, types.join(","))
    }

    /// Encodes a call to this function.
    ///
    /// # Errors
    ///
    /// - [`AbiError::ArityMismatch`] for a wrong argument count.
    /// - [`AbiError::TypeMismatch`] when an argument's kind differs
    ///   from the declaration.
    pub fn encode_call(&self, args: &[AbiValue]) -> AbiResult<Vec<u8>> {
        if args.len() != self.inputs.len() {
            return Err(AbiError::ArityMismatch {
                function: self.name.clone(),
                expected: self.inputs.len(),
                actual: args.len(),
            });
        }
        for (arg, expected) in args.iter().zip(&self.inputs) {
            if arg.kind() != *expected {
                return Err(AbiError::TypeMismatch {
                    expected: *expected,
                    actual: arg.kind(),
                });
            }
        }
        encode_call(&self.signature(), args)
    }
}

/// The SDK-facing ABI of one contract type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiDescriptor {
    /// Events this SDK decodes and correlates.
    pub events: Vec<EventSchema>,
    /// Functions this SDK invokes.
    pub functions: Vec<FunctionSchema>,
}

impl AbiDescriptor {
    /// Builds a descriptor from schema lists.
    #[must_use]
    pub fn new(events: Vec<EventSchema>, functions: Vec<FunctionSchema>) -> Self {
        Self { events, functions }
    }

    /// Looks up an event schema by name.
    ///
    /// # Errors
    ///
    /// Returns [`AbiError::UnknownEvent`] when absent.
    pub fn event(&self, name: &str) -> AbiResult<&EventSchema> {
        self.events
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| AbiError::UnknownEvent {
                name: name.to_string(),
            })
    }

    /// Looks up an event schema by its signature topic.
    #[must_use]
    pub fn event_by_topic(&self, topic: &Bytes32) -> Option<&EventSchema> {
        self.events.iter().find(|e| e.topic() == *topic)
    }

    /// Looks up a function schema by name.
    ///
    /// # Errors
    ///
    /// Returns [`AbiError::UnknownFunction`] when absent.
    pub fn function(&self, name: &str) -> AbiResult<&FunctionSchema> {
        self.functions
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| AbiError::UnknownFunction {
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventParam;

    #[test]
    fn test_function_signature() {
        let f = FunctionSchema::new("vote", vec![AbiKind::Bytes32, AbiKind::Uint]);
        assert_eq!(f.signature(), "vote(bytes32,uint256)");
    }

    #[test]
    fn test_encode_call_checks_arity_and_kinds() {
        let f = FunctionSchema::new("vote", vec![AbiKind::Bytes32, AbiKind::Uint]);
        assert!(matches!(
            f.encode_call(&[AbiValue::from(1u64)]),
            Err(AbiError::ArityMismatch { .. })
        ));
        assert!(matches!(
            f.encode_call(&[AbiValue::from(1u64), AbiValue::from(1u64)]),
            Err(AbiError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_descriptor_lookups() {
        let descriptor = AbiDescriptor::new(
            vec![EventSchema::new(
                "Stake",
                vec![EventParam::new("_amount", AbiKind::Uint, false)],
            )],
            vec![FunctionSchema::new("stake", vec![AbiKind::Uint])],
        );
        assert!(descriptor.event("Stake").is_ok());
        assert!(matches!(
            descriptor.event("Missing"),
            Err(AbiError::UnknownEvent { .. })
        ));
        let topic = descriptor.event("Stake").unwrap().topic();
        assert!(descriptor.event_by_topic(&topic).is_some());
        assert!(descriptor.function("stake").is_ok());
    }
}
