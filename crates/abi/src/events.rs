// Copyright (C) 2024-2026 The dao-rs contributors.
//
// events.rs file belongs to the dao-rs project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Event schemas and decoding of raw emitted logs.
//!
//! A contract event is identified on the wire by its signature topic:
//! the Keccak-256 hash of `Name(type1,type2,...)` stored as the log's
//! first topic. Indexed arguments occupy the remaining topics in
//! declaration order; non-indexed arguments are packed sequentially
//! into the data blob. Event arguments are restricted to single-word
//! kinds — no governance event in this SDK's surface emits arrays.

use crate::encode::{decode_word, keccak256, WORD_SIZE};
use crate::error::{AbiError, AbiResult};
use crate::value::{AbiKind, AbiValue};
use dao_primitives::{Address, Bytes32};
use serde::{Deserialize, Serialize};

/// One emitted log record as the provider delivers it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLog {
    /// Contract that emitted the log.
    pub address: Address,
    /// Topic list; `topics[0]` is the event signature topic.
    pub topics: Vec<Bytes32>,
    /// Non-indexed argument data.
    #[serde(with = "hex_bytes")]
    pub data: Vec<u8>,
    /// Position of this log within its transaction.
    pub log_index: u64,
}

mod hex_bytes {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(data)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        let stripped = s.strip_prefix("0x").unwrap_or(&s);
        hex::decode(stripped).map_err(D::Error::custom)
    }
}

/// One declared event parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventParam {
    /// Parameter name as declared by the contract (e.g. `_proposalId`).
    pub name: String,
    /// Parameter kind.
    pub kind: AbiKind,
    /// Whether the parameter is indexed (carried in a topic).
    pub indexed: bool,
}

impl EventParam {
    /// Convenience constructor.
    #[must_use]
    pub fn new(name: &str, kind: AbiKind, indexed: bool) -> Self {
        Self {
            name: name.to_string(),
            kind,
            indexed,
        }
    }
}

/// A decoded, named event argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventArg {
    /// Argument name.
    pub name: String,
    /// Decoded value.
    pub value: AbiValue,
}

/// The declared shape of one contract event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSchema {
    /// Event name as declared by the contract.
    pub name: String,
    /// Declared parameters, in declaration order.
    pub inputs: Vec<EventParam>,
}

impl EventSchema {
    /// Convenience constructor.
    #[must_use]
    pub fn new(name: &str, inputs: Vec<EventParam>) -> Self {
        Self {
            name: name.to_string(),
            inputs,
        }
    }

    /// Canonical signature string, `Name(type1,type2,...)`.
    #[must_use]
    pub fn signature(&self) -> String {
        let types: Vec<&str> = self
            .inputs
            .iter()
            .map(|p| p.kind.signature_name())
            .collect();
        format!("{}({})", self.name, types.join(","))
    }

    /// The signature topic identifying this event on the wire.
    #[must_use]
    pub fn topic(&self) -> Bytes32 {
        keccak256(self.signature().as_bytes())
    }

    /// Builds a raw log carrying the given argument values, laid out
    /// exactly as the chain would emit it. Counterpart of
    /// [`EventSchema::decode`]; used by deterministic test providers.
    ///
    /// # Errors
    ///
    /// Returns [`AbiError::ArityMismatch`]-style failures via
    /// [`AbiError::UnsupportedEventKind`] / [`AbiError::TypeMismatch`]
    /// when the values do not fit the declaration.
    pub fn encode(
        &self,
        address: Address,
        log_index: u64,
        values: &[AbiValue],
    ) -> AbiResult<RawLog> {
        if values.len() != self.inputs.len() {
            return Err(AbiError::TruncatedData {
                needed: self.inputs.len() * WORD_SIZE,
                available: values.len() * WORD_SIZE,
            });
        }

        let mut topics = vec![self.topic()];
        let mut data = Vec::new();
        for (param, value) in self.inputs.iter().zip(values) {
            if param.kind.is_dynamic() {
                return Err(AbiError::UnsupportedEventKind { kind: param.kind });
            }
            if value.kind() != param.kind {
                return Err(AbiError::TypeMismatch {
                    expected: param.kind,
                    actual: value.kind(),
                });
            }
            let word = crate::encode::encode_word(value)?;
            if param.indexed {
                topics.push(Bytes32::from(word));
            } else {
                data.extend_from_slice(&word);
            }
        }

        Ok(RawLog {
            address,
            topics,
            data,
            log_index,
        })
    }

    /// Decodes a raw log against this schema into named arguments.
    ///
    /// # Errors
    ///
    /// - [`AbiError::SignatureMismatch`] if the log's first topic is
    ///   absent or differs from this event's signature topic.
    /// - [`AbiError::MissingTopic`] / [`AbiError::TruncatedData`] when
    ///   the log is shorter than the declaration requires.
    /// - [`AbiError::UnsupportedEventKind`] for array parameters.
    pub fn decode(&self, log: &RawLog) -> AbiResult<Vec<EventArg>> {
        match log.topics.first() {
            Some(topic) if *topic == self.topic() => {}
            _ => {
                return Err(AbiError::SignatureMismatch {
                    event: self.name.clone(),
                })
            }
        }

        let mut args = Vec::with_capacity(self.inputs.len());
        let mut topic_cursor = 1usize;
        let mut data_cursor = 0usize;

        for param in &self.inputs {
            if param.kind.is_dynamic() {
                return Err(AbiError::UnsupportedEventKind { kind: param.kind });
            }

            let word: [u8; WORD_SIZE] = if param.indexed {
                let topic = log
                    .topics
                    .get(topic_cursor)
                    .ok_or(AbiError::MissingTopic {
                        index: topic_cursor,
                    })?;
                topic_cursor += 1;
                *topic.as_bytes()
            } else {
                let end = data_cursor + WORD_SIZE;
                if log.data.len() < end {
                    return Err(AbiError::TruncatedData {
                        needed: end,
                        available: log.data.len(),
                    });
                }
                let mut word = [0u8; WORD_SIZE];
                word.copy_from_slice(&log.data[data_cursor..end]);
                data_cursor = end;
                word
            };

            args.push(EventArg {
                name: param.name.clone(),
                value: decode_word(param.kind, &word)?,
            });
        }

        Ok(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode_word;

    fn new_proposal_schema() -> EventSchema {
        EventSchema::new(
            "NewProposal",
            vec![
                EventParam::new("_proposalId", AbiKind::Bytes32, true),
                EventParam::new("_proposer", AbiKind::Address, true),
                EventParam::new("_numOfChoices", AbiKind::Uint, false),
                EventParam::new("_paramsHash", AbiKind::Bytes32, false),
            ],
        )
    }

    fn encode_data(values: &[AbiValue]) -> Vec<u8> {
        values
            .iter()
            .flat_map(|v| encode_word(v).unwrap())
            .collect()
    }

    #[test]
    fn test_signature_and_topic() {
        let schema = new_proposal_schema();
        assert_eq!(
            schema.signature(),
            "NewProposal(bytes32,address,uint256,bytes32)"
        );
        assert!(!schema.topic().is_zero());
    }

    #[test]
    fn test_decode_mixed_indexed_and_data() {
        let schema = new_proposal_schema();
        let proposal_id = Bytes32::parse(
            "0xab00000000000000000000000000000000000000000000000000000000000012",
        )
        .unwrap();
        let proposer = Address::parse("0x46cf7fa63cf4737cdf5fcb1f4a4fdbbeca5e93a7").unwrap();
        let params_hash = keccak256(b"params");

        let log = RawLog {
            address: Address::zero(),
            topics: vec![
                schema.topic(),
                proposal_id,
                Bytes32::from(encode_word(&AbiValue::Address(proposer)).unwrap()),
            ],
            data: encode_data(&[AbiValue::from(2u64), AbiValue::Bytes32(params_hash)]),
            log_index: 0,
        };

        let args = schema.decode(&log).unwrap();
        assert_eq!(args[0].name, "_proposalId");
        assert_eq!(args[0].value, AbiValue::Bytes32(proposal_id));
        assert_eq!(args[1].value, AbiValue::Address(proposer));
        assert_eq!(args[2].value, AbiValue::from(2u64));
        assert_eq!(args[3].value, AbiValue::Bytes32(params_hash));
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let schema = new_proposal_schema();
        let values = vec![
            AbiValue::Bytes32(keccak256(b"proposal")),
            AbiValue::Address(
                Address::parse("0x46cf7fa63cf4737cdf5fcb1f4a4fdbbeca5e93a7").unwrap(),
            ),
            AbiValue::from(5u64),
            AbiValue::Bytes32(keccak256(b"params")),
        ];
        let log = schema.encode(Address::zero(), 3, &values).unwrap();
        let args = schema.decode(&log).unwrap();
        let decoded: Vec<AbiValue> = args.into_iter().map(|a| a.value).collect();
        assert_eq!(decoded, values);
        assert_eq!(log.log_index, 3);
    }

    #[test]
    fn test_decode_rejects_foreign_log() {
        let schema = new_proposal_schema();
        let log = RawLog {
            address: Address::zero(),
            topics: vec![keccak256(b"SomethingElse()")],
            data: vec![],
            log_index: 0,
        };
        assert!(matches!(
            schema.decode(&log),
            Err(AbiError::SignatureMismatch { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_truncated_data() {
        let schema = EventSchema::new(
            "Stake",
            vec![EventParam::new("_amount", AbiKind::Uint, false)],
        );
        let log = RawLog {
            address: Address::zero(),
            topics: vec![schema.topic()],
            data: vec![0u8; 16],
            log_index: 0,
        };
        assert!(matches!(
            schema.decode(&log),
            Err(AbiError::TruncatedData { .. })
        ));
    }
}
