// Copyright (C) 2024-2026 The dao-rs contributors.
//
// json_rpc.rs file belongs to the dao-rs project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! HTTP JSON-RPC implementation of [`ChainProvider`].

use crate::error::{RpcError, RpcResult};
use crate::provider::{ChainProvider, LogQuery, TransactionReceipt, TransactionRequest};
use crate::settings::ClientSettings;
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use dao_abi::RawLog;
use dao_primitives::{Address, Bytes32};
use reqwest::Client;
use url::Url;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// A JSON-RPC 2.0 request envelope.
#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

/// A JSON-RPC 2.0 response envelope.
#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// JSON-RPC chain provider over HTTP.
pub struct JsonRpcProvider {
    base_address: Url,
    http_client: Client,
    settings: ClientSettings,
    next_id: AtomicU64,
}

impl JsonRpcProvider {
    /// Creates a provider against the given endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::Transport`] if the HTTP client cannot be
    /// constructed.
    pub fn new(url: Url, settings: ClientSettings) -> RpcResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| RpcError::Transport(e.to_string()))?;
        Ok(Self {
            base_address: url,
            http_client: client,
            settings,
            next_id: AtomicU64::new(1),
        })
    }

    /// Creates a provider with HTTP basic authentication.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::Transport`] if the HTTP client cannot be
    /// constructed.
    pub fn with_basic_auth(
        url: Url,
        settings: ClientSettings,
        user: &str,
        pass: &str,
    ) -> RpcResult<Self> {
        let auth = format!("{user}:{pass}");
        let encoded = general_purpose::STANDARD.encode(auth.as_bytes());
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::AUTHORIZATION,
            format!("Basic {encoded}")
                .parse()
                .map_err(|_| RpcError::Transport("invalid basic auth header".to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| RpcError::Transport(e.to_string()))?;
        Ok(Self {
            base_address: url,
            http_client: client,
            settings,
            next_id: AtomicU64::new(1),
        })
    }

    /// The settings this provider was constructed with.
    #[must_use]
    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Sends one RPC request and returns the `result` member.
    async fn rpc_send(&self, method: &str, params: Value) -> RpcResult<Value> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };
        debug!(method, "sending rpc request");

        let response = self
            .http_client
            .post(self.base_address.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| RpcError::Transport(format!("HTTP error: {e}")))?;

        let parsed: RpcResponse = response
            .json()
            .await
            .map_err(|e| RpcError::InvalidResponse(format!("malformed response: {e}")))?;

        if let Some(error) = parsed.error {
            return Err(RpcError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        parsed
            .result
            .ok_or_else(|| RpcError::InvalidResponse("no result returned".to_string()))
    }

    fn request_to_json(&self, request: &TransactionRequest) -> Value {
        let mut obj = serde_json::Map::new();
        if let Some(from) = request.from {
            obj.insert("from".to_string(), json!(from.to_hex_string()));
        }
        if let Some(to) = request.to {
            obj.insert("to".to_string(), json!(to.to_hex_string()));
        }
        obj.insert(
            "data".to_string(),
            json!(format!("0x{}", hex::encode(&request.data))),
        );
        if let Some(ref value) = request.value {
            obj.insert("value".to_string(), json!(format!("0x{value:x}")));
        }
        if let Some(gas) = request.gas {
            obj.insert("gas".to_string(), json!(to_quantity(gas)));
        }
        Value::Object(obj)
    }
}

#[async_trait]
impl ChainProvider for JsonRpcProvider {
    async fn send_transaction(&self, mut request: TransactionRequest) -> RpcResult<Bytes32> {
        if request.from.is_none() {
            request.from = Some(self.default_account().await?);
        }
        let params = json!([self.request_to_json(&request)]);
        let result = self.rpc_send("eth_sendTransaction", params).await?;
        parse_bytes32(&result)
    }

    async fn transaction_receipt(&self, hash: Bytes32) -> RpcResult<Option<TransactionReceipt>> {
        let result = self
            .rpc_send("eth_getTransactionReceipt", json!([hash.to_hex_string()]))
            .await?;
        if result.is_null() {
            return Ok(None);
        }
        parse_receipt(&result).map(Some)
    }

    async fn call(&self, request: TransactionRequest) -> RpcResult<Vec<u8>> {
        let params = json!([self.request_to_json(&request), "latest"]);
        match self.rpc_send("eth_call", params).await {
            Ok(result) => parse_hex_bytes(&result),
            // Nodes report reverted eth_call as an RPC error carrying
            // the reason in the message.
            Err(RpcError::Rpc { message, .. }) if message.contains("revert") => {
                Err(RpcError::Reverted {
                    reason: Some(message),
                })
            }
            Err(other) => Err(other),
        }
    }

    async fn logs(&self, query: LogQuery) -> RpcResult<Vec<RawLog>> {
        let mut filter = serde_json::Map::new();
        if let Some(address) = query.address {
            filter.insert("address".to_string(), json!(address.to_hex_string()));
        }
        if !query.topics.is_empty() {
            let topics: Vec<Value> = query
                .topics
                .iter()
                .map(|t| match t {
                    Some(topic) => json!(topic.to_hex_string()),
                    None => Value::Null,
                })
                .collect();
            filter.insert("topics".to_string(), Value::Array(topics));
        }
        filter.insert(
            "fromBlock".to_string(),
            json!(query.from_block.map_or_else(|| "earliest".to_string(), to_quantity)),
        );
        filter.insert(
            "toBlock".to_string(),
            json!(query.to_block.map_or_else(|| "latest".to_string(), to_quantity)),
        );

        let result = self
            .rpc_send("eth_getLogs", json!([Value::Object(filter)]))
            .await?;
        let entries = result
            .as_array()
            .ok_or_else(|| RpcError::InvalidResponse("eth_getLogs: expected array".to_string()))?;
        entries.iter().map(parse_log).collect()
    }

    async fn default_account(&self) -> RpcResult<Address> {
        let result = self.rpc_send("eth_accounts", json!([])).await?;
        let accounts = result
            .as_array()
            .ok_or_else(|| RpcError::InvalidResponse("eth_accounts: expected array".to_string()))?;
        let first = accounts
            .first()
            .ok_or_else(|| RpcError::InvalidResponse("no accounts available".to_string()))?;
        parse_address(first)
    }

    async fn block_number(&self) -> RpcResult<u64> {
        let result = self.rpc_send("eth_blockNumber", json!([])).await?;
        parse_quantity(&result)
    }
}

fn to_quantity(value: u64) -> String {
    format!("{value:#x}")
}

fn parse_quantity(value: &Value) -> RpcResult<u64> {
    let s = value
        .as_str()
        .ok_or_else(|| RpcError::InvalidResponse("expected quantity string".to_string()))?;
    let stripped = s.strip_prefix("0x").unwrap_or(s);
    u64::from_str_radix(stripped, 16)
        .map_err(|_| RpcError::InvalidResponse(format!("bad quantity: {s}")))
}

fn parse_bytes32(value: &Value) -> RpcResult<Bytes32> {
    let s = value
        .as_str()
        .ok_or_else(|| RpcError::InvalidResponse("expected hash string".to_string()))?;
    Bytes32::parse(s).map_err(|e| RpcError::InvalidResponse(e.to_string()))
}

fn parse_address(value: &Value) -> RpcResult<Address> {
    let s = value
        .as_str()
        .ok_or_else(|| RpcError::InvalidResponse("expected address string".to_string()))?;
    Address::parse(s).map_err(|e| RpcError::InvalidResponse(e.to_string()))
}

fn parse_hex_bytes(value: &Value) -> RpcResult<Vec<u8>> {
    let s = value
        .as_str()
        .ok_or_else(|| RpcError::InvalidResponse("expected hex data string".to_string()))?;
    let stripped = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(stripped).map_err(|e| RpcError::InvalidResponse(format!("bad hex data: {e}")))
}

fn parse_log(value: &Value) -> RpcResult<RawLog> {
    let address = parse_address(
        value
            .get("address")
            .ok_or_else(|| RpcError::InvalidResponse("log without address".to_string()))?,
    )?;
    let topics = value
        .get("topics")
        .and_then(Value::as_array)
        .ok_or_else(|| RpcError::InvalidResponse("log without topics".to_string()))?
        .iter()
        .map(parse_bytes32)
        .collect::<RpcResult<Vec<_>>>()?;
    let data = parse_hex_bytes(
        value
            .get("data")
            .ok_or_else(|| RpcError::InvalidResponse("log without data".to_string()))?,
    )?;
    let log_index = value
        .get("logIndex")
        .map(parse_quantity)
        .transpose()?
        .unwrap_or(0);
    Ok(RawLog {
        address,
        topics,
        data,
        log_index,
    })
}

fn parse_receipt(value: &Value) -> RpcResult<TransactionReceipt> {
    let transaction_hash = parse_bytes32(
        value
            .get("transactionHash")
            .ok_or_else(|| RpcError::InvalidResponse("receipt without hash".to_string()))?,
    )?;
    let block_number = value
        .get("blockNumber")
        .map(parse_quantity)
        .transpose()?
        .unwrap_or(0);
    let succeeded = value
        .get("status")
        .map(parse_quantity)
        .transpose()?
        .map_or(true, |status| status == 1);
    let contract_address = match value.get("contractAddress") {
        Some(Value::Null) | None => None,
        Some(v) => Some(parse_address(v)?),
    };
    let logs = value
        .get("logs")
        .and_then(Value::as_array)
        .map(|entries| entries.iter().map(parse_log).collect::<RpcResult<Vec<_>>>())
        .transpose()?
        .unwrap_or_default();
    let revert_reason = value
        .get("revertReason")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(TransactionReceipt {
        transaction_hash,
        block_number,
        succeeded,
        contract_address,
        logs,
        revert_reason,
        raw: value.clone(),
    })
}
