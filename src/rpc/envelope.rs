//! Debug API wire envelopes: request decoding and response encoding.
//!
//! Request: `{"jsonrpc"?: "2.0", "id"?: any, "method": string, "params"?: any}`.
//! Response: `{"jsonrpc": "2.0", "id": any, "result": any}` or
//! `{"jsonrpc": "2.0", "id": any, "error": {"code", "message", "data"?}}`.
//! A response never carries both `result` and `error`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const JSONRPC_VERSION: &str = "2.0";

// Error taxonomy
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INTERNAL_ERROR: i32 = -32603;

/// Structured RPC error returned inside the `error` member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("{message} ({code})")]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), data: None }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn invalid_request() -> Self {
        Self::new(INVALID_REQUEST, "Invalid Request")
    }

    pub fn method_not_found() -> Self {
        Self::new(METHOD_NOT_FOUND, "Method not found")
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(INTERNAL_ERROR, "Internal error").with_data(Value::String(detail.into()))
    }
}

/// Method parameters as sent by the caller.
///
/// Kept opaque: none of the debug methods read them, and unexpected params
/// must never fail a call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(Option<Value>);

impl Params {
    pub fn none() -> Self {
        Self(None)
    }

    pub fn is_absent(&self) -> bool {
        self.0.is_none()
    }

    pub fn as_value(&self) -> Option<&Value> {
        self.0.as_ref()
    }
}

impl From<Value> for Params {
    fn from(v: Value) -> Self {
        Self(Some(v))
    }
}

impl std::fmt::Display for Params {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(v) => write!(f, "{}", v),
            None => f.write_str("<nil>"),
        }
    }
}

/// A decoded debug request.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcRequest {
    /// echoed verbatim; `Null` when the caller sent none
    pub id: Value,
    pub method: String,
    pub params: Params,
}

impl RpcRequest {
    pub fn new(id: Value, method: impl Into<String>, params: Params) -> Self {
        Self { id, method: method.into(), params }
    }
}

#[derive(Deserialize)]
struct RawRequest {
    #[serde(default)]
    jsonrpc: Option<String>,
    #[serde(default)]
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Option<Value>,
}

/// Decode a raw request body.
///
/// Rejects non-JSON, anything but a single object (batches included), a
/// missing or non-string `method`, and a `jsonrpc` member other than "2.0".
pub fn decode_request(body: &[u8]) -> Result<RpcRequest, RpcError> {
    let value: Value = serde_json::from_slice(body).map_err(|_| RpcError::invalid_request())?;
    if !value.is_object() {
        return Err(RpcError::invalid_request());
    }
    let raw: RawRequest = serde_json::from_value(value).map_err(|_| RpcError::invalid_request())?;
    if let Some(v) = &raw.jsonrpc {
        if v != JSONRPC_VERSION {
            return Err(RpcError::invalid_request());
        }
    }
    Ok(RpcRequest {
        id: raw.id.unwrap_or(Value::Null),
        method: raw.method,
        params: Params(raw.params),
    })
}

/// Successful call envelope.
#[derive(Debug, Clone, Serialize)]
pub struct RpcResponse<T> {
    pub jsonrpc: &'static str,
    pub id: Value,
    pub result: T,
}

impl<T> RpcResponse<T> {
    pub fn new(id: Value, result: T) -> Self {
        Self { jsonrpc: JSONRPC_VERSION, id, result }
    }
}

/// Failed call envelope.
#[derive(Debug, Clone, Serialize)]
pub struct RpcErrorResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    pub error: RpcError,
}

/// Exactly one of the two envelopes, produced once per request.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RpcReply<T> {
    Success(RpcResponse<T>),
    Failure(RpcErrorResponse),
}

impl<T: Serialize> RpcReply<T> {
    pub fn success(id: Value, result: T) -> Self {
        RpcReply::Success(RpcResponse::new(id, result))
    }

    /// Error reply; pass `None` when the request id is unknown.
    pub fn failure(id: Option<Value>, error: RpcError) -> Self {
        RpcReply::Failure(RpcErrorResponse {
            jsonrpc: JSONRPC_VERSION,
            id: id.unwrap_or(Value::Null),
            error,
        })
    }

    /// Encode to wire bytes. A result that cannot be serialized is turned
    /// into an internal-error reply for the same id.
    pub fn to_bytes(&self) -> Vec<u8> {
        match serde_json::to_vec(self) {
            Ok(bytes) => bytes,
            Err(e) => {
                let id = match self {
                    RpcReply::Success(r) => r.id.clone(),
                    RpcReply::Failure(r) => r.id.clone(),
                };
                let fallback = RpcReply::<()>::failure(Some(id), RpcError::internal(e.to_string()));
                serde_json::to_vec(&fallback).unwrap_or_default()
            }
        }
    }
}
