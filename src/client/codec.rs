//! JSON serialization helpers
//!
//! A client encodes action bodies and decodes response bodies through a
//! [`JsonCodec`]. Callers that need a different representation (for example
//! pretty-printed bodies while debugging) can supply their own implementation
//! through the configuration builder.

use crate::error::Result;
use serde_json::Value;
use std::fmt::Debug;

/// Serialization helper used by the client for request and response bodies
pub trait JsonCodec: Send + Sync + Debug {
    /// Encode a JSON value into a request body
    fn to_vec(&self, value: &Value) -> Result<Vec<u8>>;

    /// Decode a response body. An empty body decodes to `Value::Null`.
    fn from_slice(&self, bytes: &[u8]) -> Result<Value>;
}

/// Compact serde_json encoding
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultJsonCodec;

impl JsonCodec for DefaultJsonCodec {
    fn to_vec(&self, value: &Value) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(value)?)
    }

    fn from_slice(&self, bytes: &[u8]) -> Result<Value> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Pretty-printed encoding, decoding is the same as [`DefaultJsonCodec`]
#[derive(Debug, Default, Clone, Copy)]
pub struct PrettyJsonCodec;

impl JsonCodec for PrettyJsonCodec {
    fn to_vec(&self, value: &Value) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(value)?)
    }

    fn from_slice(&self, bytes: &[u8]) -> Result<Value> {
        DefaultJsonCodec.from_slice(bytes)
    }
}
