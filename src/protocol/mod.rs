use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RpcError;

pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

/// One request envelope, read from a single input line.
///
/// `params` carries the positional arguments for the method. `id` is
/// optional and echoed back verbatim on the response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub method: String,
    #[serde(default)]
    pub params: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
}

/// One response envelope, written as a single output line. Exactly one of
/// `result` and `error` is present.
#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorObject>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Response {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Option<Value>, error: &RpcError) -> Self {
        Self {
            id,
            result: None,
            error: Some(ErrorObject::from(error)),
        }
    }
}

impl From<&RpcError> for ErrorObject {
    fn from(error: &RpcError) -> Self {
        let code = match error {
            RpcError::MethodNotFound(_) => METHOD_NOT_FOUND,
            RpcError::InvalidParams(_) => INVALID_PARAMS,
        };

        Self {
            code,
            message: error.to_string(),
            data: None,
        }
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
