use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use tracing::debug;

use crate::error::RpcError;
use crate::protocol::{Request, Response};

mod add;

pub use add::Add;

/// A single registered RPC method.
#[async_trait]
pub trait Method: Send + Sync {
    async fn call(&self, params: Vec<Value>) -> Result<Value, RpcError>;
}

/// Name → method table, shared by every execution unit.
pub struct MethodRegistry {
    methods: DashMap<String, Arc<dyn Method>>,
}

impl MethodRegistry {
    pub fn new() -> Self {
        Self {
            methods: DashMap::new(),
        }
    }

    pub fn register(&self, name: impl Into<String>, method: Arc<dyn Method>) {
        self.methods.insert(name.into(), method);
    }

    /// Runs one request to completion. Infallible at the task level: an
    /// unknown method or a method failure comes back as an error response,
    /// so every invocation yields exactly one outcome.
    pub async fn dispatch(&self, request: Request) -> Response {
        let Request { method, params, id } = request;

        let Some(handler) = self
            .methods
            .get(&method)
            .map(|entry| Arc::clone(entry.value()))
        else {
            debug!("method {:?} not registered", method);
            return Response::failure(id, &RpcError::MethodNotFound(method));
        };

        match handler.call(params).await {
            Ok(result) => Response::success(id, result),
            Err(error) => Response::failure(id, &error),
        }
    }
}

impl Default for MethodRegistry {
    fn default() -> Self {
        Self::new()
    }
}
