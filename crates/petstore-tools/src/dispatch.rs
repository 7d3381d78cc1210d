//! Tool dispatch.
//!
//! The dispatcher threads one invocation through the linear pipeline:
//! registry lookup -> argument validation -> request building -> transport
//! execution -> response normalization. Each call is independent and
//! stateless; the shared pieces (registry, client pool) are immutable or
//! internally synchronized, so arbitrarily many invocations may run
//! concurrently.

use crate::client::{TransportClient, TransportConfig};
use crate::error::{PetstoreToolsError, Result};
use crate::registry::{OperationDescriptor, OperationRegistry};
use crate::request;
use crate::semantics::annotations_for_method;
use crate::validate::validate;
use rmcp::model::{CallToolResult, Content, JsonObject, Tool};
use serde_json::Value;
use std::sync::Arc;

/// Resolves tool names and executes invocations against the remote API.
///
/// Cheap to clone; clones share the registry, the precomputed MCP tool
/// list, and the transport client's connection pool.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    registry: OperationRegistry,
    client: TransportClient,
    tools: Vec<Tool>,
}

impl Dispatcher {
    /// Build a dispatcher over the builtin Petstore registry.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the registry table or the transport
    /// configuration is invalid.
    pub fn new(config: TransportConfig) -> Result<Self> {
        Self::with_registry(OperationRegistry::new()?, config)
    }

    /// Build a dispatcher over an explicit registry (used by tests).
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the transport configuration is invalid.
    pub fn with_registry(registry: OperationRegistry, config: TransportConfig) -> Result<Self> {
        let client = TransportClient::new(config)?;
        let tools = registry.operations().map(to_tool).collect();

        Ok(Self {
            inner: Arc::new(DispatcherInner {
                registry,
                client,
                tools,
            }),
        })
    }

    #[must_use]
    pub fn registry(&self) -> &OperationRegistry {
        &self.inner.registry
    }

    /// The MCP `Tool` list for all registered operations, in table order.
    #[must_use]
    pub fn list_tools(&self) -> Vec<Tool> {
        self.inner.tools.clone()
    }

    /// Invoke a tool by name and return the decoded JSON response.
    ///
    /// # Errors
    ///
    /// - `UnknownTool` when the name is not registered (no network call)
    /// - `Validation` when a required argument is missing (no network call)
    /// - `Transport` / `Remote` / `Decode` from the transport client
    pub async fn invoke(&self, name: &str, arguments: &Value) -> Result<Value> {
        self.invoke_with_timeout(name, arguments, None).await
    }

    /// Like [`Dispatcher::invoke`], with a per-call timeout overriding the
    /// transport default.
    ///
    /// # Errors
    ///
    /// Same kinds as [`Dispatcher::invoke`].
    pub async fn invoke_with_timeout(
        &self,
        name: &str,
        arguments: &Value,
        timeout: Option<std::time::Duration>,
    ) -> Result<Value> {
        let Some(op) = self.inner.registry.lookup(name) else {
            return Err(PetstoreToolsError::UnknownTool(name.to_string()));
        };

        validate(op, arguments)?;
        let request = request::build(op, arguments)?;
        match timeout {
            Some(t) => self.inner.client.execute_with_timeout(&request, t).await,
            None => self.inner.client.execute(&request).await,
        }
    }

    /// Invoke a tool and wrap the response as an MCP `CallToolResult`.
    ///
    /// The JSON body is serialized into a single text content block, the
    /// interoperable lowest common denominator for MCP clients.
    ///
    /// # Errors
    ///
    /// Same kinds as [`Dispatcher::invoke`].
    pub async fn call_tool(&self, name: &str, arguments: &Value) -> Result<CallToolResult> {
        let body = self.invoke(name, arguments).await?;
        let text = if let Some(s) = body.as_str() {
            s.to_string()
        } else {
            serde_json::to_string(&body).unwrap_or_else(|_| body.to_string())
        };
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

fn to_tool(op: &'static OperationDescriptor) -> Tool {
    let schema_obj = op
        .input_schema()
        .as_object()
        .cloned()
        .unwrap_or_else(JsonObject::new);
    let mut tool = Tool::new(op.name, op.description, Arc::new(schema_obj));
    tool.annotations = Some(annotations_for_method(&op.method));
    tool
}
