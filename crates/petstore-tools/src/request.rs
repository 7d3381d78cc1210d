//! HTTP request building.
//!
//! Turns an [`OperationDescriptor`] plus validated arguments into a concrete
//! request shape: substituted path, ordered query pairs, optional JSON body.
//! The result is fully determined by descriptor + arguments; base URL, auth,
//! and timeout are the transport client's concern.

use crate::error::Result;
use crate::registry::{OperationDescriptor, ParamLocation};
use reqwest::Method;
use serde_json::Value;

/// A built request, ready for the transport client.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltRequest {
    pub method: Method,
    /// Path with all placeholders substituted (always leading-slash).
    pub path: String,
    /// Query pairs in descriptor parameter order.
    pub query: Vec<(String, String)>,
    /// JSON body, passed through as supplied (arrays stay arrays).
    pub body: Option<Value>,
}

/// Build the request for one invocation.
///
/// Assumes [`crate::validate::validate`] already ran: required parameters
/// are present, and the registry guaranteed at startup that every path
/// placeholder has a backing parameter. Absent optional query parameters
/// are omitted entirely, never sent as empty.
///
/// # Errors
///
/// Currently infallible for descriptors that passed registry validation;
/// the `Result` return keeps the pipeline signature uniform.
pub fn build(op: &OperationDescriptor, arguments: &Value) -> Result<BuiltRequest> {
    let mut path = op.path.to_string();
    for param in op.params_at(ParamLocation::Path) {
        if let Some(value) = present(arguments.get(param.name)) {
            path = path.replace(&format!("{{{}}}", param.name), &value_to_string(value));
        }
    }
    // Registry invariants make a leftover placeholder a builder bug, not a
    // caller error.
    debug_assert!(
        !path.contains('{'),
        "unsubstituted placeholder in '{path}' for operation '{}'",
        op.name
    );

    let mut query: Vec<(String, String)> = Vec::new();
    for param in op.params_at(ParamLocation::Query) {
        let Some(value) = present(arguments.get(param.name)) else {
            continue;
        };
        match value {
            // Array values expand to repeated keys (form style, exploded).
            Value::Array(items) => {
                query.extend(
                    items
                        .iter()
                        .map(|item| (param.name.to_string(), value_to_string(item))),
                );
            }
            other => query.push((param.name.to_string(), value_to_string(other))),
        }
    }

    let body = op
        .body_param()
        .and_then(|param| present(arguments.get(param.name)))
        .cloned();

    Ok(BuiltRequest {
        method: op.method.clone(),
        path,
        query,
        body,
    })
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

/// Render a JSON value as its path/query string form.
///
/// Numbers render as decimal text, so numeric identifiers are accepted as
/// either `42` or `"42"` and produce the same segment.
pub(crate) fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
