//! Error types for `unrelated-petstore-tools`.

use serde_json::Value;
use thiserror::Error;

/// Main error type for petstore tooling.
///
/// Every invocation failure is surfaced as exactly one of these kinds so
/// callers can distinguish "tool doesn't exist" from "the tool exists but
/// the call failed" without parsing message strings.
#[derive(Error, Debug)]
pub enum PetstoreToolsError {
    /// Configuration errors (invalid registry table, invalid base URL).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The requested tool name is not in the registry.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// A required parameter was absent from the call arguments.
    #[error("Missing required parameter: {missing}")]
    Validation { missing: String },

    /// Network failure: no HTTP response was received (connect, timeout).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The API answered with a non-success status. The remote status and
    /// payload are passed through unmodified.
    #[error("API returned {status}: {body}")]
    Remote { status: u16, body: Value },

    /// The response body was not valid JSON.
    #[error("Invalid JSON response: {0}")]
    Decode(String),
}

/// Result type alias for petstore tooling operations.
pub type Result<T> = std::result::Result<T, PetstoreToolsError>;
