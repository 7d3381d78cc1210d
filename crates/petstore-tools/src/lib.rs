//! Petstore REST API -> MCP tooling.
//!
//! This crate holds everything the adapter binary needs to expose the Swagger
//! Petstore API as MCP tools:
//! - a fixed registry of operation descriptors (one per API operation)
//! - argument validation and HTTP request building
//! - a shared transport client that normalizes responses into JSON values
//! - the dispatcher tying it all together
//!
//! It intentionally contains **no** transport/session plumbing; the MCP
//! framing (stdio / streamable HTTP) lives in the adapter binary.

pub mod client;
pub mod dispatch;
pub mod error;
pub mod registry;
pub mod request;
pub mod semantics;
pub mod validate;
