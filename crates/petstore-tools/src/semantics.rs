//! HTTP method semantics helpers.
//!
//! Maps RFC 9110-style method semantics onto MCP `ToolAnnotations` so MCP
//! clients can tell read-only lookups from destructive mutations without
//! knowing anything about the Petstore API.

use reqwest::Method;
use rmcp::model::ToolAnnotations;

/// Generate MCP tool annotations for an HTTP-backed tool.
///
/// `openWorldHint` is always `true`: every tool talks to an external
/// service. For methods outside the registry's GET/POST/PUT/DELETE set the
/// remaining hints are left unset rather than guessed.
#[must_use]
pub fn annotations_for_method(method: &Method) -> ToolAnnotations {
    // (read_only, destructive, idempotent)
    let hints = if *method == Method::GET {
        Some((true, false, true))
    } else if *method == Method::POST {
        Some((false, false, false))
    } else if *method == Method::PUT || *method == Method::DELETE {
        Some((false, true, true))
    } else {
        None
    };

    ToolAnnotations {
        title: None,
        read_only_hint: hints.map(|(r, _, _)| r),
        destructive_hint: hints.map(|(_, d, _)| d),
        idempotent_hint: hints.map(|(_, _, i)| i),
        open_world_hint: Some(true),
    }
}
