//! Argument validation.
//!
//! Validation is shallow: required parameters must be present and non-null,
//! nothing more. Path and query values are coerced to strings later by the
//! request builder; body values pass through without nested schema checks.
//! That looseness mirrors the upstream generated adapters and is preserved
//! deliberately.

use crate::error::{PetstoreToolsError, Result};
use crate::registry::OperationDescriptor;
use serde_json::Value;

/// Check `arguments` against the operation's required parameters.
///
/// Runs before any request is built, so a failing call never touches the
/// network. Unknown argument keys are ignored; the builder only reads
/// declared parameters.
///
/// # Errors
///
/// Returns `Validation { missing }` naming the first required parameter
/// that is absent (or JSON `null`) in declaration order.
pub fn validate(op: &OperationDescriptor, arguments: &Value) -> Result<()> {
    for param in op.params {
        if !param.required {
            continue;
        }
        let present = matches!(arguments.get(param.name), Some(v) if !v.is_null());
        if !present {
            return Err(PetstoreToolsError::Validation {
                missing: param.name.to_string(),
            });
        }
    }
    Ok(())
}
