//! Static operation registry.
//!
//! One [`OperationDescriptor`] per Petstore API operation, transcribed from
//! the upstream OpenAPI document. The table is fixed at build time and shared
//! read-only by every dispatch call; [`OperationRegistry::new`] validates its
//! internal invariants once at startup so the request builder never has to.

use crate::error::{PetstoreToolsError, Result};
use reqwest::Method;
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};

/// Where a parameter goes in the outbound HTTP request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamLocation {
    Path,
    Query,
    Body,
}

/// Shallow value shape advertised in the tool input schema.
///
/// Body parameters are deliberately loose (`object` / `array of object`,
/// no nested field enforcement) to stay compatible with the upstream API's
/// own tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Object,
    ObjectList,
}

/// One parameter of an operation.
#[derive(Debug)]
pub struct ParamSpec {
    pub name: &'static str,
    pub location: ParamLocation,
    pub required: bool,
    pub kind: ParamKind,
    pub description: &'static str,
}

/// Immutable descriptor mapping one tool name to one HTTP operation.
#[derive(Debug)]
pub struct OperationDescriptor {
    /// Tool name (exposed; globally unique).
    pub name: &'static str,
    /// Description from the OpenAPI operation summary.
    pub description: &'static str,
    /// HTTP method.
    pub method: Method,
    /// Path template (e.g. `/pet/{petId}`).
    pub path: &'static str,
    /// Parameters in declaration order (query order follows this).
    pub params: &'static [ParamSpec],
}

impl OperationDescriptor {
    /// Build the MCP input schema for this operation.
    #[must_use]
    pub fn input_schema(&self) -> Value {
        let mut properties = serde_json::Map::new();
        let mut required: Vec<&str> = Vec::new();

        for param in self.params {
            properties.insert(param.name.to_string(), param_schema(param));
            if param.required {
                required.push(param.name);
            }
        }

        let mut schema = json!({
            "type": "object",
            "properties": Value::Object(properties),
        });
        if !required.is_empty() {
            schema["required"] = json!(required);
        }
        schema
    }

    /// Parameters at a given location, in declaration order.
    pub fn params_at(&self, location: ParamLocation) -> impl Iterator<Item = &'static ParamSpec> {
        self.params.iter().filter(move |p| p.location == location)
    }

    /// The body parameter, if the operation has one.
    #[must_use]
    pub fn body_param(&self) -> Option<&'static ParamSpec> {
        self.params_at(ParamLocation::Body).next()
    }
}

fn param_schema(param: &ParamSpec) -> Value {
    let mut schema = match param.kind {
        ParamKind::String => json!({"type": "string"}),
        ParamKind::Object => json!({"type": "object"}),
        ParamKind::ObjectList => json!({"type": "array", "items": {"type": "object"}}),
    };
    if !param.description.is_empty() {
        schema["description"] = json!(param.description);
    }
    schema
}

/// The fixed Petstore operation table, one entry per API operation.
static OPERATIONS: [OperationDescriptor; 20] = [
    OperationDescriptor {
        name: "uploadFile",
        description: "uploads an image",
        method: Method::POST,
        path: "/pet/{petId}/uploadImage",
        params: &[ParamSpec {
            name: "petId",
            location: ParamLocation::Path,
            required: true,
            kind: ParamKind::String,
            description: "ID of pet to update",
        }],
    },
    OperationDescriptor {
        name: "addPet",
        description: "Add a new pet to the store",
        method: Method::POST,
        path: "/pet",
        params: &[ParamSpec {
            name: "body",
            location: ParamLocation::Body,
            required: true,
            kind: ParamKind::Object,
            description: "Pet object that needs to be added to the store",
        }],
    },
    OperationDescriptor {
        name: "updatePet",
        description: "Update an existing pet",
        method: Method::PUT,
        path: "/pet",
        params: &[ParamSpec {
            name: "body",
            location: ParamLocation::Body,
            required: true,
            kind: ParamKind::Object,
            description: "Pet object that needs to be added to the store",
        }],
    },
    OperationDescriptor {
        name: "findPetsByStatus",
        description: "Finds Pets by status",
        method: Method::GET,
        path: "/pet/findByStatus",
        params: &[ParamSpec {
            name: "status",
            location: ParamLocation::Query,
            required: true,
            kind: ParamKind::String,
            description: "Status values that need to be considered for filter",
        }],
    },
    OperationDescriptor {
        name: "findPetsByTags",
        description: "Finds Pets by tags",
        method: Method::GET,
        path: "/pet/findByTags",
        params: &[ParamSpec {
            name: "tags",
            location: ParamLocation::Query,
            required: true,
            kind: ParamKind::String,
            description: "Tags to filter by",
        }],
    },
    OperationDescriptor {
        name: "getPetById",
        description: "Find pet by ID",
        method: Method::GET,
        path: "/pet/{petId}",
        params: &[ParamSpec {
            name: "petId",
            location: ParamLocation::Path,
            required: true,
            kind: ParamKind::String,
            description: "ID of pet to return",
        }],
    },
    OperationDescriptor {
        name: "updatePetWithForm",
        description: "Updates a pet in the store with form data",
        method: Method::POST,
        path: "/pet/{petId}",
        params: &[ParamSpec {
            name: "petId",
            location: ParamLocation::Path,
            required: true,
            kind: ParamKind::String,
            description: "ID of pet that needs to be updated",
        }],
    },
    OperationDescriptor {
        name: "deletePet",
        description: "Deletes a pet",
        method: Method::DELETE,
        path: "/pet/{petId}",
        params: &[ParamSpec {
            name: "petId",
            location: ParamLocation::Path,
            required: true,
            kind: ParamKind::String,
            description: "Pet id to delete",
        }],
    },
    OperationDescriptor {
        name: "getInventory",
        description: "Returns pet inventories by status",
        method: Method::GET,
        path: "/store/inventory",
        params: &[],
    },
    OperationDescriptor {
        name: "placeOrder",
        description: "Place an order for a pet",
        method: Method::POST,
        path: "/store/order",
        params: &[ParamSpec {
            name: "body",
            location: ParamLocation::Body,
            required: true,
            kind: ParamKind::Object,
            description: "order placed for purchasing the pet",
        }],
    },
    OperationDescriptor {
        name: "getOrderById",
        description: "Find purchase order by ID",
        method: Method::GET,
        path: "/store/order/{orderId}",
        params: &[ParamSpec {
            name: "orderId",
            location: ParamLocation::Path,
            required: true,
            kind: ParamKind::String,
            description: "ID of pet that needs to be fetched",
        }],
    },
    OperationDescriptor {
        name: "deleteOrder",
        description: "Delete purchase order by ID",
        method: Method::DELETE,
        path: "/store/order/{orderId}",
        params: &[ParamSpec {
            name: "orderId",
            location: ParamLocation::Path,
            required: true,
            kind: ParamKind::String,
            description: "ID of the order that needs to be deleted",
        }],
    },
    OperationDescriptor {
        name: "createUsersWithListInput",
        description: "Creates list of users with given input array",
        method: Method::POST,
        path: "/user/createWithList",
        params: &[ParamSpec {
            name: "body",
            location: ParamLocation::Body,
            required: true,
            kind: ParamKind::ObjectList,
            description: "List of user object",
        }],
    },
    OperationDescriptor {
        name: "getUserByName",
        description: "Get user by user name",
        method: Method::GET,
        path: "/user/{username}",
        params: &[ParamSpec {
            name: "username",
            location: ParamLocation::Path,
            required: true,
            kind: ParamKind::String,
            description: "The name that needs to be fetched. Use user1 for testing.",
        }],
    },
    OperationDescriptor {
        name: "updateUser",
        description: "Updated user",
        method: Method::PUT,
        path: "/user/{username}",
        params: &[
            ParamSpec {
                name: "username",
                location: ParamLocation::Path,
                required: true,
                kind: ParamKind::String,
                description: "name that need to be updated",
            },
            ParamSpec {
                name: "body",
                location: ParamLocation::Body,
                required: true,
                kind: ParamKind::Object,
                description: "Updated user object",
            },
        ],
    },
    OperationDescriptor {
        name: "deleteUser",
        description: "Delete user",
        method: Method::DELETE,
        path: "/user/{username}",
        params: &[ParamSpec {
            name: "username",
            location: ParamLocation::Path,
            required: true,
            kind: ParamKind::String,
            description: "The name that needs to be deleted",
        }],
    },
    OperationDescriptor {
        name: "loginUser",
        description: "Logs user into the system",
        method: Method::GET,
        path: "/user/login",
        params: &[
            ParamSpec {
                name: "username",
                location: ParamLocation::Query,
                required: true,
                kind: ParamKind::String,
                description: "The user name for login",
            },
            ParamSpec {
                name: "password",
                location: ParamLocation::Query,
                required: true,
                kind: ParamKind::String,
                description: "The password for login in clear text",
            },
        ],
    },
    OperationDescriptor {
        name: "logoutUser",
        description: "Logs out current logged in user session",
        method: Method::GET,
        path: "/user/logout",
        params: &[],
    },
    OperationDescriptor {
        name: "createUsersWithArrayInput",
        description: "Creates list of users with given input array",
        method: Method::POST,
        path: "/user/createWithArray",
        params: &[ParamSpec {
            name: "body",
            location: ParamLocation::Body,
            required: true,
            kind: ParamKind::ObjectList,
            description: "List of user object",
        }],
    },
    OperationDescriptor {
        name: "createUser",
        description: "Create user",
        method: Method::POST,
        path: "/user",
        params: &[ParamSpec {
            name: "body",
            location: ParamLocation::Body,
            required: true,
            kind: ParamKind::Object,
            description: "Created user object",
        }],
    },
];

/// Name-keyed view over a descriptor table.
#[derive(Debug)]
pub struct OperationRegistry {
    ops: &'static [OperationDescriptor],
    by_name: HashMap<&'static str, &'static OperationDescriptor>,
}

impl OperationRegistry {
    /// Build the registry over the builtin Petstore table.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the table violates a registry invariant
    /// (duplicate tool name, unmatched path placeholder, multiple body
    /// parameters). With the builtin table this cannot happen; the check
    /// runs so hand-edits fail at startup instead of mid-call.
    pub fn new() -> Result<Self> {
        Self::from_operations(&OPERATIONS)
    }

    /// Build a registry over an arbitrary static descriptor table.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error on duplicate tool names or on a descriptor
    /// whose path template and parameter list disagree.
    pub fn from_operations(ops: &'static [OperationDescriptor]) -> Result<Self> {
        let mut by_name: HashMap<&'static str, &'static OperationDescriptor> =
            HashMap::with_capacity(ops.len());

        for op in ops {
            validate_descriptor(op)?;
            if by_name.insert(op.name, op).is_some() {
                return Err(PetstoreToolsError::Config(format!(
                    "Duplicate tool name '{}' in operation registry",
                    op.name
                )));
            }
        }

        Ok(Self { ops, by_name })
    }

    /// O(1) lookup by tool name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&'static OperationDescriptor> {
        self.by_name.get(name).copied()
    }

    /// All operations in table order.
    pub fn operations(&self) -> impl Iterator<Item = &'static OperationDescriptor> {
        self.ops.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

fn validate_descriptor(op: &OperationDescriptor) -> Result<()> {
    let mut param_names: HashSet<&str> = HashSet::new();
    for param in op.params {
        if !param_names.insert(param.name) {
            return Err(PetstoreToolsError::Config(format!(
                "Duplicate parameter '{}' in operation '{}'",
                param.name, op.name
            )));
        }
    }

    let placeholders = path_placeholders(op.path)
        .map_err(|e| PetstoreToolsError::Config(format!("Operation '{}': {e}", op.name)))?;

    let path_params: HashSet<&str> = op
        .params_at(ParamLocation::Path)
        .map(|p| p.name)
        .collect();

    for placeholder in &placeholders {
        if !path_params.contains(placeholder) {
            return Err(PetstoreToolsError::Config(format!(
                "Operation '{}': path placeholder '{{{placeholder}}}' has no path parameter",
                op.name
            )));
        }
    }
    for name in &path_params {
        if !placeholders.contains(name) {
            return Err(PetstoreToolsError::Config(format!(
                "Operation '{}': path parameter '{name}' not present in '{}'",
                op.name, op.path
            )));
        }
    }

    if op.params_at(ParamLocation::Body).count() > 1 {
        return Err(PetstoreToolsError::Config(format!(
            "Operation '{}' declares more than one body parameter",
            op.name
        )));
    }

    Ok(())
}

/// Extract `{name}` placeholders from a path template, left to right.
fn path_placeholders(path: &str) -> std::result::Result<Vec<&str>, String> {
    let mut out = Vec::new();
    let mut rest = path;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            return Err(format!("unclosed '{{' in path template '{path}'"));
        };
        let name = &after[..close];
        if name.is_empty() {
            return Err(format!("empty placeholder in path template '{path}'"));
        }
        out.push(name);
        rest = &after[close + 1..];
    }
    Ok(out)
}
