//! Mapping document loader.
//!
//! The mapping document is a JSON tree whose interior nodes are output field
//! names and whose leaves declare, per supplier, where a value comes from.
//! A node is a leaf exactly when at least one of its keys carries the
//! reserved `src::` prefix:
//!
//! ```json
//! {
//!   "id": { "src::acme": "Id", "src::patagonia": "id" },
//!   "location": {
//!     "address": {
//!       "src::acme": "{{Address}}, {{PostalCode}}",
//!       "src::patagonia": "address"
//!     }
//!   }
//! }
//! ```
//!
//! Parsing validates only that the bytes are JSON and the root is an object.
//! Leaf shape is checked lazily by [`parse_leaf`] while transforming, so a
//! malformed leaf surfaces as a [`MappingError::Shape`] for the group being
//! processed instead of failing construction.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::{MappingError, MappingResult};

/// Reserved prefix marking a per-supplier source expression.
pub const SOURCE_PREFIX: &str = "src::";

/// Reserved leaf key holding the ordered action list.
pub const ACTIONS_KEY: &str = "actions";

/// Reserved leaf key holding the object-array field-alias table.
pub const FIELD_MAPPING_KEY: &str = "field_mapping";

/// Name of the top-level leaf that defines record identity.
pub const IDENTITY_FIELD: &str = "id";

/// A parsed mapping document. Immutable after construction.
#[derive(Debug, Clone)]
pub struct MappingDocument {
    root: Map<String, Value>,
}

impl MappingDocument {
    /// Parse raw mapping bytes.
    ///
    /// Fails when the bytes are not valid JSON or the top level is not an
    /// object. Deeper schema is not validated here.
    pub fn parse(bytes: &[u8]) -> MappingResult<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        match value {
            Value::Object(root) => Ok(Self { root }),
            _ => Err(MappingError::RootNotObject),
        }
    }

    /// The top-level field map.
    pub fn root(&self) -> &Map<String, Value> {
        &self.root
    }

    /// Extract the per-supplier identity paths from the top-level `id` leaf.
    ///
    /// Suppliers whose identity expression is null are omitted; their
    /// records cannot be grouped.
    pub fn identity_paths(&self) -> MappingResult<BTreeMap<String, String>> {
        let node = self
            .root
            .get(IDENTITY_FIELD)
            .and_then(Value::as_object)
            .ok_or_else(|| {
                MappingError::shape(IDENTITY_FIELD, "document has no identity leaf mapping")
            })?;

        if !is_leaf_mapping(node) {
            return Err(MappingError::shape(
                IDENTITY_FIELD,
                "identity node declares no src:: expressions",
            ));
        }

        let leaf = parse_leaf(IDENTITY_FIELD, node)?;
        Ok(leaf
            .sources
            .into_iter()
            .filter_map(|(supplier, expr)| expr.map(|e| (supplier, e)))
            .collect())
    }
}

/// True when the node declares at least one `src::` expression.
pub fn is_leaf_mapping(node: &Map<String, Value>) -> bool {
    node.keys().any(|k| k.starts_with(SOURCE_PREFIX))
}

/// A leaf mapping: per-supplier source expressions plus optional reducers.
#[derive(Debug, Clone, Default)]
pub struct LeafMapping {
    /// Supplier name -> source expression. `None` means the supplier has
    /// nothing for this field.
    pub sources: BTreeMap<String, Option<String>>,
    /// Ordered action names. Empty means the default best-value policy.
    pub actions: Vec<String>,
    /// Object-array alias table: target field -> candidate source fields,
    /// in preference order.
    pub field_aliases: BTreeMap<String, Vec<String>>,
}

/// Parse a leaf node into a [`LeafMapping`], validating reserved-key shapes.
///
/// Keys that are neither `src::`-prefixed nor reserved are ignored, matching
/// the loader's lazy stance on unknown content.
pub fn parse_leaf(path: &str, node: &Map<String, Value>) -> MappingResult<LeafMapping> {
    let mut leaf = LeafMapping::default();

    for (key, value) in node {
        if let Some(supplier) = key.strip_prefix(SOURCE_PREFIX) {
            let expr = match value {
                Value::String(s) => Some(s.clone()),
                Value::Null => None,
                _ => {
                    return Err(MappingError::shape(
                        path,
                        format!("expression for '{key}' must be a string or null"),
                    ));
                }
            };
            leaf.sources.insert(supplier.to_string(), expr);
        } else if key == ACTIONS_KEY {
            let entries = value.as_array().ok_or_else(|| {
                MappingError::shape(path, "'actions' must be an array of strings")
            })?;
            for entry in entries {
                let name = entry.as_str().ok_or_else(|| {
                    MappingError::shape(path, "'actions' must be an array of strings")
                })?;
                leaf.actions.push(name.trim().to_string());
            }
        } else if key == FIELD_MAPPING_KEY {
            let table = value.as_object().ok_or_else(|| {
                MappingError::shape(path, "'field_mapping' must be an object")
            })?;
            for (target, candidates) in table {
                let candidates = candidates.as_array().ok_or_else(|| {
                    MappingError::shape(
                        path,
                        format!("'field_mapping.{target}' must be an array of field names"),
                    )
                })?;
                let mut names = Vec::with_capacity(candidates.len());
                for candidate in candidates {
                    let name = candidate.as_str().ok_or_else(|| {
                        MappingError::shape(
                            path,
                            format!("'field_mapping.{target}' must be an array of field names"),
                        )
                    })?;
                    names.push(name.to_string());
                }
                leaf.field_aliases.insert(target.clone(), names);
            }
        }
    }

    Ok(leaf)
}
