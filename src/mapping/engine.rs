//! The mapping engine: construct once, transform many times.
//!
//! # Architecture
//!
//! ```text
//! supplier payloads ──▶ group by identity ──▶ per group: walk mapping tree
//!                                               │  leaf: collect + reduce
//!                                               ▼
//!                                        nested output object
//! ```
//!
//! A transform is pure computation over the payloads it is handed: the
//! engine never touches the network or the filesystem, and the parsed
//! mapping document, action registry, and vocabulary tables are immutable
//! after construction, so one engine is safe to share across threads.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::warn;

use super::actions::ActionRegistry;
use super::document::{is_leaf_mapping, parse_leaf, MappingDocument};
use super::group::{group_by_identity, RecordGroup};
use super::resolve::resolve_leaf;
use crate::error::{EngineError, EngineResult, MappingResult};

/// Configuration-driven merge engine over supplier payloads.
pub struct MappingEngine {
    document: MappingDocument,
    registry: ActionRegistry,
}

/// Result of one transform: merged records plus per-group diagnostics.
#[derive(Debug)]
pub struct TransformOutcome {
    /// One merged record per distinct identity, in identity order.
    pub records: Vec<Value>,
    /// Groups dropped because a leaf mapping turned out to be malformed.
    pub skipped: Vec<SkippedGroup>,
}

/// A record group that could not be processed.
#[derive(Debug, Clone)]
pub struct SkippedGroup {
    pub identity: String,
    pub reason: String,
}

impl TransformOutcome {
    /// Summary statistics for log lines.
    pub fn summary(&self) -> String {
        format!(
            "merged {} records, {} groups skipped",
            self.records.len(),
            self.skipped.len()
        )
    }
}

impl MappingEngine {
    /// Construct an engine from raw mapping-document bytes.
    ///
    /// Fails when the bytes are not valid JSON or the top level is not an
    /// object; deeper leaf shapes are validated lazily during transforms.
    pub fn new(mapping_bytes: &[u8]) -> MappingResult<Self> {
        Ok(Self {
            document: MappingDocument::parse(mapping_bytes)?,
            registry: ActionRegistry::builtin(),
        })
    }

    /// Replace the action registry, e.g. to install custom actions.
    pub fn with_registry(mut self, registry: ActionRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Merge the supplier payloads into one record per identity.
    ///
    /// A group whose processing hits a malformed leaf is skipped with a
    /// warning; other groups proceed. Payload-level faults
    /// (non-array payload, supplier missing from the `id` leaf) fail the
    /// whole transform.
    pub fn transform(
        &self,
        payloads: &BTreeMap<String, Vec<u8>>,
    ) -> EngineResult<TransformOutcome> {
        let groups = group_by_identity(&self.document, payloads)?;

        let mut outcome = TransformOutcome {
            records: Vec::with_capacity(groups.len()),
            skipped: Vec::new(),
        };

        for (identity, group) in groups {
            match self.merge_group(&group) {
                Ok(record) => outcome.records.push(Value::Object(record)),
                Err(err) => {
                    warn!(identity = identity.as_str(), error = %err, "skipping record group");
                    outcome.skipped.push(SkippedGroup {
                        identity,
                        reason: err.to_string(),
                    });
                }
            }
        }

        Ok(outcome)
    }

    /// [`Self::transform`], serialized to a JSON array.
    pub fn transform_bytes(
        &self,
        payloads: &BTreeMap<String, Vec<u8>>,
    ) -> EngineResult<Vec<u8>> {
        let outcome = self.transform(payloads)?;
        serde_json::to_vec(&outcome.records).map_err(EngineError::Encode)
    }

    /// Walk the whole mapping tree for one record group.
    fn merge_group(&self, group: &RecordGroup) -> MappingResult<Map<String, Value>> {
        let mut record = Map::new();
        self.walk("", self.document.root(), group, &mut record)?;
        Ok(record)
    }

    /// Depth-first walk. Leaves resolve and write at the accumulated dotted
    /// path; interior nodes recurse. Non-object children of interior nodes
    /// carry no source expressions and are ignored.
    fn walk(
        &self,
        prefix: &str,
        node: &Map<String, Value>,
        group: &RecordGroup,
        out: &mut Map<String, Value>,
    ) -> MappingResult<()> {
        if is_leaf_mapping(node) {
            let leaf = parse_leaf(prefix, node)?;
            let value = resolve_leaf(&leaf, group, &self.registry);
            if !is_empty(&value) {
                insert_nested(out, prefix, value);
            }
            return Ok(());
        }

        for (key, child) in node {
            if let Value::Object(child_node) = child {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                self.walk(&path, child_node, group, out)?;
            }
        }

        Ok(())
    }
}

/// Null, blank strings, and empty collections are omitted from the output.
fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}

/// Write a value at a dotted path, creating intermediate objects.
///
/// A path conflict (an intermediate step already holds a non-object value)
/// skips the write; it indicates a malformed mapping and surfaces upstream
/// only if something downstream fails because of it.
fn insert_nested(out: &mut Map<String, Value>, path: &str, value: Value) {
    if path.is_empty() {
        return;
    }

    let mut parts: Vec<&str> = path.split('.').collect();
    let Some(last) = parts.pop() else { return };

    let mut current = out;
    for part in parts {
        let entry = current
            .entry(part.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        match entry.as_object_mut() {
            Some(next) => current = next,
            None => return,
        }
    }

    current.insert(last.to_string(), value);
}
