//! Grouping of supplier payloads by record identity.
//!
//! Each supplier payload must decode as a JSON array of records. Every
//! record's identity is read through that supplier's expression on the
//! top-level `id` leaf; records sharing an identity across suppliers form
//! one [`RecordGroup`] and merge into one output record.
//!
//! Identity strings compare by exact value. Records with an absent or empty
//! identity are skipped with a warning.

use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

use super::document::MappingDocument;
use super::path::extract;
use crate::error::{EngineResult, MappingError, SupplierError};

/// One identity's records, keyed by supplier name.
pub type RecordGroup = BTreeMap<String, Value>;

/// Decode every supplier payload and group records by identity.
///
/// Fails with [`SupplierError::NotAnArray`] when a payload is not a JSON
/// array, and with [`MappingError::Shape`] when a supplier present in the
/// input has no identity expression in the mapping document.
pub fn group_by_identity(
    document: &MappingDocument,
    payloads: &BTreeMap<String, Vec<u8>>,
) -> EngineResult<BTreeMap<String, RecordGroup>> {
    let identity_paths = document.identity_paths()?;
    let mut groups: BTreeMap<String, RecordGroup> = BTreeMap::new();

    for (supplier, bytes) in payloads {
        let records = serde_json::from_slice::<Value>(bytes)
            .ok()
            .and_then(|v| match v {
                Value::Array(records) => Some(records),
                _ => None,
            })
            .ok_or_else(|| SupplierError::NotAnArray(supplier.clone()))?;

        let id_path = identity_paths.get(supplier).ok_or_else(|| {
            MappingError::shape(
                super::document::IDENTITY_FIELD,
                format!("no identity expression for supplier '{supplier}'"),
            )
        })?;

        for record in records {
            let identity = match extract(&record, id_path) {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                _ => String::new(),
            };

            if identity.is_empty() {
                warn!(supplier = supplier.as_str(), "record has no identity, skipping");
                continue;
            }

            groups.entry(identity).or_default().insert(supplier.clone(), record);
        }
    }

    Ok(groups)
}
