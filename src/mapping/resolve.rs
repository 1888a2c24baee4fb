//! Leaf resolution: collect per-supplier values, then reduce them.
//!
//! Collection evaluates each supplier's source expression against that
//! supplier's record in the group, keeping non-null results. Reduction
//! either pipes the collected map through the leaf's declared action chain
//! or falls back to the default best-value policy.

use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

use super::actions::{ActionInput, ActionParams, ActionRegistry};
use super::document::LeafMapping;
use super::group::RecordGroup;
use super::path::extract;

/// Resolve one leaf for one record group.
pub fn resolve_leaf(
    leaf: &LeafMapping,
    group: &RecordGroup,
    registry: &ActionRegistry,
) -> Value {
    let values = collect(leaf, group);

    if leaf.actions.is_empty() {
        best_value(&values)
    } else {
        apply_actions(leaf, &values, registry)
    }
}

/// Evaluate every supplier expression, keeping non-null results keyed by
/// supplier name. Suppliers absent from the group, null expressions, and
/// extraction misses all contribute nothing.
fn collect(leaf: &LeafMapping, group: &RecordGroup) -> BTreeMap<String, Value> {
    let mut values = BTreeMap::new();

    for (supplier, expression) in &leaf.sources {
        let Some(expression) = expression else { continue };
        let Some(record) = group.get(supplier) else { continue };

        let value = extract(record, expression);
        if !value.is_null() {
            values.insert(supplier.clone(), value);
        }
    }

    values
}

/// Pipe the collected values through the action chain in declared order.
///
/// The first resolvable action consumes the value map; later ones consume
/// the previous output. Unknown action names are logged and skipped, and a
/// chain that never produces anything yields null.
fn apply_actions(
    leaf: &LeafMapping,
    values: &BTreeMap<String, Value>,
    registry: &ActionRegistry,
) -> Value {
    let params = ActionParams {
        field_aliases: &leaf.field_aliases,
    };

    let mut current: Option<Value> = None;
    for name in &leaf.actions {
        let Some(action) = registry.get(name) else {
            warn!(action = name.as_str(), "unknown action, skipping");
            continue;
        };

        let input = match current.take() {
            None => ActionInput::Collected(values),
            Some(previous) => ActionInput::Reduced(previous),
        };
        current = Some(action(input, &params));
    }

    current.unwrap_or(Value::Null)
}

/// Default best-value policy.
///
/// If any collected value is a non-empty string after trimming, return the
/// longest trimmed string by character count. Otherwise return the first
/// non-null value in supplier-name order, or null when nothing qualifies.
/// Longest wins on free text because suppliers differ mostly in how much
/// detail they include.
fn best_value(values: &BTreeMap<String, Value>) -> Value {
    let longest = values
        .values()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .max_by_key(|s| s.chars().count());

    if let Some(s) = longest {
        return Value::String(s.to_string());
    }

    values
        .values()
        .find(|v| !v.is_null())
        .cloned()
        .unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::document::parse_leaf;
    use serde_json::json;

    fn leaf(value: Value) -> LeafMapping {
        parse_leaf("test", value.as_object().unwrap()).unwrap()
    }

    fn group(entries: &[(&str, Value)]) -> RecordGroup {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_collect_skips_absent_suppliers_and_nulls() {
        let leaf = leaf(json!({
            "src::s1": "name",
            "src::s2": "name",
            "src::s3": null
        }));
        let group = group(&[
            ("s1", json!({ "name": "Hilton" })),
            ("s3", json!({ "name": "ignored, expression is null" })),
        ]);

        let values = collect(&leaf, &group);
        assert_eq!(values.len(), 1);
        assert_eq!(values["s1"], json!("Hilton"));
    }

    #[test]
    fn test_best_value_longest_string() {
        let leaf = leaf(json!({
            "src::s1": "{{Address}}, {{PostalCode}}",
            "src::s2": "address"
        }));
        let group = group(&[
            ("s1", json!({ "Address": "123 Main St", "PostalCode": "12345" })),
            ("s2", json!({ "address": "456 Oak Ave" })),
        ]);

        let resolved = resolve_leaf(&leaf, &group, &ActionRegistry::builtin());
        assert_eq!(resolved, json!("123 Main St, 12345"));
    }

    #[test]
    fn test_best_value_trims_before_comparing() {
        let leaf = leaf(json!({ "src::s1": "a", "src::s2": "a" }));
        let group = group(&[
            ("s1", json!({ "a": "  padded out   " })),
            ("s2", json!({ "a": "longer unpadded" })),
        ]);

        let resolved = resolve_leaf(&leaf, &group, &ActionRegistry::builtin());
        assert_eq!(resolved, json!("longer unpadded"));
    }

    #[test]
    fn test_best_value_first_non_null_for_non_strings() {
        let leaf = leaf(json!({ "src::s1": "lat", "src::s2": "lat" }));
        let group = group(&[
            ("s1", json!({ "lat": 1.264751 })),
            ("s2", json!({ "lat": 35.6926 })),
        ]);

        // Supplier-name order decides when no strings are present.
        let resolved = resolve_leaf(&leaf, &group, &ActionRegistry::builtin());
        assert_eq!(resolved, json!(1.264751));
    }

    #[test]
    fn test_best_value_string_branch_beats_scalars() {
        let leaf = leaf(json!({ "src::s1": "v", "src::s2": "v" }));
        let group = group(&[("s1", json!({ "v": 10 })), ("s2", json!({ "v": "ten" }))]);

        let resolved = resolve_leaf(&leaf, &group, &ActionRegistry::builtin());
        assert_eq!(resolved, json!("ten"));
    }

    #[test]
    fn test_resolves_null_when_nothing_collected() {
        let leaf = leaf(json!({ "src::s1": "missing.path" }));
        let group = group(&[("s1", json!({ "name": "x" }))]);

        let resolved = resolve_leaf(&leaf, &group, &ActionRegistry::builtin());
        assert_eq!(resolved, Value::Null);
    }

    #[test]
    fn test_action_chain_runs_in_declared_order() {
        let leaf = leaf(json!({
            "src::s1": "amenities",
            "actions": ["normalize_room_amenities", "to_lowercase"]
        }));
        let group = group(&[("s1", json!({ "amenities": ["TV", "Tub"] }))]);

        let resolved = resolve_leaf(&leaf, &group, &ActionRegistry::builtin());
        let items: Vec<&str> = resolved
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert!(items.contains(&"tv"));
        assert!(items.contains(&"bathtub"));
    }

    #[test]
    fn test_unknown_action_is_a_no_op() {
        let leaf = leaf(json!({
            "src::s1": "amenities",
            "actions": ["does_not_exist", "normalize_room_amenities"]
        }));
        let group = group(&[("s1", json!({ "amenities": ["tv"] }))]);

        let resolved = resolve_leaf(&leaf, &group, &ActionRegistry::builtin());
        assert_eq!(resolved, json!(["tv"]));
    }

    #[test]
    fn test_chain_of_only_unknown_actions_yields_null() {
        let leaf = leaf(json!({ "src::s1": "name", "actions": ["nope"] }));
        let group = group(&[("s1", json!({ "name": "Hilton" }))]);

        let resolved = resolve_leaf(&leaf, &group, &ActionRegistry::builtin());
        assert_eq!(resolved, Value::Null);
    }
}
