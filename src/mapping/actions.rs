//! Action registry and built-in normalization actions.
//!
//! Actions are named, pure reducers applied at a leaf in declared order. The
//! first action in a chain consumes the collected per-supplier value map;
//! each later action consumes the previous action's output. Every action is
//! null-tolerant: fed nothing, it yields nothing.
//!
//! The registry is the extensibility axis: new actions are added with
//! [`ActionRegistry::register`] without touching the merge core.

use once_cell::sync::Lazy;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Field used to deduplicate merged image objects.
pub const IMAGE_UNIQUE_KEY: &str = "link";

/// Known spellings of hotel-wide amenities mapped to their canonical form.
///
/// Unknown spellings are discarded. `pool` is assumed to mean an outdoor
/// pool; the feeds never qualify it.
pub static GENERAL_AMENITY_VOCABULARY: &[(&str, &str)] = &[
    ("businesscenter", "business center"),
    ("business center", "business center"),
    ("gym", "gym"),
    ("outdoor pool", "outdoor pool"),
    ("indoor pool", "indoor pool"),
    ("pool", "outdoor pool"),
    ("airport shuttle", "airport shuttle"),
    ("childcare", "childcare"),
    ("wifi", "wifi"),
    ("drycleaning", "dry cleaning"),
    ("dry cleaning", "dry cleaning"),
    ("breakfast", "breakfast"),
    ("bar", "bar"),
    ("parking", "parking"),
    ("concierge", "concierge"),
];

/// Known spellings of in-room amenities mapped to their canonical form.
pub static ROOM_AMENITY_VOCABULARY: &[(&str, &str)] = &[
    ("aircon", "aircon"),
    ("tv", "tv"),
    ("coffee machine", "coffee machine"),
    ("kettle", "kettle"),
    ("hair dryer", "hair dryer"),
    ("iron", "iron"),
    ("bathtub", "bathtub"),
    ("tub", "bathtub"),
    ("minibar", "minibar"),
];

static GENERAL_LOOKUP: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| GENERAL_AMENITY_VOCABULARY.iter().copied().collect());
static ROOM_LOOKUP: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| ROOM_AMENITY_VOCABULARY.iter().copied().collect());

/// Input handed to an action.
pub enum ActionInput<'a> {
    /// The per-supplier value map, before any action has reduced it.
    Collected(&'a BTreeMap<String, Value>),
    /// The previous action's output.
    Reduced(Value),
}

impl ActionInput<'_> {
    /// Flatten the input into the values an aggregating action works over.
    fn into_values(self) -> Vec<Value> {
        match self {
            ActionInput::Collected(map) => map.values().cloned().collect(),
            ActionInput::Reduced(Value::Null) => Vec::new(),
            ActionInput::Reduced(value) => vec![value],
        }
    }
}

/// Leaf-scoped parameters available to every action.
pub struct ActionParams<'a> {
    /// Object-array alias table: target field -> candidate source fields.
    pub field_aliases: &'a BTreeMap<String, Vec<String>>,
}

/// Signature shared by all actions.
pub type ActionFn = fn(ActionInput, &ActionParams) -> Value;

/// Lookup from action name to implementation.
///
/// Built once per engine and never mutated afterwards; safe for concurrent
/// reads.
#[derive(Clone)]
pub struct ActionRegistry {
    actions: BTreeMap<String, ActionFn>,
}

impl ActionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            actions: BTreeMap::new(),
        }
    }

    /// The registry with every built-in action installed.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register("normalize_general_amenities", normalize_general_amenities);
        registry.register("normalize_room_amenities", normalize_room_amenities);
        registry.register("merge_image_arrays", merge_image_arrays);
        registry.register("to_lowercase", to_lowercase);
        registry
    }

    /// Install (or replace) an action under a name.
    pub fn register(&mut self, name: impl Into<String>, action: ActionFn) {
        self.actions.insert(name.into(), action);
    }

    /// Look up an action by name.
    pub fn get(&self, name: &str) -> Option<ActionFn> {
        self.actions.get(name).copied()
    }

    /// Registered action names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

// =============================================================================
// Built-in actions
// =============================================================================

fn normalize_general_amenities(input: ActionInput, _params: &ActionParams) -> Value {
    normalize_amenities(input, &GENERAL_LOOKUP)
}

fn normalize_room_amenities(input: ActionInput, _params: &ActionParams) -> Value {
    normalize_amenities(input, &ROOM_LOOKUP)
}

/// Merge string arrays across suppliers, case-fold each item, and keep only
/// canonical vocabulary terms, deduplicated in first-occurrence order.
fn normalize_amenities(input: ActionInput, vocabulary: &HashMap<&str, &str>) -> Value {
    let merged = merge_lists(input.into_values());

    let mut seen = HashSet::new();
    let mut canonical = Vec::new();
    for item in merged {
        if let Value::String(s) = item {
            if let Some(&term) = vocabulary.get(s.to_lowercase().as_str()) {
                if seen.insert(term) {
                    canonical.push(Value::String(term.to_string()));
                }
            }
        }
    }

    Value::Array(canonical)
}

/// Merge arrays of objects across suppliers: normalize each object through
/// the leaf's field-alias table, then deduplicate by [`IMAGE_UNIQUE_KEY`],
/// first occurrence winning.
fn merge_image_arrays(input: ActionInput, params: &ActionParams) -> Value {
    let mut seen = HashSet::new();
    let mut merged = Vec::new();

    for value in input.into_values() {
        let Value::Array(items) = value else { continue };
        for item in items {
            let Value::Object(object) = item else { continue };
            let normalized = normalize_object(&object, params.field_aliases);
            let Some(Value::String(identifier)) = normalized.get(IMAGE_UNIQUE_KEY) else {
                continue;
            };
            if !identifier.is_empty() && seen.insert(identifier.clone()) {
                merged.push(Value::Object(normalized));
            }
        }
    }

    Value::Array(merged)
}

/// Lowercase a string, or every string inside an array; other types pass
/// through unchanged. Declared first in a chain there is nothing to reduce
/// yet, so the result is null.
fn to_lowercase(input: ActionInput, _params: &ActionParams) -> Value {
    match input {
        ActionInput::Collected(_) => Value::Null,
        ActionInput::Reduced(value) => lowercase_value(value),
    }
}

fn lowercase_value(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.to_lowercase()),
        Value::Array(items) => Value::Array(items.into_iter().map(lowercase_value).collect()),
        other => other,
    }
}

// =============================================================================
// Merge/dedup helpers
// =============================================================================

/// Concatenate the per-supplier values into one list, flattening arrays and
/// deduplicating by each element's string form, first occurrence preserved.
fn merge_lists(values: Vec<Value>) -> Vec<Value> {
    fn push_unique(item: Value, seen: &mut HashSet<String>, merged: &mut Vec<Value>) {
        let key = item.to_string();
        if seen.insert(key) {
            merged.push(item);
        }
    }

    let mut seen = HashSet::new();
    let mut merged = Vec::new();

    for value in values {
        match value {
            Value::Array(items) => {
                for item in items {
                    push_unique(item, &mut seen, &mut merged);
                }
            }
            Value::Null => {}
            scalar => push_unique(scalar, &mut seen, &mut merged),
        }
    }

    merged
}

/// Rewrite an object through the field-alias table: for each target field,
/// copy the first candidate whose value is a non-empty string, trimmed.
fn normalize_object(
    object: &Map<String, Value>,
    field_aliases: &BTreeMap<String, Vec<String>>,
) -> Map<String, Value> {
    let mut normalized = Map::new();

    for (target, candidates) in field_aliases {
        for candidate in candidates {
            if let Some(Value::String(s)) = object.get(candidate) {
                let trimmed = s.trim();
                if !trimmed.is_empty() {
                    normalized.insert(target.clone(), Value::String(trimmed.to_string()));
                    break;
                }
            }
        }
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn collected(entries: &[(&str, Value)]) -> BTreeMap<String, Value> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn no_params() -> BTreeMap<String, Vec<String>> {
        BTreeMap::new()
    }

    fn as_string_set(value: &Value) -> HashSet<String> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_general_amenities_merge_and_normalize() {
        let values = collected(&[
            ("s1", json!(["WiFi", "BusinessCenter", "gym"])),
            ("s3", json!(["outdoor pool", "GYM"])),
        ]);
        let aliases = no_params();
        let params = ActionParams { field_aliases: &aliases };

        let result = normalize_general_amenities(ActionInput::Collected(&values), &params);
        let expected: HashSet<String> = ["wifi", "business center", "outdoor pool", "gym"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(as_string_set(&result), expected);
    }

    #[test]
    fn test_room_amenities_discard_unknown_and_collapse() {
        let values = collected(&[
            ("s1", json!(["Aircon", "Tv", "gym"])),
            ("s2", json!(["Aircon", "Tv", "Tub"])),
            ("s3", json!(["outdoor pool", "BathTub"])),
        ]);
        let aliases = no_params();
        let params = ActionParams { field_aliases: &aliases };

        let result = normalize_room_amenities(ActionInput::Collected(&values), &params);
        let expected: HashSet<String> = ["aircon", "tv", "bathtub"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        // gym and outdoor pool are not room vocabulary; tub collapses to bathtub.
        assert_eq!(as_string_set(&result), expected);
    }

    #[test]
    fn test_pool_collapses_to_outdoor_pool() {
        let values = collected(&[("s1", json!(["Pool"]))]);
        let aliases = no_params();
        let params = ActionParams { field_aliases: &aliases };

        let result = normalize_general_amenities(ActionInput::Collected(&values), &params);
        assert_eq!(result, json!(["outdoor pool"]));
    }

    #[test]
    fn test_amenities_tolerate_scalar_and_null_input() {
        let values = collected(&[("s1", json!("wifi")), ("s2", Value::Null)]);
        let aliases = no_params();
        let params = ActionParams { field_aliases: &aliases };

        let result = normalize_general_amenities(ActionInput::Collected(&values), &params);
        assert_eq!(result, json!(["wifi"]));

        let empty = normalize_general_amenities(ActionInput::Reduced(Value::Null), &params);
        assert_eq!(empty, json!([]));
    }

    #[test]
    fn test_merge_image_arrays_aliases_and_dedupe() {
        let values = collected(&[
            (
                "s2",
                json!([
                    { "url": "http://img/1.jpg", "description": "Double room" },
                    { "url": "http://img/2.jpg", "description": "Lobby" }
                ]),
            ),
            (
                "s3",
                json!([
                    { "link": "http://img/1.jpg", "caption": "Twin room" },
                    { "link": "http://img/3.jpg", "caption": "Pool deck" }
                ]),
            ),
        ]);
        let aliases: BTreeMap<String, Vec<String>> = [
            ("link".to_string(), vec!["url".to_string(), "link".to_string()]),
            (
                "description".to_string(),
                vec!["description".to_string(), "caption".to_string()],
            ),
        ]
        .into_iter()
        .collect();
        let params = ActionParams { field_aliases: &aliases };

        let result = merge_image_arrays(ActionInput::Collected(&values), &params);
        let items = result.as_array().unwrap();
        assert_eq!(items.len(), 3);

        let links: HashSet<String> = items
            .iter()
            .map(|i| i["link"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(links.len(), 3);

        // First visited wins for a duplicated link.
        let first = items
            .iter()
            .find(|i| i["link"] == "http://img/1.jpg")
            .unwrap();
        assert_eq!(first["description"], "Double room");
    }

    #[test]
    fn test_merge_image_arrays_drops_objects_without_identifier() {
        let values = collected(&[(
            "s2",
            json!([{ "description": "no link" }, { "url": "  ", "description": "blank" }]),
        )]);
        let aliases: BTreeMap<String, Vec<String>> =
            [("link".to_string(), vec!["url".to_string()])].into_iter().collect();
        let params = ActionParams { field_aliases: &aliases };

        let result = merge_image_arrays(ActionInput::Collected(&values), &params);
        assert_eq!(result, json!([]));
    }

    #[test]
    fn test_to_lowercase() {
        let aliases = no_params();
        let params = ActionParams { field_aliases: &aliases };

        assert_eq!(
            to_lowercase(ActionInput::Reduced(json!("WiFi")), &params),
            json!("wifi")
        );
        assert_eq!(
            to_lowercase(ActionInput::Reduced(json!(["Gym", "BAR", 3])), &params),
            json!(["gym", "bar", 3])
        );
        assert_eq!(
            to_lowercase(ActionInput::Reduced(json!(true)), &params),
            json!(true)
        );

        // First in a chain there is nothing to reduce yet.
        let values = collected(&[("s1", json!("WiFi"))]);
        assert_eq!(
            to_lowercase(ActionInput::Collected(&values), &params),
            Value::Null
        );
    }

    #[test]
    fn test_merge_lists_first_occurrence_wins() {
        let merged = merge_lists(vec![json!(["a", "b"]), json!(["b", "c"]), json!("a")]);
        assert_eq!(merged, vec![json!("a"), json!("b"), json!("c")]);
    }

    #[test]
    fn test_registry_lookup_and_extension() {
        let mut registry = ActionRegistry::builtin();
        assert!(registry.get("normalize_general_amenities").is_some());
        assert!(registry.get("nope").is_none());

        fn first_value(input: ActionInput, _params: &ActionParams) -> Value {
            match input {
                ActionInput::Collected(map) => {
                    map.values().next().cloned().unwrap_or(Value::Null)
                }
                ActionInput::Reduced(value) => value,
            }
        }

        registry.register("first_value", first_value);
        assert!(registry.get("first_value").is_some());
        assert_eq!(registry.names().count(), 5);
    }
}
