//! Path and template evaluation over raw supplier JSON.
//!
//! A source expression is either a dotted path (`location.country`) read
//! against a single record, or a template containing `{{path}}` placeholders
//! whose resolved values are substituted in order. Templates always yield a
//! string; paths yield the typed JSON value at that location or null when
//! absent.
//!
//! No wildcards, filters, or array indices: mapping documents only ever walk
//! object keys.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Number, Value};

static TEMPLATE_VAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^}]+)\}\}").expect("placeholder pattern compiles"));
static REPEATED_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*,\s*,\s*").expect("comma-run pattern compiles"));
static EDGE_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^,\s*|,\s*$").expect("edge-comma pattern compiles"));

/// True iff the expression contains both `{{` and `}}`.
pub fn is_template(expression: &str) -> bool {
    expression.contains("{{") && expression.contains("}}")
}

/// Evaluate a source expression against one record.
///
/// Returns [`Value::Null`] when a dotted path is absent; a template always
/// yields a string (placeholders that miss resolve to the empty string).
pub fn extract(record: &Value, expression: &str) -> Value {
    if is_template(expression) {
        return Value::String(render_template(record, expression));
    }

    match walk_path(record, expression) {
        Some(value) => coerce_number(value.clone()),
        None => Value::Null,
    }
}

/// Substitute every `{{path}}` placeholder, then apply the cleanup rules:
/// trim, collapse comma runs to `", "`, strip a leading or trailing comma.
pub fn render_template(record: &Value, template: &str) -> String {
    let substituted = TEMPLATE_VAR.replace_all(template, |caps: &regex::Captures| {
        walk_path(record, &caps[1])
            .map(value_to_string)
            .unwrap_or_default()
    });

    let trimmed = substituted.trim();
    let collapsed = REPEATED_COMMA.replace_all(trimmed, ", ");
    EDGE_COMMA.replace_all(&collapsed, "").into_owned()
}

/// Follow a dotted key path through nested objects.
fn walk_path<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = record;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Report integral floating-point numbers as integers (`2.0` becomes `2`).
fn coerce_number(value: Value) -> Value {
    if let Value::Number(ref n) = value {
        if n.is_f64() {
            if let Some(f) = n.as_f64() {
                if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                    return Value::Number(Number::from(f as i64));
                }
            }
        }
    }
    value
}

/// String form used for template substitution.
fn value_to_string(value: &Value) -> String {
    match coerce_number(value.clone()) {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        composite => composite.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_template() {
        assert!(is_template("{{Address}}, {{PostalCode}}"));
        assert!(!is_template("location.address"));
        assert!(!is_template("{{unclosed"));
    }

    #[test]
    fn test_extract_nested_path() {
        let record = json!({ "location": { "country": "Singapore" } });
        assert_eq!(extract(&record, "location.country"), json!("Singapore"));
        assert_eq!(extract(&record, "location.city"), Value::Null);
        assert_eq!(extract(&record, "missing.path"), Value::Null);
    }

    #[test]
    fn test_extract_typed_values() {
        let record = json!({
            "count": 2.0,
            "lat": 1.264751,
            "open": true,
            "tags": ["wifi", "pool"]
        });

        // Integral floats are reported as integers.
        assert_eq!(extract(&record, "count"), json!(2));
        assert_eq!(extract(&record, "lat"), json!(1.264751));
        assert_eq!(extract(&record, "open"), json!(true));
        assert_eq!(extract(&record, "tags"), json!(["wifi", "pool"]));
    }

    #[test]
    fn test_template_substitution() {
        let record = json!({ "Address": "123 Main St", "PostalCode": "12345" });
        assert_eq!(
            extract(&record, "{{Address}}, {{PostalCode}}"),
            json!("123 Main St, 12345")
        );
    }

    #[test]
    fn test_template_missing_placeholder_is_cleaned() {
        let record = json!({ "Address": "123 Main St" });
        // Trailing comma left by the empty placeholder is stripped.
        assert_eq!(
            extract(&record, "{{Address}}, {{PostalCode}}"),
            json!("123 Main St")
        );
    }

    #[test]
    fn test_template_comma_run_collapses() {
        let record = json!({ "a": "x", "c": "y" });
        assert_eq!(extract(&record, "{{a}}, {{b}}, {{c}}"), json!("x, y"));
    }

    #[test]
    fn test_template_all_placeholders_missing() {
        let record = json!({});
        assert_eq!(extract(&record, "{{a}}, {{b}}"), json!(""));
    }

    #[test]
    fn test_template_numeric_substitution() {
        let record = json!({ "street": "Sukhumvit", "number": 8.0 });
        assert_eq!(
            extract(&record, "{{number}} {{street}}"),
            json!("8 Sukhumvit")
        );
    }
}
