//! Query and response types for the read-only catalog API.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ServerError;

/// Query parameters accepted by `GET /hotels`.
///
/// `ids` and `destination_ids` are mutually exclusive; with neither, the
/// endpoint returns the full catalog.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct HotelsQuery {
    /// Comma-separated hotel identifiers.
    pub ids: Option<String>,
    /// Comma-separated destination identifiers.
    pub destination_ids: Option<String>,
}

/// JSON error body.
pub fn error_response(message: &str) -> Value {
    json!({ "error": message })
}

/// Split a comma-separated identifier list, trimming entries and dropping
/// empty ones.
pub fn parse_id_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Parse a comma-separated list of destination identifiers.
pub fn parse_destination_list(raw: &str) -> Result<Vec<i64>, ServerError> {
    parse_id_list(raw)
        .iter()
        .map(|entry| {
            entry
                .parse::<i64>()
                .map_err(|_| ServerError::BadRequest(format!("invalid destination_id '{entry}'")))
        })
        .collect()
}
