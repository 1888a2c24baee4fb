//! Supplier feeds and the HTTP fetch fan-out.
//!
//! Each supplier is one upstream JSON feed. A refresh fans out one GET per
//! supplier; a supplier that fails to fetch is logged and dropped from the
//! run, so the merge proceeds on a partial catalog. No retries.

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::{EngineError, EngineResult, SupplierError};
use crate::mapping::MappingEngine;
use crate::models::Hotel;

/// Per-request timeout for supplier fetches.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// An upstream feed of hotel records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    pub name: String,
    pub url: String,
}

impl Supplier {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// The built-in supplier list.
    pub fn defaults() -> Vec<Supplier> {
        vec![
            Supplier::new(
                "acme",
                "https://5f2be0b4ffc88500167b85a0.mockapi.io/suppliers/acme",
            ),
            Supplier::new(
                "patagonia",
                "https://5f2be0b4ffc88500167b85a0.mockapi.io/suppliers/patagonia",
            ),
            Supplier::new(
                "paperflies",
                "https://5f2be0b4ffc88500167b85a0.mockapi.io/suppliers/paperflies",
            ),
        ]
    }
}

/// Load the supplier list from a JSON file, falling back to the defaults
/// when the file is absent or unreadable.
pub fn load_suppliers(path: &Path) -> Vec<Supplier> {
    match std::fs::read(path) {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(suppliers) => suppliers,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignoring malformed supplier file");
                Supplier::defaults()
            }
        },
        Err(_) => Supplier::defaults(),
    }
}

/// Fetch every supplier concurrently; failed suppliers are dropped.
pub async fn fetch_all(suppliers: &[Supplier]) -> BTreeMap<String, Vec<u8>> {
    let client = reqwest::Client::new();

    let fetches = suppliers.iter().map(|supplier| {
        let client = client.clone();
        async move { (supplier.name.clone(), fetch_one(&client, supplier).await) }
    });

    let mut payloads = BTreeMap::new();
    for (name, result) in join_all(fetches).await {
        match result {
            Ok(bytes) => {
                payloads.insert(name, bytes);
            }
            Err(err) => warn!(error = %err, "dropping supplier from this refresh"),
        }
    }

    payloads
}

async fn fetch_one(client: &reqwest::Client, supplier: &Supplier) -> Result<Vec<u8>, SupplierError> {
    let fetch_err = |message: String| SupplierError::Fetch {
        name: supplier.name.clone(),
        message,
    };

    let response = client
        .get(&supplier.url)
        .timeout(FETCH_TIMEOUT)
        .send()
        .await
        .map_err(|e| fetch_err(e.to_string()))?;

    if !response.status().is_success() {
        return Err(fetch_err(format!("unexpected status {}", response.status())));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| fetch_err(e.to_string()))?;
    Ok(bytes.to_vec())
}

/// Fetch all feeds and merge them into wire-contract records.
pub async fn fetch_and_merge(
    engine: &MappingEngine,
    suppliers: &[Supplier],
) -> EngineResult<Vec<Hotel>> {
    let payloads = fetch_all(suppliers).await;
    info!(
        fetched = payloads.len(),
        configured = suppliers.len(),
        "supplier fetch complete"
    );

    let outcome = engine.transform(&payloads)?;
    info!("{}", outcome.summary());

    serde_json::from_value(serde_json::Value::Array(outcome.records)).map_err(EngineError::Encode)
}
