//! # hotels-merge - supplier feed merging and normalization
//!
//! hotels-merge ingests hotel records from independent supplier feeds, each
//! with its own JSON shape and naming convention, and merges them into one
//! deduplicated, normalized catalog served over a small read-only HTTP API.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌─────────────┐     ┌──────────┐
//! │  Supplier   │────▶│   Mapping    │────▶│   Catalog   │────▶│  HTTP    │
//! │  feeds      │     │   engine     │     │   store     │     │  API     │
//! │  (reqwest)  │     │  (merge/norm)│     │  (in-mem)   │     │  (axum)  │
//! └─────────────┘     └──────────────┘     └─────────────┘     └──────────┘
//! ```
//!
//! The engine is driven entirely by a declarative mapping document: per
//! output field it names where the value comes from in each supplier, which
//! actions normalize it, and how object arrays are aliased. New suppliers
//! and fields are a mapping change, not a code change.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hotels_merge::mapping::MappingEngine;
//!
//! let engine = MappingEngine::new(&std::fs::read("mapping.json")?)?;
//! let outcome = engine.transform(&payloads)?;
//! println!("{}", outcome.summary());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - hierarchical error types
//! - [`models`] - wire-contract structs (Hotel, Location, Amenities, Images)
//! - [`mapping`] - the configuration-driven merge engine
//! - [`store`] - in-memory catalog store
//! - [`suppliers`] - supplier feeds and fetch fan-out
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod models;

// Merge engine
pub mod mapping;

// Catalog
pub mod store;

// Upstream feeds
pub mod suppliers;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{EngineError, MappingError, ServerError, SupplierError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Amenities, Hotel, ImageLink, Images, Location};

// =============================================================================
// Re-exports - Mapping engine
// =============================================================================

pub use mapping::{ActionRegistry, MappingDocument, MappingEngine, TransformOutcome};

// =============================================================================
// Re-exports - Catalog store
// =============================================================================

pub use store::HotelStore;

// =============================================================================
// Re-exports - Suppliers
// =============================================================================

pub use suppliers::{fetch_all, fetch_and_merge, load_suppliers, Supplier};
