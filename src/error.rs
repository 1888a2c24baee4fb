//! Error types for the hotels-merge pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`MappingError`] - mapping document parse/shape errors
//! - [`SupplierError`] - supplier payload and fetch errors
//! - [`EngineError`] - top-level transform errors
//! - [`ServerError`] - HTTP surface errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Mapping Document Errors
// =============================================================================

/// Errors raised by the mapping document.
///
/// `Parse` and `RootNotObject` are fatal at engine construction. `Shape` is
/// detected lazily while transforming and only skips the record group being
/// processed.
#[derive(Debug, Error)]
pub enum MappingError {
    /// Mapping bytes are not valid JSON.
    #[error("invalid mapping JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Mapping document top level is not an object.
    #[error("mapping document root must be a JSON object")]
    RootNotObject,

    /// A leaf mapping is malformed (wrong type for an expression,
    /// `actions`, or `field_mapping` entry).
    #[error("malformed leaf mapping at '{path}': {message}")]
    Shape { path: String, message: String },
}

impl MappingError {
    /// Shorthand for a shape error at a given output path.
    pub fn shape(path: impl Into<String>, message: impl Into<String>) -> Self {
        MappingError::Shape {
            path: path.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// Supplier Errors
// =============================================================================

/// Errors raised while handling a single supplier.
#[derive(Debug, Error)]
pub enum SupplierError {
    /// Payload did not decode as a JSON array.
    #[error("supplier '{0}' payload is not a JSON array")]
    NotAnArray(String),

    /// HTTP fetch failed (non-2xx status or transport error). Isolated to
    /// the one supplier; the merge proceeds on whatever was fetched.
    #[error("failed to fetch supplier '{name}': {message}")]
    Fetch { name: String, message: String },
}

// =============================================================================
// Engine Errors (top-level)
// =============================================================================

/// Top-level errors returned by [`crate::mapping::MappingEngine::transform`].
#[derive(Debug, Error)]
pub enum EngineError {
    /// Mapping document error.
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// Supplier payload error.
    #[error(transparent)]
    Supplier(#[from] SupplierError),

    /// Merged records failed to serialize or decode into the wire structs.
    #[error("failed to encode merged records: {0}")]
    Encode(serde_json::Error),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP surface errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Client supplied conflicting or invalid query parameters.
    #[error("invalid request: {0}")]
    BadRequest(String),

    /// Anything that is not the client's fault.
    #[error("internal server error: {0}")]
    Internal(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for mapping document operations.
pub type MappingResult<T> = Result<T, MappingError>;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
