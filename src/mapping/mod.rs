//! Configuration-driven mapping and merge engine.
//!
//! Submodules, leaves first:
//!
//! - [`document`] - mapping document loader and leaf classification
//! - [`path`] - dotted-path extraction and template rendering
//! - [`group`] - supplier payload decoding and identity grouping
//! - [`actions`] - action registry, built-in actions, vocabulary tables
//! - [`resolve`] - leaf resolver (collect + reduce)
//! - [`engine`] - tree walker and the public [`MappingEngine`] surface

pub mod actions;
pub mod document;
pub mod engine;
pub mod group;
pub mod path;
pub mod resolve;

pub use actions::{ActionFn, ActionInput, ActionParams, ActionRegistry};
pub use document::{LeafMapping, MappingDocument};
pub use engine::{MappingEngine, SkippedGroup, TransformOutcome};
pub use group::RecordGroup;
