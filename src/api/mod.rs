//! Read-only HTTP surface over the merged catalog.

pub mod server;
pub mod types;

pub use server::{router, start_server};
pub use types::HotelsQuery;
