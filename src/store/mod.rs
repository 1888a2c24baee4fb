//! In-memory catalog store.
//!
//! Holds the merged catalog between refreshes and answers the HTTP
//! surface's queries. The store is shared behind an `Arc`; the lock is held
//! only for the duration of a copy, never across I/O.

use std::sync::RwLock;

use crate::models::Hotel;

/// Process-wide catalog of merged hotels.
#[derive(Debug, Default)]
pub struct HotelStore {
    hotels: RwLock<Vec<Hotel>>,
}

impl HotelStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole catalog.
    pub fn set(&self, hotels: Vec<Hotel>) {
        *self.write() = hotels;
    }

    /// The full catalog.
    pub fn get_all(&self) -> Vec<Hotel> {
        self.read().clone()
    }

    /// Hotels whose identity is in `ids` (exact string match).
    pub fn filter_by_ids(&self, ids: &[String]) -> Vec<Hotel> {
        self.read()
            .iter()
            .filter(|h| ids.iter().any(|id| *id == h.id))
            .cloned()
            .collect()
    }

    /// Hotels whose destination identifier is in `destination_ids`.
    pub fn filter_by_destinations(&self, destination_ids: &[i64]) -> Vec<Hotel> {
        self.read()
            .iter()
            .filter(|h| destination_ids.contains(&h.destination_id))
            .cloned()
            .collect()
    }

    /// Number of hotels currently held.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// True when the catalog has not been populated.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<Hotel>> {
        self.hotels.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<Hotel>> {
        self.hotels.write().unwrap_or_else(|e| e.into_inner())
    }
}
