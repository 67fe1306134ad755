//! In-process tour store.
//!
//! Backs tests and `STORE_BACKEND=memory` runs. Data is lost on restart.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::StoreError;

use super::store::{StoreResult, TourStore};
use super::types::{RecordId, Tour};

/// Concurrent map store with a unique `tour_id` index.
#[derive(Debug, Clone, Default)]
pub struct MemoryTourStore {
    /// Records by identity.
    records: Arc<DashMap<RecordId, Tour>>,
    /// Identity owning each `tour_id`.
    by_tour_id: Arc<DashMap<i64, RecordId>>,
    /// When set, every operation fails as if the backend were down.
    offline: Arc<AtomicBool>,
}

impl MemoryTourStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the backend going away (or coming back).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of stored tours.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no tours.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn check_online(&self) -> StoreResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "memory store is offline".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl TourStore for MemoryTourStore {
    async fn list(&self) -> StoreResult<Vec<Tour>> {
        self.check_online()?;
        let mut tours: Vec<Tour> = self.records.iter().map(|e| e.value().clone()).collect();
        tours.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        Ok(tours)
    }

    async fn find(&self, id: &RecordId) -> StoreResult<Option<Tour>> {
        self.check_online()?;
        Ok(self.records.get(id).map(|e| e.value().clone()))
    }

    async fn insert(&self, tour: &Tour) -> StoreResult<()> {
        self.check_online()?;
        // The index slot stays locked until the record is in place.
        match self.by_tour_id.entry(tour.tour_id) {
            Entry::Occupied(_) => Err(StoreError::DuplicateTourId(tour.tour_id)),
            Entry::Vacant(slot) => {
                self.records.insert(tour.id, tour.clone());
                slot.insert(tour.id);
                Ok(())
            }
        }
    }

    async fn replace(&self, tour: &Tour) -> StoreResult<bool> {
        self.check_online()?;
        match self.records.get_mut(&tour.id) {
            Some(mut entry) => {
                *entry = tour.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &RecordId) -> StoreResult<Option<Tour>> {
        self.check_online()?;
        let Some((_, tour)) = self.records.remove(id) else {
            return Ok(None);
        };
        self.by_tour_id
            .remove_if(&tour.tour_id, |_, owner| *owner == tour.id);
        Ok(Some(tour))
    }

    async fn ping(&self) -> StoreResult<()> {
        self.check_online()
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
